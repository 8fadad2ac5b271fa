mod cli;
mod demo;
mod output;

use std::sync::Arc;

use campus_market::config::AppConfig;
use campus_market::error::AppError;
use campus_market::marketplace::{
    CatalogQuery, Clock, ListingCsvImporter, Marketplace, SystemClock,
};
use campus_market::telemetry;
use clap::Parser;
use tracing::info;

use cli::{Cli, Command};

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(path) = cli.listings_csv.clone() {
        config.catalog.listings_csv = Some(path);
    }
    if let Some(threshold) = cli.hide_reported {
        config.catalog.report_hide_threshold = Some(threshold);
    }

    telemetry::init(&config.telemetry)?;
    info!(?config.environment, "campus marketplace starting");

    let hide = |mut query: CatalogQuery| {
        query.hide_reported_at = config.catalog.report_hide_threshold;
        query
    };

    let wall_clock = || -> Arc<dyn Clock> { Arc::new(SystemClock) };

    match cli.command {
        Command::Listings(args) => {
            let market = load_market(&config, wall_clock())?;
            let listings = market.listings.browse(&hide(args.query()))?;
            output::listings(&listings, cli.json)
        }
        Command::Housing(args) => {
            let market = load_market(&config, wall_clock())?;
            let units = market.housing.browse(&hide(args.query()))?;
            output::housing(&units, cli.json)
        }
        Command::Forum(args) => {
            let market = load_market(&config, wall_clock())?;
            let posts = market.forum.browse(&hide(args.query()))?;
            output::posts(&posts, cli.json)
        }
        Command::Events(args) => {
            let market = load_market(&config, wall_clock())?;
            let events = match args.upcoming {
                Some(limit) => market.events.upcoming(limit)?,
                None => market.events.browse(&args.query())?,
            };
            output::events(&events, cli.json)
        }
        Command::Demo(args) => demo::run(args, &config, cli.json),
    }
}

/// Seeded marketplace plus any configured CSV listings.
fn load_market(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<Marketplace, AppError> {
    let market = Marketplace::seeded(clock);
    if let Some(path) = &config.catalog.listings_csv {
        let imported = ListingCsvImporter::from_path(path, &market.members)?;
        market.load_listings(imported)?;
    }
    Ok(market)
}
