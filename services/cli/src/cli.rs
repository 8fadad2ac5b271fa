use std::path::PathBuf;

use campus_market::marketplace::{CatalogQuery, HousingType, SortKey};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "campus-market",
    about = "Browse and exercise the campus marketplace from the command line",
    version
)]
pub struct Cli {
    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
    /// Extra listings CSV loaded after the built-in fixtures
    #[arg(long, global = true)]
    pub listings_csv: Option<PathBuf>,
    /// Hide records reported at least this many times
    #[arg(long, global = true)]
    pub hide_reported: Option<u32>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Browse items for sale
    Listings(ListingArgs),
    /// Browse housing units
    Housing(HousingArgs),
    /// Browse forum threads
    Forum(ForumArgs),
    /// Browse the events directory
    Events(EventArgs),
    /// Walk through posting, voting, registering, and reporting
    Demo(DemoArgs),
}

/// Flags shared by every browse command.
#[derive(Args, Debug, Default)]
pub struct CommonArgs {
    /// Case-insensitive text search
    #[arg(long)]
    pub search: Option<String>,
    /// Ordering: newest, price-asc, price-desc, popularity
    #[arg(long, default_value_t = SortKey::Newest)]
    pub sort: SortKey,
}

#[derive(Args, Debug)]
pub struct ListingArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    /// Category, or "all"
    #[arg(long, default_value = "all")]
    pub category: String,
    /// Condition, or "all"
    #[arg(long, default_value = "all")]
    pub condition: String,
    #[arg(long)]
    pub min_price: Option<f64>,
    #[arg(long)]
    pub max_price: Option<f64>,
    /// Hide listings expired on this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub active_on: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct HousingArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    /// apartment, house, room, shared, or "all"
    #[arg(long = "type", default_value = "all", value_parser = parse_housing_type)]
    pub housing_type: String,
    #[arg(long)]
    pub min_price: Option<f64>,
    #[arg(long)]
    pub max_price: Option<f64>,
    #[arg(long)]
    pub min_bedrooms: Option<u8>,
    /// Required amenity; repeat for several
    #[arg(long = "amenity")]
    pub amenities: Vec<String>,
    #[arg(long)]
    pub pets: bool,
    #[arg(long)]
    pub furnished: bool,
}

#[derive(Args, Debug)]
pub struct ForumArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    /// announcements, academic, events, general, or "all"
    #[arg(long, default_value = "all")]
    pub category: String,
}

#[derive(Args, Debug)]
pub struct EventArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    /// Event type, or "all"
    #[arg(long = "type", default_value = "all")]
    pub event_type: String,
    /// Department, or "all"
    #[arg(long, default_value = "all")]
    pub department: String,
    /// active, inactive, or "all"
    #[arg(long, default_value = "active")]
    pub status: String,
    /// Only the next LIMIT events by start date; ignores the filters above
    #[arg(long, value_name = "LIMIT")]
    pub upcoming: Option<usize>,
}

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Instant the demo runs at (RFC 3339); defaults to before the seeded deadlines
    #[arg(long, value_parser = parse_instant)]
    pub at: Option<DateTime<Utc>>,
}

impl CommonArgs {
    fn query(&self) -> CatalogQuery {
        let query = CatalogQuery::new().sort(self.sort);
        match self.search.as_deref() {
            Some(search) => query.search(search),
            None => query,
        }
    }
}

impl ListingArgs {
    pub fn query(&self) -> CatalogQuery {
        let mut query = self
            .common
            .query()
            .category(&self.category)
            .condition(&self.condition)
            .price_range(self.min_price, self.max_price);
        query.active_at = self
            .active_on
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc());
        query
    }
}

impl HousingArgs {
    pub fn query(&self) -> CatalogQuery {
        let mut query = self
            .common
            .query()
            .kind(&self.housing_type)
            .price_range(self.min_price, self.max_price);
        query.min_bedrooms = self.min_bedrooms;
        query.amenities = self.amenities.clone();
        query.pets_allowed = self.pets.then_some(true);
        query.furnished = self.furnished.then_some(true);
        query
    }
}

impl ForumArgs {
    pub fn query(&self) -> CatalogQuery {
        self.common.query().category(&self.category)
    }
}

impl EventArgs {
    pub fn query(&self) -> CatalogQuery {
        self.common
            .query()
            .kind(&self.event_type)
            .department(&self.department)
            .status(&self.status)
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 timestamp ({err})"))
}

// Validates the dropdown value but keeps it as the lowercase label the filter compares on.
fn parse_housing_type(raw: &str) -> Result<String, String> {
    if raw.trim().eq_ignore_ascii_case("all") {
        return Ok("all".to_string());
    }
    raw.parse::<HousingType>()
        .map(|kind| kind.label().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_flags_build_a_query() {
        let cli = Cli::try_parse_from([
            "campus-market",
            "listings",
            "--category",
            "Textbooks",
            "--sort",
            "price-desc",
            "--max-price",
            "100",
        ])
        .expect("arguments parse");

        let Command::Listings(args) = cli.command else {
            panic!("expected listings command");
        };
        let query = args.query();
        assert_eq!(query.category.as_deref(), Some("Textbooks"));
        assert_eq!(query.condition, None);
        assert_eq!(query.max_price, Some(100.0));
        assert_eq!(query.sort, SortKey::PriceDesc);
    }

    #[test]
    fn events_default_to_active() {
        let cli = Cli::try_parse_from(["campus-market", "events", "--json"])
            .expect("arguments parse");
        assert!(cli.json);
        let Command::Events(args) = cli.command else {
            panic!("expected events command");
        };
        assert_eq!(args.query().status.as_deref(), Some("active"));
        assert_eq!(args.upcoming, None);
    }

    #[test]
    fn upcoming_takes_a_limit() {
        let cli = Cli::try_parse_from(["campus-market", "events", "--upcoming", "5"])
            .expect("arguments parse");
        let Command::Events(args) = cli.command else {
            panic!("expected events command");
        };
        assert_eq!(args.upcoming, Some(5));
    }

    #[test]
    fn housing_type_is_normalised() {
        let cli = Cli::try_parse_from([
            "campus-market",
            "housing",
            "--type",
            "House",
            "--amenity",
            "Backyard",
            "--pets",
        ])
        .expect("arguments parse");
        let Command::Housing(args) = cli.command else {
            panic!("expected housing command");
        };
        let query = args.query();
        assert_eq!(query.kind.as_deref(), Some("house"));
        assert_eq!(query.amenities, vec!["Backyard".to_string()]);
        assert_eq!(query.pets_allowed, Some(true));
        assert_eq!(query.furnished, None);
    }

    #[test]
    fn rejects_unknown_sort_and_type() {
        assert!(Cli::try_parse_from(["campus-market", "forum", "--sort", "cheapest"]).is_err());
        assert!(Cli::try_parse_from(["campus-market", "housing", "--type", "castle"]).is_err());
    }

    #[test]
    fn demo_accepts_an_instant() {
        let cli = Cli::try_parse_from([
            "campus-market",
            "demo",
            "--at",
            "2024-04-01T12:00:00Z",
        ])
        .expect("arguments parse");
        let Command::Demo(args) = cli.command else {
            panic!("expected demo command");
        };
        assert!(args.at.is_some());
    }
}
