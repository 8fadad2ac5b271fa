use std::sync::Arc;

use campus_market::config::AppConfig;
use campus_market::error::AppError;
use campus_market::marketplace::fixtures;
use campus_market::marketplace::{
    BookmarkItemType, Event, EventDraft, EventError, FieldErrors, FixedClock, ForumPost,
    ForumReply, RecordId, Report, ReportStatus, ReportSubmission, ReportedItemType,
    REPORT_REASONS,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Serialize;
use tracing::info;

use crate::cli::DemoArgs;
use crate::output;

#[derive(Debug, Serialize)]
struct DemoSummary {
    ran_at: DateTime<Utc>,
    rejected_event: FieldErrors,
    created_event: Event,
    toggled_status: &'static str,
    registration: Event,
    liked_post: ForumPost,
    reply: ForumReply,
    report: Report,
    bookmarked: bool,
}

fn default_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

fn career_fair(start: DateTime<Utc>) -> EventDraft {
    let mut draft = EventDraft::new(fixtures::sarah_wilson());
    draft.title = "Spring Career Fair".to_string();
    draft.description = "Meet recruiters from local and national employers.".to_string();
    draft.date = Some(start);
    draft.end_date = Some(start + Duration::hours(6));
    draft.location = "Student Union Ballroom".to_string();
    draft.event_type = "conference".to_string();
    draft.category = "Career".to_string();
    draft.max_attendees = 200;
    draft.registration_deadline = Some(start - Duration::days(1));
    draft.eligibility = "All students".to_string();
    draft.department = "Student Affairs".to_string();
    draft
}

pub fn run(args: DemoArgs, config: &AppConfig, as_json: bool) -> Result<(), AppError> {
    let ran_at = args.at.unwrap_or_else(default_instant);
    let market = crate::load_market(config, Arc::new(FixedClock(ran_at)))?;
    let member = fixtures::current_user();

    let mut untitled = career_fair(ran_at + Duration::days(30));
    untitled.title.clear();
    let rejected_event = match market.events.create(untitled) {
        Err(EventError::Validation(rejected)) => rejected.errors,
        Err(other) => return Err(other.into()),
        Ok(event) => {
            market.events.delete(&event.id)?;
            FieldErrors::new()
        }
    };

    let created_event = market
        .events
        .create(career_fair(ran_at + Duration::days(30)))?;
    market.events.toggle_status(&created_event.id)?;
    let toggled = market.events.toggle_status(&created_event.id)?;

    let registration = market
        .events
        .register(&RecordId::new("1"), member.clone())?;

    let liked_post = market.forum.like(&RecordId::new("1"))?;
    let reply = market.forum.reply(
        &liked_post.id,
        "Thanks! Is the library open later during exam week?",
        member.clone(),
    )?;

    let filed = market.report(
        &member.id,
        ReportSubmission {
            item_id: RecordId::new("3"),
            item_type: ReportedItemType::Listing,
            reason: REPORT_REASONS[2].to_string(),
            description: Some("Price seems far below market value".to_string()),
        },
    )?;
    market.reports.review(&filed.id, ReportStatus::Reviewed)?;
    let report = market.reports.review(&filed.id, ReportStatus::Resolved)?;

    let bookmarked = market
        .bookmarks
        .toggle(&member.id, &RecordId::new("1"), BookmarkItemType::Listing)?
        .is_bookmarked();

    info!(event_id = %created_event.id, report_id = %report.id, "demo finished");

    let summary = DemoSummary {
        ran_at,
        rejected_event,
        created_event,
        toggled_status: toggled.status.label(),
        registration,
        liked_post,
        reply,
        report,
        bookmarked,
    };

    if as_json {
        return output::json(&summary);
    }
    render(&summary);
    Ok(())
}

fn render(summary: &DemoSummary) {
    println!("Campus marketplace demo");
    println!("Clock fixed at {}", summary.ran_at.to_rfc3339());

    println!("\nEvent form without a title");
    for (field, message) in summary.rejected_event.iter() {
        println!("- {field}: {message}");
    }

    println!("\nEvent directory");
    println!(
        "- created {} ({}), attendees {}",
        summary.created_event.title,
        summary.created_event.id,
        summary.created_event.registered()
    );
    println!("- status after two toggles: {}", summary.toggled_status);
    println!(
        "- {}: {}/{} registered, {} seats left",
        summary.registration.title,
        summary.registration.registered(),
        summary.registration.max_attendees,
        summary.registration.seats_remaining()
    );

    println!("\nForum");
    println!(
        "- liked \"{}\": {} upvotes",
        summary.liked_post.title, summary.liked_post.upvotes
    );
    println!(
        "- replied at {}: {}",
        summary.reply.created_at.to_rfc3339(),
        summary.reply.content
    );

    println!("\nModeration");
    println!(
        "- report {} on {} {}: {} ({})",
        summary.report.id,
        summary.report.item_type,
        summary.report.item_id,
        summary.report.reason,
        summary.report.status
    );

    println!("\nBookmarks");
    println!(
        "- listing 1 {}",
        if summary.bookmarked {
            "saved"
        } else {
            "removed"
        }
    );
}
