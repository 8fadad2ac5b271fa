use campus_market::marketplace::fixtures;
use campus_market::marketplace::{
    BookmarkItemType, CatalogQuery, EventDraft, FixedClock, ListingDraft, ListingError,
    Marketplace, PostDraft, RecordId, ReportStatus, ReportSubmission, ReportedItemType, SortKey,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;

fn opening_day() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 20, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn market() -> Marketplace {
    Marketplace::seeded(Arc::new(FixedClock(opening_day())))
}

#[test]
fn seller_lists_and_withdraws_an_item() {
    let market = market();
    let seller = fixtures::current_user();
    let draft = ListingDraft {
        title: "Mini Fridge".to_string(),
        description: "3.1 cu ft, perfect for dorms".to_string(),
        price: 70.0,
        category: "Furniture".to_string(),
        condition: "Good".to_string(),
        images: vec!["https://img/fridge.jpg".to_string()],
        expires_at: Some(opening_day() + Duration::days(30)),
    };

    let listing = market
        .listings
        .create(draft, seller.clone())
        .expect("listing created");
    let newest = market
        .listings
        .browse(&CatalogQuery::new().sort(SortKey::Newest))
        .expect("browse succeeds");
    assert_eq!(newest[0].id, listing.id);

    let err = market
        .listings
        .withdraw(&listing.id, &fixtures::john_doe().id)
        .expect_err("strangers cannot withdraw");
    assert!(matches!(err, ListingError::NotSeller));

    market
        .listings
        .withdraw(&listing.id, &seller.id)
        .expect("seller withdraws");
    assert_eq!(
        market
            .listings
            .browse(&CatalogQuery::new())
            .expect("browse succeeds")
            .len(),
        3
    );
}

#[test]
fn seller_revises_a_listing_in_place() {
    let market = market();
    let seller = fixtures::john_doe();
    let original = market
        .listings
        .get(&RecordId::new("1"))
        .expect("listing exists");

    let mut draft = ListingDraft::from_listing(&original);
    draft.price = 39.99;
    draft.condition = "Good".to_string();

    let err = market
        .listings
        .update(&original.id, &fixtures::emma_smith().id, draft.clone())
        .expect_err("strangers cannot edit");
    assert!(matches!(err, ListingError::NotSeller));

    let mut blank = draft.clone();
    blank.title.clear();
    assert!(matches!(
        market.listings.update(&original.id, &seller.id, blank),
        Err(ListingError::Validation(_))
    ));
    assert_eq!(
        market.listings.get(&original.id).expect("listing exists"),
        original
    );

    let updated = market
        .listings
        .update(&original.id, &seller.id, draft)
        .expect("seller edits");
    assert_eq!(updated.price, 39.99);
    assert_eq!(updated.condition, "Good");
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.updated_at, Some(opening_day()));

    let listed = market
        .listings
        .browse(&CatalogQuery::new())
        .expect("browse succeeds");
    assert_eq!(listed[0], updated);
}

#[test]
fn organizer_runs_an_event_from_creation_to_close() {
    let market = market();
    let mut draft = EventDraft::new(fixtures::michael_brown());
    draft.title = "Thesis Writing Bootcamp".to_string();
    draft.description = "Two days of structured writing sessions.".to_string();
    draft.date = Some(opening_day() + Duration::days(14));
    draft.end_date = Some(opening_day() + Duration::days(15));
    draft.location = "Library, Floor 4".to_string();
    draft.event_type = "workshop".to_string();
    draft.category = "Academic".to_string();
    draft.max_attendees = 25;
    draft.registration_deadline = Some(opening_day() + Duration::days(10));
    draft.eligibility = "Graduate students".to_string();
    draft.department = "Research Department".to_string();

    let event = market.events.create(draft).expect("event created");
    let registered = market
        .events
        .register(&event.id, fixtures::alex_chen())
        .expect("registration succeeds");
    assert_eq!(registered.seats_remaining(), 24);

    let workshops = market
        .events
        .browse(&CatalogQuery::new().kind("workshop").sort(SortKey::Popularity))
        .expect("browse succeeds");
    assert_eq!(workshops[0].id, event.id);

    market
        .bookmarks
        .toggle(
            &fixtures::alex_chen().id,
            &event.id,
            BookmarkItemType::Event,
        )
        .expect("bookmark saved");

    let closed = market
        .events
        .toggle_status(&event.id)
        .expect("toggle succeeds");
    assert_eq!(closed.attendees.len(), 1);
    assert!(market
        .events
        .browse(&CatalogQuery::new().status("active").kind("workshop"))
        .expect("browse succeeds")
        .iter()
        .all(|listed| listed.id != event.id));
}

#[test]
fn forum_thread_collects_votes_replies_and_reports() {
    let market = market();
    let author = fixtures::current_user();
    let post = market
        .forum
        .create_post(
            PostDraft {
                category: "academic".to_string(),
                tags: vec!["physics".to_string()],
                ..PostDraft::new("Physics 101 past papers?", "Does anyone have them?")
            },
            author.clone(),
        )
        .expect("post created");

    market.forum.like(&post.id).expect("liked");
    let reply = market
        .forum
        .reply(&post.id, "Check the department drive.", fixtures::alex_chen())
        .expect("reply added");

    let report = market
        .report(
            &author.id,
            ReportSubmission {
                item_id: reply.id.clone(),
                item_type: ReportedItemType::Reply,
                reason: "Spam or misleading".to_string(),
                description: None,
            },
        )
        .expect("report filed");
    market
        .reports
        .review(&report.id, ReportStatus::Resolved)
        .expect("resolved");

    let thread = market.forum.get(&post.id).expect("thread exists");
    assert_eq!(thread.upvotes, 1);
    assert!(thread.liked);
    assert_eq!(thread.replies.len(), 1);
    assert!(thread.replies[0].moderation.reported);
    assert_eq!(
        market.reports.for_item(&reply.id).expect("reports")[0].status,
        ReportStatus::Resolved
    );
}

#[test]
fn empty_marketplace_has_nothing_to_browse() {
    let market = Marketplace::empty(Arc::new(FixedClock(opening_day())));
    assert!(market
        .housing
        .browse(&CatalogQuery::new())
        .expect("browse succeeds")
        .is_empty());
    assert!(market.housing.get(&RecordId::new("1")).is_err());
}
