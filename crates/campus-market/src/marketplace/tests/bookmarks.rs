use super::common::*;
use crate::marketplace::bookmarks::{BookmarkItemType, BookmarkToggle};
use crate::marketplace::domain::RecordId;

#[test]
fn toggling_twice_adds_then_removes() {
    let market = marketplace();
    let user = member().id;
    let desk = RecordId::new("2");

    let added = market
        .bookmarks
        .toggle(&user, &desk, BookmarkItemType::Listing)
        .expect("toggle succeeds");
    assert!(added.is_bookmarked());
    assert!(market
        .bookmarks
        .is_bookmarked(&user, &desk, BookmarkItemType::Listing)
        .expect("lookup"));

    let removed = market
        .bookmarks
        .toggle(&user, &desk, BookmarkItemType::Listing)
        .expect("toggle succeeds");
    assert!(matches!(removed, BookmarkToggle::Removed(_)));
    assert!(market
        .bookmarks
        .for_user(&user)
        .expect("bookmarks")
        .is_empty());
}

#[test]
fn item_type_distinguishes_same_ids() {
    let market = marketplace();
    let user = member().id;
    let id = RecordId::new("1");

    market
        .bookmarks
        .toggle(&user, &id, BookmarkItemType::Listing)
        .expect("listing saved");
    market
        .bookmarks
        .toggle(&user, &id, BookmarkItemType::Event)
        .expect("event saved");

    let saved = market.bookmarks.for_user(&user).expect("bookmarks");
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0].item_type, BookmarkItemType::Event);
    assert!(!market
        .bookmarks
        .is_bookmarked(&user, &id, BookmarkItemType::Housing)
        .expect("lookup"));
}
