use super::common::*;
use crate::marketplace::domain::RecordId;
use crate::marketplace::forum::ForumError;
use crate::marketplace::store::{RecordRepository, RepositoryError};
use crate::marketplace::validation::{PostDraft, DEFAULT_POST_CATEGORY};

#[test]
fn like_increments_upvotes_once_and_marks_liked() {
    let market = marketplace();
    let before = market.forum.get(&RecordId::new("1")).expect("post exists");

    let after = market.forum.like(&before.id).expect("like succeeds");

    assert_eq!(after.upvotes, before.upvotes + 1);
    assert!(after.liked);
    assert_eq!(after.downvotes, before.downvotes);
    assert_eq!(
        market.forum.get(&before.id).expect("post exists").upvotes,
        46
    );
}

#[test]
fn reply_appends_exactly_one_stamped_reply() {
    let market = marketplace();
    let post_id = RecordId::new("1");
    let before = market.forum.get(&post_id).expect("post exists");

    let reply = market
        .forum
        .reply(&post_id, "Does this include the lab sections?", member())
        .expect("reply succeeds");

    let after = market.forum.get(&post_id).expect("post exists");
    assert_eq!(after.replies.len(), before.replies.len() + 1);
    let last = after.replies.last().expect("reply stored");
    assert_eq!(last, &reply);
    assert_eq!(last.created_at, now());
    assert_eq!(last.author.id, member().id);
    assert_eq!(last.upvotes, 0);
    assert_eq!(after.replies[..before.replies.len()], before.replies[..]);
}

#[test]
fn blank_reply_is_rejected_without_touching_the_thread() {
    let market = marketplace();
    let post_id = RecordId::new("1");

    match market.forum.reply(&post_id, "   ", member()) {
        Err(ForumError::Validation(rejected)) => {
            assert_eq!(
                rejected.errors.get("content"),
                Some("Reply content is required")
            );
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(
        market.forum.get(&post_id).expect("post exists").replies.len(),
        1
    );
}

#[test]
fn new_posts_lead_the_feed_with_defaults() {
    let market = marketplace();
    let created = market
        .forum
        .create_post(
            PostDraft::new("Lost calculator", "Left it in room 201"),
            member(),
        )
        .expect("post created");

    assert_eq!(created.category, DEFAULT_POST_CATEGORY);
    assert_eq!(created.created_at, now());
    assert!(created.id.as_str().starts_with("post-"));

    let feed = market.forum.repository().all().expect("snapshot");
    assert_eq!(feed[0].id, created.id);
    assert_eq!(feed.len(), 4);
}

#[test]
fn post_without_title_is_rejected() {
    let market = marketplace();
    let err = market
        .forum
        .create_post(PostDraft::new("", "content only"), member())
        .expect_err("missing title rejected");
    assert!(matches!(
        err,
        ForumError::Validation(ref rejected) if rejected.errors.contains("title")
    ));
    assert_eq!(market.forum.repository().len().expect("length"), 3);
}

#[test]
fn voting_on_a_missing_post_reports_not_found() {
    let market = marketplace();
    let err = market
        .forum
        .downvote(&RecordId::new("missing"))
        .expect_err("unknown post");
    assert!(matches!(
        err,
        ForumError::Repository(RepositoryError::NotFound)
    ));
}

#[test]
fn concurrent_likes_are_all_counted() {
    let market = marketplace();
    let post_id = RecordId::new("2");
    let before = market.forum.get(&post_id).expect("post exists").upvotes;

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..25 {
                    market.forum.like(&post_id).expect("like succeeds");
                }
            });
        }
    });

    assert_eq!(
        market.forum.get(&post_id).expect("post exists").upvotes,
        before + 200
    );
}
