use std::sync::Arc;

use tracing::{debug, info};

use super::catalog::{self, CatalogQuery};
use super::clock::{Clock, IdSequence};
use super::domain::{ForumPost, ForumReply, ModerationFlags, RecordId, User};
use super::store::{RecordRepository, RepositoryError};
use super::validation::{validate_reply, FormRejected, PostDraft};

/// Service owning forum threads: creation, votes, and replies.
///
/// Every mutation edits a post inside one repository step, so concurrent votes never
/// overwrite each other.
pub struct ForumService<R> {
    posts: Arc<R>,
    clock: Arc<dyn Clock>,
    post_ids: IdSequence,
    reply_ids: IdSequence,
}

impl<R> ForumService<R>
where
    R: RecordRepository<ForumPost> + 'static,
{
    pub fn new(posts: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            posts,
            clock,
            post_ids: IdSequence::new("post"),
            reply_ids: IdSequence::new("reply"),
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.posts
    }

    /// Publish a new thread at the top of the feed.
    pub fn create_post(&self, draft: PostDraft, author: User) -> Result<ForumPost, ForumError> {
        let post = draft.into_post(self.post_ids.next_id(), author, self.clock.now())?;
        let stored = self.posts.insert(post)?;
        info!(post_id = %stored.id, category = %stored.category, "forum post created");
        Ok(stored)
    }

    /// Upvote and mark the post liked.
    pub fn like(&self, post_id: &RecordId) -> Result<ForumPost, ForumError> {
        let post = self.modify(post_id, |post| {
            post.upvotes = post.upvotes.saturating_add(1);
            post.liked = true;
        })?;
        debug!(post_id = %post.id, upvotes = post.upvotes, "post liked");
        Ok(post)
    }

    pub fn downvote(&self, post_id: &RecordId) -> Result<ForumPost, ForumError> {
        let post = self.modify(post_id, |post| {
            post.downvotes = post.downvotes.saturating_add(1);
        })?;
        debug!(post_id = %post.id, downvotes = post.downvotes, "post downvoted");
        Ok(post)
    }

    /// Append one reply stamped with the current time.
    pub fn reply(
        &self,
        post_id: &RecordId,
        content: &str,
        author: User,
    ) -> Result<ForumReply, ForumError> {
        validate_reply(content).into_result()?;
        let reply = ForumReply {
            id: self.reply_ids.next_id(),
            content: content.to_string(),
            author,
            created_at: self.clock.now(),
            upvotes: 0,
            downvotes: 0,
            moderation: ModerationFlags::default(),
        };
        let appended = reply.clone();
        let post = self.modify(post_id, move |post| post.replies.push(appended))?;
        info!(post_id = %post.id, reply_id = %reply.id, replies = post.replies.len(), "reply added");
        Ok(reply)
    }

    pub fn get(&self, post_id: &RecordId) -> Result<ForumPost, ForumError> {
        let post = self
            .posts
            .fetch(post_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(post)
    }

    pub fn browse(&self, query: &CatalogQuery) -> Result<Vec<ForumPost>, ForumError> {
        Ok(catalog::browse(self.posts.as_ref(), query)?)
    }

    fn modify(
        &self,
        post_id: &RecordId,
        change: impl FnOnce(&mut ForumPost),
    ) -> Result<ForumPost, ForumError> {
        self.posts.update_with(post_id, |post| {
            change(post);
            Ok(())
        })
    }
}

/// Error raised by the forum service.
#[derive(Debug, thiserror::Error)]
pub enum ForumError {
    #[error(transparent)]
    Validation(#[from] FormRejected),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
