use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::clock::{Clock, IdSequence};
use super::domain::{RecordId, UserId};
use super::store::{Record, RecordRepository, RepositoryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkItemType {
    Listing,
    Housing,
    Event,
}

/// A member's saved item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: RecordId,
    pub user_id: UserId,
    pub item_id: RecordId,
    pub item_type: BookmarkItemType,
    pub created_at: DateTime<Utc>,
}

impl Record for Bookmark {
    fn record_id(&self) -> &RecordId {
        &self.id
    }
}

/// Outcome of pressing the bookmark button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkToggle {
    Added(Bookmark),
    Removed(Bookmark),
}

impl BookmarkToggle {
    pub fn is_bookmarked(&self) -> bool {
        matches!(self, BookmarkToggle::Added(_))
    }
}

pub struct BookmarkBook<R> {
    bookmarks: Arc<R>,
    clock: Arc<dyn Clock>,
    ids: IdSequence,
}

impl<R> BookmarkBook<R>
where
    R: RecordRepository<Bookmark> + 'static,
{
    pub fn new(bookmarks: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            bookmarks,
            clock,
            ids: IdSequence::new("bmk"),
        }
    }

    pub fn toggle(
        &self,
        user_id: &UserId,
        item_id: &RecordId,
        item_type: BookmarkItemType,
    ) -> Result<BookmarkToggle, RepositoryError> {
        if let Some(existing) = self.find(user_id, item_id, item_type)? {
            let removed = self.bookmarks.remove(&existing.id)?;
            debug!(%user_id, %item_id, "bookmark removed");
            return Ok(BookmarkToggle::Removed(removed));
        }

        let bookmark = Bookmark {
            id: self.ids.next_id(),
            user_id: user_id.clone(),
            item_id: item_id.clone(),
            item_type,
            created_at: self.clock.now(),
        };
        let stored = self.bookmarks.insert(bookmark)?;
        debug!(%user_id, %item_id, "bookmark added");
        Ok(BookmarkToggle::Added(stored))
    }

    pub fn is_bookmarked(
        &self,
        user_id: &UserId,
        item_id: &RecordId,
        item_type: BookmarkItemType,
    ) -> Result<bool, RepositoryError> {
        Ok(self.find(user_id, item_id, item_type)?.is_some())
    }

    /// A member's bookmarks, most recent first.
    pub fn for_user(&self, user_id: &UserId) -> Result<Vec<Bookmark>, RepositoryError> {
        Ok(self
            .bookmarks
            .all()?
            .into_iter()
            .filter(|bookmark| &bookmark.user_id == user_id)
            .collect())
    }

    fn find(
        &self,
        user_id: &UserId,
        item_id: &RecordId,
        item_type: BookmarkItemType,
    ) -> Result<Option<Bookmark>, RepositoryError> {
        Ok(self.bookmarks.all()?.into_iter().find(|bookmark| {
            &bookmark.user_id == user_id
                && &bookmark.item_id == item_id
                && bookmark.item_type == item_type
        }))
    }
}
