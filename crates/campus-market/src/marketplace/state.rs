use std::sync::Arc;

use tracing::info;

use super::bookmarks::{Bookmark, BookmarkBook};
use super::clock::{Clock, SystemClock};
use super::domain::{Event, ForumPost, HousingListing, Listing, UserId};
use super::events::EventService;
use super::fixtures::{self, UserDirectory};
use super::forum::ForumService;
use super::listings::{HousingBoard, ListingBoard};
use super::moderation::{
    ModerationError, Report, ReportRecorder, ReportSubmission, ReportedItemType,
};
use super::store::{InMemoryRepository, RepositoryError};

pub type ListingStore = InMemoryRepository<Listing>;
pub type HousingStore = InMemoryRepository<HousingListing>;
pub type PostStore = InMemoryRepository<ForumPost>;
pub type EventStore = InMemoryRepository<Event>;
pub type ReportStore = InMemoryRepository<Report>;
pub type BookmarkStore = InMemoryRepository<Bookmark>;

/// Every collection and the services over them, sharing one clock.
pub struct Marketplace {
    pub members: UserDirectory,
    pub listings: ListingBoard<ListingStore>,
    pub housing: HousingBoard<HousingStore>,
    pub forum: ForumService<PostStore>,
    pub events: EventService<EventStore>,
    pub reports: ReportRecorder<ReportStore>,
    pub bookmarks: BookmarkBook<BookmarkStore>,
}

impl Marketplace {
    /// Empty collections; useful when a caller loads its own data.
    pub fn empty(clock: Arc<dyn Clock>) -> Self {
        Self::assemble(
            UserDirectory::default(),
            ListingStore::default(),
            HousingStore::default(),
            PostStore::default(),
            EventStore::default(),
            clock,
        )
    }

    /// Collections seeded with the built-in campus data.
    pub fn seeded(clock: Arc<dyn Clock>) -> Self {
        let (listings, housing) = (fixtures::listings(), fixtures::housing());
        let (posts, events) = (fixtures::forum_posts(), fixtures::events());
        info!(
            listings = listings.len(),
            housing = housing.len(),
            posts = posts.len(),
            events = events.len(),
            "marketplace seeded"
        );
        Self::assemble(
            fixtures::directory(),
            ListingStore::seeded(listings),
            HousingStore::seeded(housing),
            PostStore::seeded(posts),
            EventStore::seeded(events),
            clock,
        )
    }

    pub fn with_system_clock() -> Self {
        Self::seeded(Arc::new(SystemClock))
    }

    fn assemble(
        members: UserDirectory,
        listings: ListingStore,
        housing: HousingStore,
        posts: PostStore,
        events: EventStore,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            members,
            listings: ListingBoard::new(Arc::new(listings), Arc::clone(&clock)),
            housing: HousingBoard::new(Arc::new(housing)),
            forum: ForumService::new(Arc::new(posts), Arc::clone(&clock)),
            events: EventService::new(Arc::new(events), Arc::clone(&clock)),
            reports: ReportRecorder::new(Arc::new(ReportStore::default()), Arc::clone(&clock)),
            bookmarks: BookmarkBook::new(Arc::new(BookmarkStore::default()), clock),
        }
    }

    /// Append imported listings behind the seeded ones.
    pub fn load_listings(&self, listings: Vec<Listing>) -> Result<usize, RepositoryError> {
        let added = self.listings.repository().extend(listings)?;
        info!(added, "listings loaded");
        Ok(added)
    }

    /// Route a report to the collection holding its target.
    pub fn report(
        &self,
        reporter: &UserId,
        submission: ReportSubmission,
    ) -> Result<Report, ModerationError> {
        match submission.item_type {
            ReportedItemType::Listing => self.reports.file::<Listing, _>(
                self.listings.repository().as_ref(),
                reporter,
                submission,
            ),
            ReportedItemType::Housing => self.reports.file::<HousingListing, _>(
                self.housing.repository().as_ref(),
                reporter,
                submission,
            ),
            ReportedItemType::Post => self.reports.file::<ForumPost, _>(
                self.forum.repository().as_ref(),
                reporter,
                submission,
            ),
            ReportedItemType::Reply => {
                self.reports
                    .file_reply(self.forum.repository().as_ref(), reporter, submission)
            }
        }
    }
}
