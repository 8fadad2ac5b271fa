//! Campus marketplace core: item listings, housing, the discussion forum, the events
//! directory, moderation reports, and bookmarks, all held in process memory.

pub mod bookmarks;
pub mod catalog;
pub mod clock;
pub mod domain;
pub mod events;
pub mod fixtures;
pub mod forum;
pub mod import;
pub mod listings;
pub mod moderation;
pub mod state;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use bookmarks::{Bookmark, BookmarkBook, BookmarkItemType, BookmarkToggle};
pub use catalog::{CatalogQuery, SortKey, ALL_SELECTION};
pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{
    Event, EventStatus, EventVisibility, ForumPost, ForumReply, HousingListing, HousingType,
    Listing, ModerationFlags, RecordId, User, UserId, UserRole, VerificationBadge,
};
pub use events::{EventError, EventService, RegistrationError};
pub use forum::{ForumError, ForumService};
pub use import::{ListingCsvImporter, ListingImportError};
pub use listings::{HousingBoard, ListingBoard, ListingError};
pub use moderation::{
    ModerationError, Report, ReportRecorder, ReportStatus, ReportSubmission, ReportedItemType,
    REPORT_REASONS,
};
pub use state::Marketplace;
pub use store::{InMemoryRepository, Record, RecordRepository, RepositoryError};
pub use validation::{EventDraft, FieldErrors, FormRejected, ListingDraft, PostDraft};
