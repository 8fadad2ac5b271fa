use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::marketplace::clock::FixedClock;
use crate::marketplace::domain::{Event, RecordId, User};
use crate::marketplace::fixtures;
use crate::marketplace::state::Marketplace;
use crate::marketplace::store::{Record, RecordRepository, RepositoryError};
use crate::marketplace::validation::EventDraft;

pub(super) fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

/// Early April 2024: both seeded events are still open for registration.
pub(super) fn now() -> DateTime<Utc> {
    at(2024, 4, 1, 12, 0)
}

pub(super) fn marketplace() -> Marketplace {
    Marketplace::seeded(Arc::new(FixedClock(now())))
}

pub(super) fn marketplace_at(instant: DateTime<Utc>) -> Marketplace {
    Marketplace::seeded(Arc::new(FixedClock(instant)))
}

pub(super) fn member() -> User {
    fixtures::current_user()
}

pub(super) fn hackathon() -> RecordId {
    RecordId::new("1")
}

pub(super) fn event_draft() -> EventDraft {
    let mut draft = EventDraft::new(fixtures::sarah_wilson());
    draft.title = "Career Fair".to_string();
    draft.description = "Meet recruiters from local companies.".to_string();
    draft.date = Some(at(2024, 5, 2, 10, 0));
    draft.end_date = Some(at(2024, 5, 2, 16, 0));
    draft.location = "Student Union Ballroom".to_string();
    draft.event_type = "conference".to_string();
    draft.category = "Career".to_string();
    draft.max_attendees = 2;
    draft.registration_deadline = Some(at(2024, 4, 30, 23, 59));
    draft.eligibility = "All students".to_string();
    draft.department = "Student Affairs".to_string();
    draft
}

pub(super) fn ids<T: Record>(records: &[T]) -> Vec<String> {
    records
        .iter()
        .map(|record| record.record_id().to_string())
        .collect()
}

/// Store that is always down, for checking error propagation.
#[derive(Default)]
pub(super) struct UnavailableRepository;

impl RecordRepository<Event> for UnavailableRepository {
    fn insert(&self, _record: Event) -> Result<Event, RepositoryError> {
        Err(down())
    }

    fn update(&self, _record: Event) -> Result<(), RepositoryError> {
        Err(down())
    }

    fn update_with<E, F>(&self, _id: &RecordId, _change: F) -> Result<Event, E>
    where
        E: From<RepositoryError>,
        F: FnOnce(&mut Event) -> Result<(), E>,
    {
        Err(down().into())
    }

    fn fetch(&self, _id: &RecordId) -> Result<Option<Event>, RepositoryError> {
        Err(down())
    }

    fn remove(&self, _id: &RecordId) -> Result<Event, RepositoryError> {
        Err(down())
    }

    fn all(&self) -> Result<Vec<Event>, RepositoryError> {
        Err(down())
    }
}

fn down() -> RepositoryError {
    RepositoryError::Unavailable("maintenance window".to_string())
}
