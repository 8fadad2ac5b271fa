use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::catalog::{self, CatalogQuery};
use super::clock::{Clock, IdSequence};
use super::domain::{Event, EventStatus, RecordId, User, UserId};
use super::store::{RecordRepository, RepositoryError};
use super::validation::{EventDraft, FormRejected};

/// Service behind the events directory.
pub struct EventService<R> {
    events: Arc<R>,
    clock: Arc<dyn Clock>,
    ids: IdSequence,
}

impl<R> EventService<R>
where
    R: RecordRepository<Event> + 'static,
{
    pub fn new(events: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            events,
            clock,
            ids: IdSequence::new("evt"),
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.events
    }

    /// Validate the form and list the event first with nobody registered yet.
    pub fn create(&self, draft: EventDraft) -> Result<Event, EventError> {
        let event = match draft.into_event(self.ids.next_id(), Vec::new()) {
            Ok(event) => event,
            Err(rejected) => {
                warn!(fields = %rejected.errors, "event form rejected");
                return Err(rejected.into());
            }
        };
        let stored = self.events.insert(event)?;
        info!(event_id = %stored.id, department = %stored.department, "event created");
        Ok(stored)
    }

    /// Replace an event's details; id and registrations carry over.
    pub fn edit(&self, event_id: &RecordId, draft: EventDraft) -> Result<Event, EventError> {
        let updated = self.events.update_with(event_id, |event: &mut Event| {
            let attendees = std::mem::take(&mut event.attendees);
            *event = draft.into_event(event.id.clone(), attendees)?;
            Ok::<_, EventError>(())
        })?;
        info!(event_id = %updated.id, "event updated");
        Ok(updated)
    }

    pub fn delete(&self, event_id: &RecordId) -> Result<Event, EventError> {
        let removed = self.events.remove(event_id)?;
        info!(event_id = %removed.id, "event deleted");
        Ok(removed)
    }

    /// Flip active/inactive; nothing else on the record changes.
    pub fn toggle_status(&self, event_id: &RecordId) -> Result<Event, EventError> {
        let event = self.events.update_with(event_id, |event: &mut Event| {
            event.status = event.status.toggled();
            Ok::<_, EventError>(())
        })?;
        info!(event_id = %event.id, status = event.status.label(), "event status toggled");
        Ok(event)
    }

    pub fn register(&self, event_id: &RecordId, attendee: User) -> Result<Event, EventError> {
        let now = self.clock.now();
        let event = self.events.update_with(event_id, |event: &mut Event| {
            check_registration(event, &attendee.id, now)?;
            event.attendees.push(attendee);
            Ok::<_, EventError>(())
        })?;
        info!(
            event_id = %event.id,
            registered = event.registered(),
            capacity = event.max_attendees,
            "attendee registered"
        );
        Ok(event)
    }

    pub fn get(&self, event_id: &RecordId) -> Result<Event, EventError> {
        let event = self
            .events
            .fetch(event_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(event)
    }

    pub fn browse(&self, query: &CatalogQuery) -> Result<Vec<Event>, EventError> {
        Ok(catalog::browse(self.events.as_ref(), query)?)
    }

    /// Soonest events still ahead of the clock, at most `limit` of them.
    pub fn upcoming(&self, limit: usize) -> Result<Vec<Event>, EventError> {
        let now = self.clock.now();
        let mut events: Vec<Event> = self
            .events
            .all()?
            .into_iter()
            .filter(|event| !event.is_past(now))
            .collect();
        events.sort_by_key(|event| event.date);
        events.truncate(limit);
        Ok(events)
    }
}

fn check_registration(
    event: &Event,
    attendee: &UserId,
    now: DateTime<Utc>,
) -> Result<(), RegistrationError> {
    if event.status != EventStatus::Active {
        return Err(RegistrationError::Inactive);
    }
    if now > event.registration_deadline {
        return Err(RegistrationError::DeadlinePassed {
            deadline: event.registration_deadline,
        });
    }
    if event.attendees.iter().any(|existing| &existing.id == attendee) {
        return Err(RegistrationError::AlreadyRegistered);
    }
    if event.seats_remaining() == 0 {
        return Err(RegistrationError::Full {
            capacity: event.max_attendees,
        });
    }
    Ok(())
}

/// Reasons a registration is turned away.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("event is not accepting registrations")]
    Inactive,
    #[error("registration closed at {deadline}")]
    DeadlinePassed { deadline: DateTime<Utc> },
    #[error("event is full ({capacity} seats)")]
    Full { capacity: u32 },
    #[error("attendee already registered")]
    AlreadyRegistered,
}

/// Error raised by the event service.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error(transparent)]
    Validation(#[from] FormRejected),
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
