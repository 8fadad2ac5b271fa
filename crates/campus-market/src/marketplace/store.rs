use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::RecordId;

/// Anything kept in a collection store.
pub trait Record: Clone + Send + Sync + 'static {
    fn record_id(&self) -> &RecordId;
}

/// Ordered storage abstraction so services can be exercised in isolation.
///
/// `insert` places the record first, matching the newest-first feeds; `update` replaces a
/// record in place so ordering is preserved across edits.
pub trait RecordRepository<T: Record>: Send + Sync {
    fn insert(&self, record: T) -> Result<T, RepositoryError>;
    fn update(&self, record: T) -> Result<(), RepositoryError>;
    /// Read-modify-write of one record as a single step. The record is only written back
    /// when `change` succeeds, and `change` must not alter its id.
    fn update_with<E, F>(&self, id: &RecordId, change: F) -> Result<T, E>
    where
        E: From<RepositoryError>,
        F: FnOnce(&mut T) -> Result<(), E>;
    fn fetch(&self, id: &RecordId) -> Result<Option<T>, RepositoryError>;
    fn remove(&self, id: &RecordId) -> Result<T, RepositoryError>;
    fn all(&self) -> Result<Vec<T>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-memory collection; cloning shares the underlying sequence.
pub struct InMemoryRepository<T> {
    records: Arc<Mutex<Vec<T>>>,
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T> Clone for InMemoryRepository<T> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<T: Record> InMemoryRepository<T> {
    /// Seed in the given order; fixtures arrive newest first already.
    pub fn seeded(records: Vec<T>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    /// Append records behind the current contents.
    ///
    /// All or nothing: an id already stored, or repeated within `records`, rejects the whole
    /// batch.
    pub fn extend(&self, records: Vec<T>) -> Result<usize, RepositoryError> {
        let mut guard = self.lock()?;
        let mut seen: HashSet<&RecordId> = guard.iter().map(Record::record_id).collect();
        if !records.iter().all(|record| seen.insert(record.record_id())) {
            return Err(RepositoryError::Conflict);
        }
        let added = records.len();
        guard.extend(records);
        Ok(added)
    }

    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<T>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("collection mutex poisoned".to_string()))
    }
}

impl<T: Record> RecordRepository<T> for InMemoryRepository<T> {
    fn insert(&self, record: T) -> Result<T, RepositoryError> {
        let mut guard = self.lock()?;
        if guard
            .iter()
            .any(|existing| existing.record_id() == record.record_id())
        {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(0, record.clone());
        Ok(record)
    }

    fn update(&self, record: T) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        let slot = guard
            .iter_mut()
            .find(|existing| existing.record_id() == record.record_id())
            .ok_or(RepositoryError::NotFound)?;
        *slot = record;
        Ok(())
    }

    fn update_with<E, F>(&self, id: &RecordId, change: F) -> Result<T, E>
    where
        E: From<RepositoryError>,
        F: FnOnce(&mut T) -> Result<(), E>,
    {
        let mut guard = self.lock()?;
        let slot = guard
            .iter_mut()
            .find(|existing| existing.record_id() == id)
            .ok_or(RepositoryError::NotFound)?;
        let mut working = slot.clone();
        change(&mut working)?;
        *slot = working.clone();
        Ok(working)
    }

    fn fetch(&self, id: &RecordId) -> Result<Option<T>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.iter().find(|record| record.record_id() == id).cloned())
    }

    fn remove(&self, id: &RecordId) -> Result<T, RepositoryError> {
        let mut guard = self.lock()?;
        let index = guard
            .iter()
            .position(|record| record.record_id() == id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(guard.remove(index))
    }

    fn all(&self) -> Result<Vec<T>, RepositoryError> {
        Ok(self.lock()?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: RecordId,
        body: &'static str,
    }

    impl Record for Note {
        fn record_id(&self) -> &RecordId {
            &self.id
        }
    }

    fn note(id: &str, body: &'static str) -> Note {
        Note {
            id: RecordId::new(id),
            body,
        }
    }

    #[test]
    fn insert_places_newest_first_and_rejects_duplicates() {
        let repository = InMemoryRepository::seeded(vec![note("a", "first"), note("b", "second")]);
        repository.insert(note("c", "third")).expect("insert succeeds");

        let ids: Vec<_> = repository
            .all()
            .expect("snapshot")
            .into_iter()
            .map(|note| note.id.0)
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);

        assert!(matches!(
            repository.insert(note("a", "again")),
            Err(RepositoryError::Conflict)
        ));
    }

    #[test]
    fn update_replaces_in_place() {
        let repository = InMemoryRepository::seeded(vec![note("a", "first"), note("b", "second")]);
        repository
            .update(note("a", "edited"))
            .expect("update succeeds");

        let all = repository.all().expect("snapshot");
        assert_eq!(all[0], note("a", "edited"));
        assert!(matches!(
            repository.update(note("z", "missing")),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn remove_returns_the_record() {
        let repository = InMemoryRepository::seeded(vec![note("a", "first")]);
        let removed = repository.remove(&RecordId::new("a")).expect("removed");
        assert_eq!(removed.body, "first");
        assert!(repository.is_empty().expect("length"));
        assert!(matches!(
            repository.remove(&RecordId::new("a")),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn clones_share_storage() {
        let repository = InMemoryRepository::<Note>::default();
        let alias = repository.clone();
        alias.insert(note("a", "shared")).expect("insert");
        assert_eq!(repository.len().expect("length"), 1);
        assert_eq!(
            repository.extend(vec![note("b", "tail")]).expect("extend"),
            1
        );
        assert_eq!(
            repository.fetch(&RecordId::new("b")).expect("fetch"),
            Some(note("b", "tail"))
        );
    }

    #[test]
    fn extend_rejects_the_whole_batch_on_any_duplicate() {
        let repository = InMemoryRepository::seeded(vec![note("a", "first"), note("b", "second")]);

        assert!(matches!(
            repository.extend(vec![note("c", "fresh"), note("a", "clash")]),
            Err(RepositoryError::Conflict)
        ));
        assert!(matches!(
            repository.extend(vec![note("d", "once"), note("d", "twice")]),
            Err(RepositoryError::Conflict)
        ));
        assert_eq!(repository.len().expect("length"), 2);
        assert_eq!(repository.fetch(&RecordId::new("c")).expect("fetch"), None);
    }

    #[test]
    fn update_with_writes_back_only_on_success() {
        let repository = InMemoryRepository::seeded(vec![note("a", "first")]);

        let edited = repository
            .update_with(&RecordId::new("a"), |note| {
                note.body = "edited";
                Ok::<_, RepositoryError>(())
            })
            .expect("update succeeds");
        assert_eq!(edited, note("a", "edited"));

        let refused = repository.update_with(&RecordId::new("a"), |note| {
            note.body = "discarded";
            Err(RepositoryError::Conflict)
        });
        assert!(matches!(refused, Err(RepositoryError::Conflict)));
        assert_eq!(
            repository.fetch(&RecordId::new("a")).expect("fetch"),
            Some(note("a", "edited"))
        );

        let missing =
            repository.update_with(&RecordId::new("z"), |_| Ok::<_, RepositoryError>(()));
        assert!(matches!(missing, Err(RepositoryError::NotFound)));
    }
}
