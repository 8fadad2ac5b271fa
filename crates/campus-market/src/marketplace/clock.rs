use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use super::domain::RecordId;

/// Source of "now" for timestamps and deadline checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Frozen clock for demos and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Monotonic generator of prefixed record ids (`evt-000001`, `post-000002`, ...).
#[derive(Debug)]
pub struct IdSequence {
    prefix: &'static str,
    next: AtomicU64,
}

impl IdSequence {
    pub const fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            next: AtomicU64::new(1),
        }
    }

    pub fn next_id(&self) -> RecordId {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        RecordId(format!("{}-{id:06}", self.prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_prefixed_and_padded() {
        let ids = IdSequence::new("evt");
        assert_eq!(ids.next_id().0, "evt-000001");
        assert_eq!(ids.next_id().0, "evt-000002");
    }
}
