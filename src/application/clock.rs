//! # Clock
//!
//! Source of "now" for every time-sensitive use case. Deadlines are checked
//! against the clock at the moment of each write; there is no background
//! expiry job.

use crate::domain::value_objects::Timestamp;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Provides the current time.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<RwLock<Timestamp>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    #[must_use]
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(RwLock::new(start)),
        }
    }

    /// Sets the current time.
    pub fn set(&self, at: Timestamp) {
        *self.now.write() = at;
    }

    /// Moves the clock forward by `secs` seconds.
    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.write();
        *now = now.add_secs(secs);
    }

    /// Moves the clock forward by `days` days.
    pub fn advance_days(&self, days: i64) {
        let mut now = self.now.write();
        *now = now.add_days(days);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.read()
    }
}
