//! Wall clock used to stamp entities.
//!
//! Timestamps are kept at millisecond precision so that what the store hands
//! out is exactly what survives a round trip through the persisted format.

use crate::Timestamp;
use chrono::{DurationRound, TimeDelta, Utc};
use std::sync::Mutex;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current time, truncated to milliseconds.
    fn now(&self) -> Timestamp;

    /// A timestamp strictly later than `previous`.
    ///
    /// Uses the current time unless the clock has not advanced past
    /// `previous`, in which case `previous + 1ms` is returned.
    fn after(&self, previous: Timestamp) -> Timestamp {
        let now = self.now();
        if now > previous {
            now
        } else {
            previous + TimeDelta::milliseconds(1)
        }
    }
}

/// Truncate a timestamp to millisecond precision.
pub fn truncate_millis(ts: Timestamp) -> Timestamp {
    ts.duration_trunc(TimeDelta::milliseconds(1)).unwrap_or(ts)
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        truncate_millis(Utc::now())
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<Timestamp>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: Mutex::new(truncate_millis(start)),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: TimeDelta) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += by;
    }

    /// Jump to a specific time.
    pub fn set(&self, to: Timestamp) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = truncate_millis(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}
