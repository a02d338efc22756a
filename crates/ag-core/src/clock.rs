//! The page clock: one "now" captured at instantiation and advanced on ticks.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// How often the clock is advanced by default.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// A non-decreasing view of wall-clock time.
///
/// The clock never moves backwards, so a skewed sample cannot flip an ended
/// item back to live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    started_at: DateTime<Utc>,
    now: DateTime<Utc>,
}

impl Clock {
    pub const fn starting_at(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            now: started_at,
        }
    }

    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Advances to `sample` unless it lies in the past, returning the new now.
    pub fn advance_to(&mut self, sample: DateTime<Utc>) -> DateTime<Utc> {
        if sample > self.now {
            self.now = sample;
        }
        self.now
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.now - self.started_at
    }
}
