//! Session status classification against wall-clock time.
//!
//! Items occupy the half-open interval `[start, end)`: an item is live at its
//! start instant and ended at its end instant.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const MS_PER_MINUTE: i64 = 60_000;
const MINUTES_PER_HOUR: i64 = 60;

/// Where an item sits relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// The item has not started yet.
    Upcoming,
    /// The item is running.
    Live,
    /// The item has finished.
    Ended,
}

impl SessionStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Live => "live",
            Self::Ended => "ended",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status plus the human-readable label shown next to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub label: String,
    pub status: SessionStatus,
}

/// Classifies `[start, end)` against `now`.
pub fn classify(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> Classification {
    if now < start {
        Classification {
            label: format!("Live in: {}", human_duration(start - now)),
            status: SessionStatus::Upcoming,
        }
    } else if now < end {
        Classification {
            label: "Live now".to_string(),
            status: SessionStatus::Live,
        }
    } else {
        Classification {
            label: "Ended".to_string(),
            status: SessionStatus::Ended,
        }
    }
}

/// Renders a duration as hours and minutes, largest unit first.
///
/// Partial minutes round up, so any positive duration reads at least
/// "1 minute". Negative durations render as zero.
pub fn human_duration(duration: Duration) -> String {
    let ms = duration.num_milliseconds().max(0);
    let minutes = (ms + MS_PER_MINUTE - 1) / MS_PER_MINUTE;
    let hours = minutes / MINUTES_PER_HOUR;
    let minutes = minutes % MINUTES_PER_HOUR;

    match (hours, minutes) {
        (0, m) => count(m, "minute"),
        (h, 0) => count(h, "hour"),
        (h, m) => format!("{}, {}", count(h, "hour"), count(m, "minute")),
    }
}

fn count(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}
