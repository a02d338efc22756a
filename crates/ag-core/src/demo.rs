//! Locally synthesized agendas for demos and manual testing.

use chrono::{DateTime, Duration, Utc};
use url::Url;

use crate::item::{ItemError, ScheduleItem};
use crate::types::EventId;

/// (slug, title, offset from start in minutes, length in minutes)
const DEMO_SESSIONS: &[(&str, &str, i64, i64)] = &[
    ("keynote", "Opening keynote", 0, 45),
    ("track-product", "Breakout: Product roadmap", 60, 45),
    ("track-engineering", "Breakout: Engineering deep dive", 60, 60),
    ("closing", "Closing remarks", 120, 30),
];

/// Builds a demo agenda starting at `start`, with session pages under `base_url`.
///
/// The agenda has a keynote, two parallel breakouts that end at different
/// times, and a closing session.
pub fn demo_agenda(start: DateTime<Utc>, base_url: &Url) -> Result<Vec<ScheduleItem>, ItemError> {
    DEMO_SESSIONS
        .iter()
        .map(|&(slug, title, offset, length)| {
            let path = format!("sessions/{slug}");
            let url = base_url
                .join(&path)
                .map_err(|source| ItemError::InvalidUrl {
                    title: title.to_string(),
                    url: path,
                    source,
                })?;
            let event_id = EventId::new(format!("demo-{slug}")).map_err(|source| {
                ItemError::InvalidEventId {
                    title: title.to_string(),
                    source,
                }
            })?;
            let begins = start + Duration::minutes(offset);
            ScheduleItem::new(title, begins, begins + Duration::minutes(length), url, event_id)
        })
        .collect()
}
