//! Loading an agenda payload into a validated, grouped schedule.
//!
//! Malformed entries never fail the whole load: they are excluded from the
//! timeline and reported alongside it.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::item::{ItemError, RawScheduleItem, ScheduleItem};
use crate::slot::{ScheduleTimeline, Slot};

#[derive(Debug, Error)]
pub enum AgendaError {
    /// The payload was not a JSON array.
    #[error("agenda must be a JSON array: {0}")]
    NotAnArray(#[source] serde_json::Error),
}

/// An agenda entry that was excluded, with its position in the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub index: usize,
    pub error: ItemError,
}

/// Result of loading an agenda.
#[derive(Debug, Clone)]
pub struct AgendaLoad {
    pub agenda: Agenda,
    pub rejected: Vec<Rejected>,
}

/// The schedule for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Agenda {
    timeline: ScheduleTimeline,
}

impl Agenda {
    pub fn from_items(items: &[ScheduleItem]) -> Self {
        Self {
            timeline: ScheduleTimeline::new(items),
        }
    }

    /// Validates raw entries, keeping the good ones in input order.
    pub fn from_raw(raw: Vec<RawScheduleItem>) -> AgendaLoad {
        let mut items = Vec::with_capacity(raw.len());
        let mut rejected = Vec::new();

        for (index, entry) in raw.into_iter().enumerate() {
            match ScheduleItem::try_from(entry) {
                Ok(item) => items.push(item),
                Err(error) => rejected.push(Rejected { index, error }),
            }
        }

        finish(&items, rejected)
    }

    /// Parses a JSON array of agenda entries.
    ///
    /// Only a non-array payload is an error; entries that fail to deserialize
    /// are rejected individually.
    pub fn from_json(json: &str) -> Result<AgendaLoad, AgendaError> {
        let values: Vec<serde_json::Value> =
            serde_json::from_str(json).map_err(AgendaError::NotAnArray)?;

        let mut items = Vec::with_capacity(values.len());
        let mut rejected = Vec::new();

        for (index, value) in values.into_iter().enumerate() {
            let parsed = serde_json::from_value::<RawScheduleItem>(value)
                .map_err(|err| ItemError::Malformed {
                    reason: err.to_string(),
                })
                .and_then(ScheduleItem::try_from);
            match parsed {
                Ok(item) => items.push(item),
                Err(error) => rejected.push(Rejected { index, error }),
            }
        }

        Ok(finish(&items, rejected))
    }

    pub const fn timeline(&self) -> &ScheduleTimeline {
        &self.timeline
    }

    pub fn slots(&self) -> &[Slot] {
        self.timeline.slots()
    }

    pub fn items(&self) -> impl Iterator<Item = &ScheduleItem> {
        self.timeline.items()
    }

    pub fn scheduled_at(&self, now: DateTime<Utc>) -> Vec<&ScheduleItem> {
        self.timeline.scheduled_at(now)
    }

    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }
}

/// Rejected entries are returned, not logged; reporting them is up to the caller.
fn finish(items: &[ScheduleItem], rejected: Vec<Rejected>) -> AgendaLoad {
    let agenda = Agenda::from_items(items);
    tracing::debug!(
        items = items.len(),
        slots = agenda.timeline.len(),
        rejected = rejected.len(),
        "agenda loaded"
    );
    AgendaLoad { agenda, rejected }
}
