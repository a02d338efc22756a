//! Grouping of schedule items into concurrent slots.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::item::ScheduleItem;

/// Items that share one start time and therefore run in parallel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    start_date: DateTime<Utc>,
    items: Vec<ScheduleItem>,
}

impl Slot {
    pub const fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    /// Members in their original agenda order.
    pub fn items(&self) -> &[ScheduleItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Groups items by exact start time.
///
/// Slots appear in the order their start time is first seen, not in
/// chronological order, and members keep their input order. Every item lands
/// in exactly one slot.
pub fn group(items: &[ScheduleItem]) -> Vec<Slot> {
    let mut slots: Vec<Slot> = Vec::new();
    let mut index_by_start: HashMap<DateTime<Utc>, usize> = HashMap::new();

    for item in items {
        let start = item.start_date();
        if let Some(&idx) = index_by_start.get(&start) {
            slots[idx].items.push(item.clone());
        } else {
            index_by_start.insert(start, slots.len());
            slots.push(Slot {
                start_date: start,
                items: vec![item.clone()],
            });
        }
    }

    slots
}

/// The grouped display schedule for one page. Built once, never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScheduleTimeline {
    slots: Vec<Slot>,
}

impl ScheduleTimeline {
    pub fn new(items: &[ScheduleItem]) -> Self {
        Self {
            slots: group(items),
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Every item, slot by slot.
    pub fn items(&self) -> impl Iterator<Item = &ScheduleItem> {
        self.slots.iter().flat_map(|slot| slot.items.iter())
    }

    /// Items whose `[start, end)` contains `now`.
    pub fn scheduled_at(&self, now: DateTime<Utc>) -> Vec<&ScheduleItem> {
        self.items()
            .filter(|item| item.is_scheduled_at(now))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
