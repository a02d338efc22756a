//! Schedule items and their wire representation.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::status::{Classification, classify};
use crate::types::{EventId, ValidationError};

/// Reasons a raw agenda entry cannot become a [`ScheduleItem`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ItemError {
    /// The entry was not shaped like a schedule item at all.
    #[error("malformed agenda entry: {reason}")]
    Malformed { reason: String },

    /// The entry had no destination URL.
    #[error("{title:?} has no url")]
    MissingUrl { title: String },

    /// The destination URL did not parse as an absolute URL.
    #[error("{title:?} has an invalid url {url:?}: {source}")]
    InvalidUrl {
        title: String,
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A start or end date could not be interpreted.
    #[error("{title:?} has an invalid {field}: {value}")]
    InvalidDate {
        title: String,
        field: &'static str,
        value: String,
    },

    /// The item ends at or before it starts.
    #[error("{title:?} ends at or before it starts ({start} >= {end})")]
    EmptyInterval {
        title: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// The event ID failed validation.
    #[error("{title:?}: {source}")]
    InvalidEventId {
        title: String,
        #[source]
        source: ValidationError,
    },
}

/// A timestamp as it appears in agenda payloads: ISO 8601 text or epoch millis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Millis(i64),
    Text(String),
}

impl RawTimestamp {
    fn resolve(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            Self::Text(text) => DateTime::parse_from_rfc3339(text)
                .map(|dt| dt.with_timezone(&Utc))
                .or_else(|_| {
                    // ISO 8601 without an offset is read as UTC.
                    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                        .map(|naive| naive.and_utc())
                })
                .ok(),
        }
    }
}

impl std::fmt::Display for RawTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Millis(ms) => write!(f, "{ms}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// An agenda entry exactly as fetched or generated, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScheduleItem {
    pub title: String,
    pub start_date: RawTimestamp,
    pub end_date: RawTimestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub event_id: String,
}

/// One bookable session occupying `[start_date, end_date)`.
///
/// Construction enforces `start_date < end_date`; items are immutable after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    title: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    url: Url,
    event_id: EventId,
}

impl ScheduleItem {
    /// Creates an item, rejecting empty or inverted intervals.
    pub fn new(
        title: impl Into<String>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        url: Url,
        event_id: EventId,
    ) -> Result<Self, ItemError> {
        let title = title.into();
        if start_date >= end_date {
            return Err(ItemError::EmptyInterval {
                title,
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            title,
            start_date,
            end_date,
            url,
            event_id,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub const fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub const fn end_date(&self) -> DateTime<Utc> {
        self.end_date
    }

    pub const fn url(&self) -> &Url {
        &self.url
    }

    pub const fn event_id(&self) -> &EventId {
        &self.event_id
    }

    /// Whether `now` falls inside `[start_date, end_date)`.
    pub fn is_scheduled_at(&self, now: DateTime<Utc>) -> bool {
        self.start_date <= now && now < self.end_date
    }

    pub fn classify(&self, now: DateTime<Utc>) -> Classification {
        classify(now, self.start_date, self.end_date)
    }
}

impl TryFrom<RawScheduleItem> for ScheduleItem {
    type Error = ItemError;

    fn try_from(raw: RawScheduleItem) -> Result<Self, Self::Error> {
        let RawScheduleItem {
            title,
            start_date,
            end_date,
            url,
            event_id,
        } = raw;

        let Some(start) = start_date.resolve() else {
            return Err(ItemError::InvalidDate {
                title,
                field: "startDate",
                value: start_date.to_string(),
            });
        };
        let Some(end) = end_date.resolve() else {
            return Err(ItemError::InvalidDate {
                title,
                field: "endDate",
                value: end_date.to_string(),
            });
        };

        let Some(url) = url.filter(|u| !u.trim().is_empty()) else {
            return Err(ItemError::MissingUrl { title });
        };
        let url = match Url::parse(url.trim()) {
            Ok(parsed) => parsed,
            Err(source) => {
                return Err(ItemError::InvalidUrl { title, url, source });
            }
        };

        let event_id = match EventId::new(event_id) {
            Ok(id) => id,
            Err(source) => return Err(ItemError::InvalidEventId { title, source }),
        };

        Self::new(title, start, end, url, event_id)
    }
}

impl From<&ScheduleItem> for RawScheduleItem {
    fn from(item: &ScheduleItem) -> Self {
        Self {
            title: item.title.clone(),
            start_date: RawTimestamp::Text(item.start_date.to_rfc3339()),
            end_date: RawTimestamp::Text(item.end_date.to_rfc3339()),
            url: Some(item.url.to_string()),
            event_id: item.event_id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(start: RawTimestamp, end: RawTimestamp, url: Option<&str>) -> RawScheduleItem {
        RawScheduleItem {
            title: "Keynote".to_string(),
            start_date: start,
            end_date: end,
            url: url.map(str::to_string),
            event_id: "evt-1".to_string(),
        }
    }

    fn text(s: &str) -> RawTimestamp {
        RawTimestamp::Text(s.to_string())
    }

    #[test]
    fn raw_item_accepts_rfc3339_and_millis() {
        let item = ScheduleItem::try_from(raw(
            text("2025-03-01T10:00:00+01:00"),
            RawTimestamp::Millis(1_740_823_200_000),
            Some("https://events.example.com/keynote"),
        ))
        .unwrap();

        assert_eq!(item.start_date().to_rfc3339(), "2025-03-01T09:00:00+00:00");
        assert_eq!(item.end_date().to_rfc3339(), "2025-03-01T10:00:00+00:00");
        assert_eq!(item.event_id().as_str(), "evt-1");
    }

    #[test]
    fn raw_item_reads_offsetless_iso_dates_as_utc() {
        let item = ScheduleItem::try_from(raw(
            text("2025-03-01T09:00:00"),
            text("2025-03-01T10:30:00.500"),
            Some("https://events.example.com/keynote"),
        ))
        .unwrap();

        assert_eq!(item.start_date().to_rfc3339(), "2025-03-01T09:00:00+00:00");
        assert_eq!(
            item.end_date().to_rfc3339(),
            "2025-03-01T10:30:00.500+00:00"
        );
    }

    #[test]
    fn raw_item_deserializes_camel_case() {
        let json = r#"{
            "title": "Keynote",
            "startDate": "2025-03-01T09:00:00Z",
            "endDate": 1740823200000,
            "url": "https://events.example.com/keynote",
            "eventId": "evt-1"
        }"#;
        let parsed: RawScheduleItem = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.start_date, text("2025-03-01T09:00:00Z"));
        assert_eq!(parsed.end_date, RawTimestamp::Millis(1_740_823_200_000));
    }

    #[test]
    fn rejects_inverted_interval() {
        let err = ScheduleItem::try_from(raw(
            text("2025-03-01T10:00:00Z"),
            text("2025-03-01T10:00:00Z"),
            Some("https://events.example.com/keynote"),
        ))
        .unwrap_err();
        assert!(matches!(err, ItemError::EmptyInterval { .. }));
    }

    #[test]
    fn rejects_missing_url() {
        let err = ScheduleItem::try_from(raw(
            text("2025-03-01T09:00:00Z"),
            text("2025-03-01T10:00:00Z"),
            None,
        ))
        .unwrap_err();
        assert_eq!(
            err,
            ItemError::MissingUrl {
                title: "Keynote".to_string()
            }
        );
    }

    #[test]
    fn rejects_relative_url() {
        let err = ScheduleItem::try_from(raw(
            text("2025-03-01T09:00:00Z"),
            text("2025-03-01T10:00:00Z"),
            Some("/sessions/keynote"),
        ))
        .unwrap_err();
        assert!(matches!(err, ItemError::InvalidUrl { .. }));
    }

    #[test]
    fn rejects_unparsable_date() {
        let err = ScheduleItem::try_from(raw(
            text("tomorrow-ish"),
            text("2025-03-01T10:00:00Z"),
            Some("https://events.example.com/keynote"),
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            ItemError::InvalidDate {
                field: "startDate",
                ..
            }
        ));
    }

    #[test]
    fn rejects_blank_event_id() {
        let mut entry = raw(
            text("2025-03-01T09:00:00Z"),
            text("2025-03-01T10:00:00Z"),
            Some("https://events.example.com/keynote"),
        );
        entry.event_id = " ".to_string();
        let err = ScheduleItem::try_from(entry).unwrap_err();
        assert!(matches!(err, ItemError::InvalidEventId { .. }));
    }

    #[test]
    fn raw_form_preserves_fields() {
        let item = ScheduleItem::try_from(raw(
            text("2025-03-01T09:00:00Z"),
            text("2025-03-01T10:00:00Z"),
            Some("https://events.example.com/keynote"),
        ))
        .unwrap();
        let back = ScheduleItem::try_from(RawScheduleItem::from(&item)).unwrap();
        assert_eq!(back, item);
    }
}
