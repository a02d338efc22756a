//! Shared utilities for CLI commands.

use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use ag_core::{Agenda, AgendaLoad};
use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(in)\s+)?(\d+)\s+(minute|hour|day|week)s?(?:\s+(ago))?$").unwrap()
});

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Parse a datetime string as either ISO 8601 or relative to `now`.
///
/// Supports:
/// - ISO 8601: "2026-01-15T10:30:00Z"
/// - Past: "2 hours ago", "30 minutes ago"
/// - Future: "in 2 hours", "in 1 day"
pub fn parse_datetime(s: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30:00Z) or relative (e.g., 'in 2 hours', '30 minutes ago')"
        );
    };

    let future = caps.get(1).is_some();
    let past = caps.get(4).is_some();
    if future == past {
        anyhow::bail!("Invalid datetime: {s}. Use either 'in N units' or 'N units ago'");
    }

    let n: i64 = caps[2]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[3] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[3]);
    }

    let offset = Duration::minutes(n * minutes_per_unit);
    Ok(if future { now + offset } else { now - offset })
}

/// Reads and validates an agenda from a file, or from stdin when `path` is `-`.
pub fn load_agenda(path: &Path) -> anyhow::Result<AgendaLoad> {
    let json = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read agenda from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read agenda {}", path.display()))?
    };

    let load = Agenda::from_json(&json)
        .with_context(|| format!("failed to parse agenda {}", path.display()))?;
    for rejected in &load.rejected {
        eprintln!("Skipping agenda entry {}: {}", rejected.index, rejected.error);
    }
    Ok(load)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn parses_iso_8601() {
        let dt = parse_datetime("2025-03-01T09:30:00+01:00", now()).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap());
    }

    #[test]
    fn parses_past_and_future_relative_times() {
        assert_eq!(
            parse_datetime("2 hours ago", now()).unwrap(),
            now() - Duration::hours(2)
        );
        assert_eq!(
            parse_datetime("in 30 minutes", now()).unwrap(),
            now() + Duration::minutes(30)
        );
        assert_eq!(
            parse_datetime("in 1 week", now()).unwrap(),
            now() + Duration::weeks(1)
        );
    }

    #[test]
    fn rejects_ambiguous_relative_time() {
        assert!(parse_datetime("in 2 hours ago", now()).is_err());
        assert!(parse_datetime("2 hours", now()).is_err());
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_datetime("next tuesday", now()).unwrap_err();
        assert!(err.to_string().contains("Invalid datetime"));
    }

    #[test]
    fn rejects_huge_values() {
        assert!(parse_datetime("in 99999999 weeks", now()).is_err());
    }

    #[test]
    fn load_agenda_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_agenda(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read agenda"));
    }

    #[test]
    fn load_agenda_skips_bad_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agenda.json");
        std::fs::write(
            &path,
            r#"[
                {"title": "Keynote", "startDate": "2025-03-01T09:00:00Z", "endDate": "2025-03-01T10:00:00Z",
                 "url": "https://live.example.com/keynote", "eventId": "evt-keynote"},
                {"title": "Backwards", "startDate": "2025-03-01T10:00:00Z", "endDate": "2025-03-01T09:00:00Z",
                 "url": "https://live.example.com/backwards", "eventId": "evt-backwards"}
            ]"#,
        )
        .unwrap();

        let load = load_agenda(&path).unwrap();
        assert_eq!(load.agenda.items().count(), 1);
        assert_eq!(load.rejected.len(), 1);
    }
}
