//! Generate command: emits a demo agenda payload.

use std::io::Write;

use ag_core::RawScheduleItem;
use ag_core::demo::demo_agenda;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use url::Url;

pub fn run<W: Write>(writer: &mut W, start: DateTime<Utc>, base_url: &Url) -> Result<()> {
    let items = demo_agenda(start, base_url).context("failed to build demo agenda")?;
    let raw: Vec<RawScheduleItem> = items.iter().map(RawScheduleItem::from).collect();
    writeln!(writer, "{}", serde_json::to_string_pretty(&raw)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use ag_core::Agenda;
    use chrono::TimeZone;

    #[test]
    fn generated_agenda_loads_cleanly() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let base = Url::parse("https://live.example.com/").unwrap();

        let mut output = Vec::new();
        run(&mut output, start, &base).unwrap();

        let load = Agenda::from_json(&String::from_utf8(output).unwrap()).unwrap();
        assert!(load.rejected.is_empty());
        assert_eq!(load.agenda.items().count(), 4);
        assert_eq!(load.agenda.slots().len(), 3);
    }

    #[test]
    fn generated_agenda_uses_camel_case_keys() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let base = Url::parse("https://live.example.com/").unwrap();

        let mut output = Vec::new();
        run(&mut output, start, &base).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains(r#""startDate": "2025-03-01T09:00:00+00:00""#));
        assert!(output.contains(r#""eventId": "demo-keynote""#));
        assert!(output.contains(r#""url": "https://live.example.com/sessions/keynote""#));
    }
}
