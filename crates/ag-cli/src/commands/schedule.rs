//! Schedule command: the grouped agenda with live status labels.

use std::io::Write;

use ag_core::{Agenda, Classification, ScheduleItem};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

const SLOT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SlotView<'a> {
    start_date: DateTime<Utc>,
    items: Vec<ItemView<'a>>,
}

#[derive(Serialize)]
struct ItemView<'a> {
    #[serde(flatten)]
    item: &'a ScheduleItem,
    #[serde(flatten)]
    classification: Classification,
}

pub fn run<W: Write>(writer: &mut W, agenda: &Agenda, now: DateTime<Utc>, json: bool) -> Result<()> {
    if json {
        let slots: Vec<SlotView<'_>> = agenda
            .slots()
            .iter()
            .map(|slot| SlotView {
                start_date: slot.start_date(),
                items: slot
                    .items()
                    .iter()
                    .map(|item| ItemView {
                        item,
                        classification: item.classify(now),
                    })
                    .collect(),
            })
            .collect();
        writeln!(writer, "{}", serde_json::to_string_pretty(&slots)?)?;
        return Ok(());
    }

    writeln!(writer, "Agenda at {}", now.format(SLOT_TIME_FORMAT))?;

    if agenda.is_empty() {
        writeln!(writer, "No sessions scheduled.")?;
        return Ok(());
    }

    for slot in agenda.slots() {
        writeln!(writer)?;
        writeln!(writer, "{}", slot.start_date().format(SLOT_TIME_FORMAT))?;
        for item in slot.items() {
            let Classification { label, status } = item.classify(now);
            writeln!(writer, "  {} ({status}): {label}", item.title())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use ag_core::demo::demo_agenda;
    use chrono::{Duration, TimeZone};
    use insta::assert_snapshot;
    use url::Url;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn agenda() -> Agenda {
        let base = Url::parse("https://live.example.com/").unwrap();
        Agenda::from_items(&demo_agenda(start(), &base).unwrap())
    }

    fn render(agenda: &Agenda, now: DateTime<Utc>, json: bool) -> String {
        let mut output = Vec::new();
        run(&mut output, agenda, now, json).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn schedule_renders_slots_with_status() {
        let output = render(&agenda(), start() + Duration::minutes(30), false);
        assert_snapshot!(output, @r"
        Agenda at 2025-03-01 09:30 UTC

        2025-03-01 09:00 UTC
          Opening keynote (live): Live now

        2025-03-01 10:00 UTC
          Breakout: Product roadmap (upcoming): Live in: 30 minutes
          Breakout: Engineering deep dive (upcoming): Live in: 30 minutes

        2025-03-01 11:00 UTC
          Closing remarks (upcoming): Live in: 1 hour, 30 minutes
        ");
    }

    #[test]
    fn schedule_marks_ended_sessions() {
        let output = render(&agenda(), start() + Duration::minutes(105), false);
        assert!(output.contains("Opening keynote (ended): Ended"));
        assert!(output.contains("Breakout: Product roadmap (ended): Ended"));
        assert!(output.contains("Breakout: Engineering deep dive (live): Live now"));
        assert!(output.contains("Closing remarks (upcoming): Live in: 15 minutes"));
    }

    #[test]
    fn schedule_handles_empty_agenda() {
        let output = render(&Agenda::default(), start(), false);
        assert!(output.contains("No sessions scheduled."));
    }

    #[test]
    fn schedule_json_includes_status_and_label() {
        let output = render(&agenda(), start(), true);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        let slots = value.as_array().unwrap();
        assert_eq!(slots.len(), 3);

        let keynote = &slots[0]["items"][0];
        assert_eq!(keynote["title"], "Opening keynote");
        assert_eq!(keynote["eventId"], "demo-keynote");
        assert_eq!(keynote["status"], "live");
        assert_eq!(keynote["label"], "Live now");
        assert_eq!(slots[1]["items"].as_array().unwrap().len(), 2);
    }
}
