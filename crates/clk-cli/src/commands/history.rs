//! History listing, grouped by day.

use std::fmt;
use std::io::Write;

use anyhow::Result;
use chrono::TimeZone;
use serde_json::json;

use clk_core::{TrackerData, entries_by_date, format_hm};

use super::util::hhmm;

pub fn run<W, Tz>(writer: &mut W, data: &TrackerData, json: bool, tz: &Tz) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let grouped = entries_by_date(&data.entries, tz);

    if json {
        let value: Vec<_> = grouped
            .iter()
            .map(|(date, entries)| {
                json!({
                    "date": date,
                    "entries": entries
                        .iter()
                        .map(|entry| {
                            json!({
                                "id": entry.id(),
                                "clockIn": entry.clock_in(),
                                "clockOut": entry.clock_out(),
                                "durationSeconds": entry.duration_seconds(),
                            })
                        })
                        .collect::<Vec<_>>(),
                })
            })
            .collect();
        writeln!(writer, "{}", serde_json::to_string_pretty(&value)?)?;
        return Ok(());
    }

    if grouped.is_empty() {
        writeln!(writer, "No entries.")?;
        return Ok(());
    }

    for (date, entries) in grouped {
        let total: i64 = entries.iter().map(|e| e.duration_seconds()).sum();
        writeln!(writer, "{date}  ({})", format_hm(total))?;
        for entry in entries {
            let id = entry.id().to_string();
            writeln!(
                writer,
                "  {} - {}  {:>8}  {}",
                hhmm(entry.clock_in(), tz),
                hhmm(entry.clock_out(), tz),
                format_hm(entry.duration_seconds()),
                &id[..8]
            )?;
        }
    }
    Ok(())
}
