//! Monthly statistics.

use std::fmt;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use clk_core::{TrackerData, format_hm, monthly_statistics};

pub fn run<W, Tz>(
    writer: &mut W,
    data: &TrackerData,
    months: usize,
    json: bool,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
{
    let stats = monthly_statistics(data, months, now, tz);

    if json {
        let value: Vec<_> = stats
            .iter()
            .map(|stat| {
                json!({
                    "year": stat.year,
                    "month": stat.month,
                    "totalSeconds": stat.total_seconds,
                })
            })
            .collect();
        writeln!(writer, "{}", serde_json::to_string_pretty(&value)?)?;
        return Ok(());
    }

    for stat in stats {
        writeln!(writer, "{}  {}", stat.key(), format_hm(stat.total_seconds))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use clk_core::TimeEntry;

    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn stats_zero_fill_and_order() {
        let data = TrackerData {
            entries: vec![
                TimeEntry::new(ts("2025-11-03T09:00:00Z"), ts("2025-11-03T11:00:00Z")).unwrap(),
                TimeEntry::new(ts("2026-01-18T09:00:00Z"), ts("2026-01-18T17:00:00Z")).unwrap(),
            ],
            ..TrackerData::default()
        };

        let mut output = Vec::new();
        run(&mut output, &data, 3, false, ts("2026-01-18T18:00:00Z"), &Utc).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        2025-11  2h 0m
        2025-12  0h 0m
        2026-01  8h 0m
        ");
    }

    #[test]
    fn stats_json_shape() {
        let mut output = Vec::new();
        run(
            &mut output,
            &TrackerData::default(),
            2,
            true,
            ts("2026-01-18T18:00:00Z"),
            &Utc,
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[0]["year"], 2025);
        assert_eq!(value[0]["month"], 12);
        assert_eq!(value[0]["totalSeconds"], 0);
        assert_eq!(value[1]["month"], 1);
    }
}
