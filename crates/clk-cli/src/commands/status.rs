//! Status command: tracking state and current totals.

use std::fmt;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};

use clk_core::{format_hm, format_hms, this_month_duration, today_duration};
use clk_engine::Tracker;

use super::util::hhmm;

pub fn run<W, Tz>(writer: &mut W, tracker: &Tracker, now: DateTime<Utc>, tz: &Tz) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if let Some(session) = tracker.data().current_session {
        writeln!(
            writer,
            "Tracking since {} ({})",
            hhmm(session.clock_in, tz),
            format_hms(session.elapsed_seconds(now))
        )?;
    } else {
        writeln!(writer, "Not tracking")?;
    }

    writeln!(
        writer,
        "Today: {}",
        format_hm(today_duration(tracker.data(), now, tz))
    )?;
    writeln!(
        writer,
        "This month: {}",
        format_hm(this_month_duration(tracker.data(), now, tz))
    )?;

    if let Some(error) = tracker.last_error() {
        writeln!(writer, "Last error: {error}")?;
    }

    Ok(())
}
