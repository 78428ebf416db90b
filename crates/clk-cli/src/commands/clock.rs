//! Clock-in, clock-out and toggle commands.

use std::fmt;
use std::io::Write;

use anyhow::Result;
use chrono::{TimeZone, Utc};

use clk_core::format_hm;
use clk_engine::Tracker;

use super::util::hhmm;

pub fn clock_in<W, Tz>(writer: &mut W, tracker: &mut Tracker, tz: &Tz) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if let Some(session) = tracker.data().current_session {
        writeln!(
            writer,
            "Already tracking since {}.",
            hhmm(session.clock_in, tz)
        )?;
        return Ok(());
    }

    let now = Utc::now();
    tracker.clock_in_at(now)?;
    writeln!(writer, "Clocked in at {}.", hhmm(now, tz))?;
    Ok(())
}

pub fn clock_out<W, Tz>(writer: &mut W, tracker: &mut Tracker, tz: &Tz) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if !tracker.is_tracking() {
        writeln!(writer, "Not tracking.")?;
        return Ok(());
    }

    let now = Utc::now();
    let duration = tracker.current_session_duration(now);
    tracker.clock_out_at(now)?;
    writeln!(
        writer,
        "Clocked out at {}. Duration: {}.",
        hhmm(now, tz),
        format_hm(duration)
    )?;
    Ok(())
}

pub fn toggle<W, Tz>(writer: &mut W, tracker: &mut Tracker, tz: &Tz) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if tracker.is_tracking() {
        clock_out(writer, tracker, tz)
    } else {
        clock_in(writer, tracker, tz)
    }
}
