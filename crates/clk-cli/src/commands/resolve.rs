//! Crash-recovery resolution for a session left open by a previous run.

use std::io::Write;

use anyhow::{Result, bail};

use clk_core::format_hm;
use clk_engine::Tracker;

use super::util::parse_instant;

pub fn run<W: Write>(
    writer: &mut W,
    tracker: &mut Tracker,
    complete: Option<&str>,
    discard: bool,
) -> Result<()> {
    let Some(session) = tracker.data().current_session else {
        writeln!(writer, "No open session to resolve.")?;
        return Ok(());
    };

    if let Some(clock_out) = complete {
        let clock_out = parse_instant(clock_out)?;
        tracker.complete_incomplete_session(clock_out)?;
        writeln!(
            writer,
            "Session completed ({}).",
            format_hm((clock_out - session.clock_in).num_seconds())
        )?;
        return Ok(());
    }

    if discard {
        tracker.discard_incomplete_session()?;
        writeln!(writer, "Session discarded.")?;
        return Ok(());
    }

    bail!("pass --complete <time> or --discard");
}
