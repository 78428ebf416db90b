//! Manual entry creation.

use std::io::Write;

use anyhow::Result;

use clk_core::format_hm;
use clk_engine::Tracker;

use super::util::parse_instant;

pub fn run<W: Write>(
    writer: &mut W,
    tracker: &mut Tracker,
    clock_in: &str,
    clock_out: &str,
) -> Result<()> {
    let clock_in = parse_instant(clock_in)?;
    let clock_out = parse_instant(clock_out)?;

    let id = tracker.add_entry(clock_in, clock_out)?;
    let duration = (clock_out - clock_in).num_seconds();
    writeln!(writer, "Added entry {id} ({}).", format_hm(duration))?;
    Ok(())
}
