//! Entry interval editing.

use std::io::Write;

use anyhow::Result;

use clk_engine::Tracker;

use super::util::{parse_instant, resolve_entry_id};

pub fn run<W: Write>(
    writer: &mut W,
    tracker: &mut Tracker,
    id: &str,
    clock_in: &str,
    clock_out: &str,
) -> Result<()> {
    let id = resolve_entry_id(tracker.data(), id)?;
    let clock_in = parse_instant(clock_in)?;
    let clock_out = parse_instant(clock_out)?;

    tracker.update_entry(id, clock_in, clock_out)?;
    writeln!(writer, "Updated entry {id}.")?;
    Ok(())
}
