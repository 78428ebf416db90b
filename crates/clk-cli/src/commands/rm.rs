//! Entry deletion, single or bulk.

use std::collections::HashSet;
use std::io::Write;

use anyhow::Result;

use clk_engine::Tracker;

use super::util::resolve_entry_id;

pub fn run<W: Write>(writer: &mut W, tracker: &mut Tracker, ids: &[String]) -> Result<()> {
    let resolved: HashSet<_> = ids
        .iter()
        .map(|input| resolve_entry_id(tracker.data(), input))
        .collect::<Result<_>>()?;

    let before = tracker.data().entries.len();
    tracker.delete_entries(&resolved)?;
    let removed = before - tracker.data().entries.len();

    writeln!(
        writer,
        "Removed {removed} {}.",
        if removed == 1 { "entry" } else { "entries" }
    )?;
    Ok(())
}
