//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Personal clock-in/clock-out time tracker.
///
/// Tracks one session at a time, keeps completed entries in a local JSON
/// file, and derives daily and monthly totals on demand.
#[derive(Debug, Parser)]
#[command(name = "clk", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clock in, starting a session.
    #[command(name = "in")]
    ClockIn,

    /// Clock out, completing the open session.
    #[command(name = "out")]
    ClockOut,

    /// Clock out if tracking, clock in otherwise.
    Toggle,

    /// Show tracking state and today's totals.
    Status,

    /// Add a historical entry manually.
    Add {
        /// Start instant (RFC 3339, or "YYYY-MM-DD HH:MM" local time).
        #[arg(long = "in")]
        clock_in: String,

        /// End instant (RFC 3339, or "YYYY-MM-DD HH:MM" local time).
        #[arg(long = "out")]
        clock_out: String,
    },

    /// Rewrite an existing entry's interval.
    Edit {
        /// Entry id (full UUID or unique prefix).
        id: String,

        /// New start instant.
        #[arg(long = "in")]
        clock_in: String,

        /// New end instant.
        #[arg(long = "out")]
        clock_out: String,
    },

    /// Delete one or more entries.
    Rm {
        /// Entry ids (full UUIDs or unique prefixes).
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// List entries grouped by day, newest first.
    History {
        /// Emit JSON instead of the table.
        #[arg(long)]
        json: bool,
    },

    /// Monthly totals, zero-filled for empty months.
    Stats {
        /// Number of months to show, ending with the current one.
        #[arg(long, default_value_t = 6)]
        months: usize,

        /// Emit JSON instead of the table.
        #[arg(long)]
        json: bool,
    },

    /// Resolve a session left open by a previous run.
    Resolve {
        /// Complete the session with this clock-out instant.
        #[arg(long, conflicts_with = "discard")]
        complete: Option<String>,

        /// Drop the session without creating an entry.
        #[arg(long)]
        discard: bool,
    },

    /// Stay resident while tracking: fire reminders and stop on sleep.
    Watch,
}
