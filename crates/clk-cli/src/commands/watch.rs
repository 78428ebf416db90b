//! Resident watch mode.
//!
//! A menu-bar app stays running while tracking; a CLI does not. `clk watch`
//! fills that gap: it keeps the reminder scheduler armed for the open
//! session, detects system sleep, and exits once tracking ends.
//!
//! Sleep is detected by wall-clock drift: the loop ticks on a short interval,
//! and a tick that arrives far later than scheduled in wall-clock terms means
//! the process was suspended with the system. The session is then closed at
//! the last instant observed before the gap.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;

use clk_engine::Tracker;
use clk_store::Store;

const POLL_INTERVAL: Duration = Duration::from_secs(1);
const SLEEP_GAP: chrono::Duration = chrono::Duration::seconds(30);

pub fn run<W: Write>(writer: &mut W, tracker: &mut Tracker, data_path: &Path) -> Result<()> {
    run_with(writer, tracker, data_path, POLL_INTERVAL, SLEEP_GAP)
}

/// Watch loop with injectable timing, for tests.
pub fn run_with<W: Write>(
    writer: &mut W,
    tracker: &mut Tracker,
    data_path: &Path,
    poll_interval: Duration,
    sleep_gap: chrono::Duration,
) -> Result<()> {
    if !tracker.is_tracking() {
        writeln!(writer, "Not tracking; nothing to watch.")?;
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        tracker.arm_reminders();
        writeln!(writer, "Watching open session (ctrl-c to detach).")?;

        // Fresh handle for polling: other invocations of the binary may end
        // the session behind this process's back.
        let poll_store = Store::new(data_path);
        let mut last_seen = Utc::now();

        loop {
            tokio::time::sleep(poll_interval).await;
            let now = Utc::now();

            if now - last_seen > sleep_gap {
                tracing::info!(gap_seconds = (now - last_seen).num_seconds(), "wall-clock gap, treating as system sleep");
                tracker.handle_sleep_at(last_seen)?;
                if !tracker.is_tracking() {
                    writeln!(writer, "System slept; session closed at the last instant seen.")?;
                    break;
                }
            }
            last_seen = now;

            if matches!(poll_store.load(), Ok(persisted) if !persisted.is_tracking()) {
                tracker.disarm_reminders();
                writeln!(writer, "Session ended elsewhere; stopping.")?;
                break;
            }

            if !tracker.is_tracking() {
                break;
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use clk_engine::{NullNotifier, Settings};

    use super::*;

    #[test]
    fn watch_exits_immediately_when_idle() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("data.json");
        let mut tracker = Tracker::open(
            Store::new(&path),
            Arc::new(NullNotifier),
            Settings::default(),
        );

        let mut output = Vec::new();
        run(&mut output, &mut tracker, &path).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Not tracking; nothing to watch.\n"
        );
    }

    #[test]
    fn watch_stops_when_session_ends_externally() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("data.json");
        let mut tracker = Tracker::open(
            Store::new(&path),
            Arc::new(NullNotifier),
            Settings::default(),
        );
        tracker.clock_in().unwrap();

        // Another process clocks out: the file goes idle underneath us.
        let external = Store::new(&path);
        external.save(&clk_core::TrackerData::default()).unwrap();

        let mut output = Vec::new();
        run_with(
            &mut output,
            &mut tracker,
            &path,
            Duration::from_millis(20),
            chrono::Duration::seconds(30),
        )
        .unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Session ended elsewhere"));
    }
}
