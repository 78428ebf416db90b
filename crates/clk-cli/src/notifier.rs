//! Desktop notification delivery via the freedesktop notification service.

use chrono::Local;

use clk_core::format_hm;
use clk_engine::{Notification, Notifier};

/// Delivers engine notifications as desktop notifications.
///
/// Everything is best-effort: a missing notification service is logged at
/// debug level and otherwise ignored, per the collaborator contract.
pub struct DesktopNotifier {
    /// Whether to surface the incomplete-session announcement.
    ///
    /// Every one-shot invocation reloads the data file, so an open session
    /// would re-announce on each command; only the resident watch command
    /// passes it through.
    announce_incomplete: bool,
}

impl DesktopNotifier {
    #[must_use]
    pub const fn new(announce_incomplete: bool) -> Self {
        Self { announce_incomplete }
    }

    fn show(body: &str) {
        let result = notify_rust::Notification::new()
            .summary("clk")
            .body(body)
            .appname("clk")
            .icon("clock")
            .show();
        if let Err(error) = result {
            tracing::debug!(%error, "desktop notification not shown");
        }
    }
}

impl Notifier for DesktopNotifier {
    fn request_permission(&self) {
        // No permission model on freedesktop platforms; the contract call
        // still exists and stays idempotent.
    }

    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Reminder => Self::show("Did you forget to clock out?"),
            Notification::IncompleteSession => {
                if self.announce_incomplete {
                    Self::show("Incomplete session found. Complete or discard it with 'clk resolve'.");
                } else {
                    tracing::debug!("incomplete session announcement suppressed");
                }
            }
            Notification::ClockIn { at } => {
                let time = at.with_timezone(&Local).format("%H:%M");
                Self::show(&format!("Clocked in at {time}"));
            }
            Notification::ClockOut { duration_seconds } => {
                Self::show(&format!(
                    "Clocked out. Duration: {}",
                    format_hm(duration_seconds)
                ));
            }
        }
    }
}
