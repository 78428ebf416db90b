//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use clk_engine::Settings;

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the JSON data file.
    pub data_path: PathBuf,

    /// Whether long-session reminders fire.
    pub reminder_enabled: bool,

    /// Minutes a session may run before the first reminder.
    pub reminder_threshold_minutes: u64,

    /// Re-fire interval in minutes after the first reminder. Absent means
    /// the reminder fires once.
    pub reminder_repeat_minutes: Option<u64>,

    /// Clock out automatically when the system sleeps (watch mode).
    pub stop_on_sleep: bool,

    /// Emit clock-in/clock-out notifications.
    pub clock_event_notification_enabled: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_path", &self.data_path)
            .field("reminder_enabled", &self.reminder_enabled)
            .field("reminder_threshold_minutes", &self.reminder_threshold_minutes)
            .field("reminder_repeat_minutes", &self.reminder_repeat_minutes)
            .field("stop_on_sleep", &self.stop_on_sleep)
            .field(
                "clock_event_notification_enabled",
                &self.clock_event_notification_enabled,
            )
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            data_path: data_dir.join("data.json"),
            reminder_enabled: true,
            reminder_threshold_minutes: 60,
            reminder_repeat_minutes: None,
            stop_on_sleep: true,
            clock_event_notification_enabled: true,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (CLK_*)
        figment = figment.merge(Env::prefixed("CLK_"));

        figment.extract()
    }

    /// Maps the reminder/notification fields onto engine settings.
    #[must_use]
    pub fn settings(&self) -> Settings {
        Settings {
            reminder_enabled: self.reminder_enabled,
            reminder_threshold: Duration::from_secs(self.reminder_threshold_minutes * 60),
            reminder_repeat: self
                .reminder_repeat_minutes
                .map(|minutes| Duration::from_secs(minutes * 60)),
            stop_on_sleep: self.stop_on_sleep,
            clock_event_notification_enabled: self.clock_event_notification_enabled,
        }
    }
}

/// Returns the platform-specific config directory for clk.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("clk"))
}

/// Returns the platform-specific data directory for clk.
///
/// On Linux: `~/.local/share/clk`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("clk"))
}
