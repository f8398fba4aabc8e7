//! Configuration loading and management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use stp_clock::sntp::{DEFAULT_NTP_HOST, DEFAULT_NTP_PORT};
use stp_clock::sync::DEFAULT_REFRESH;
use stp_core::clock::{DisplayZone, IST_OFFSET_MINUTES};
use stp_core::schedule::DEFAULT_DAILY_HOURS;
use stp_core::{SubjectInput, default_subjects};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Daily hours used when `--hours` is not given.
    pub daily_hours: f64,
    /// Subjects used when no `--subject` is given.
    pub subjects: Vec<SubjectInput>,
    /// Time endpoint polled by `stp clock`.
    pub time_sync_url: String,
    /// NTP server queried by `stp serve`.
    pub ntp_host: String,
    pub ntp_port: u16,
    /// Listen address for `stp serve`.
    pub bind: String,
    /// Seconds between clock syncs.
    pub refresh_interval_secs: u64,
    /// Clock display offset, minutes east of UTC.
    pub display_offset_minutes: i32,
    pub display_zone_label: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daily_hours: DEFAULT_DAILY_HOURS,
            subjects: default_subjects(),
            time_sync_url: "http://127.0.0.1:3000/api/windows-time".to_string(),
            ntp_host: DEFAULT_NTP_HOST.to_string(),
            ntp_port: DEFAULT_NTP_PORT,
            bind: "127.0.0.1:3000".to_string(),
            refresh_interval_secs: DEFAULT_REFRESH.as_secs(),
            display_offset_minutes: IST_OFFSET_MINUTES,
            display_zone_label: "India Standard Time".to_string(),
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

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // STP_DAILY_HOURS, STP_BIND, ...
        figment = figment.merge(Env::prefixed("STP_"));

        figment.extract()
    }

    /// Zone the clock is shown in.
    pub fn display_zone(&self) -> DisplayZone {
        DisplayZone::from_minutes(self.display_offset_minutes, self.display_zone_label.clone())
    }

    /// Interval between clock syncs, at least one second.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }
}

/// Returns the platform-specific config directory for stp.
///
/// On Linux: `~/.config/stp`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("stp"))
}
