//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use tc_core::RoundingPolicy;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the timecard log file.
    pub log_file: PathBuf,

    /// Seconds between observation samples while recording.
    pub interval_secs: u64,

    /// Billing rounding policy; absent means hours bill raw.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounding: Option<RoundingPolicy>,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            log_file: data_dir.join("timecard.log"),
            interval_secs: 300,
            rounding: None,
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Yaml::file(config_dir.join("config.yaml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Yaml::file(path));
        }

        // Load from environment variables (TIMECARD_*)
        figment = figment.merge(Env::prefixed("TIMECARD_"));

        let config: Self = figment.extract()?;
        if let Some(rounding) = &config.rounding {
            if rounding.granularity <= 0.0 {
                return Err(figment::Error::from(
                    "rounding.granularity must be a positive number of hours".to_string(),
                ));
            }
        }
        Ok(config)
    }

    /// The session lock file sits beside the log.
    #[must_use]
    pub fn lock_file(&self) -> PathBuf {
        self.log_file.with_extension("lock")
    }
}

/// Returns the platform-specific config directory for timecard.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("timecard"))
}

/// Returns the platform-specific data directory for timecard.
///
/// On Linux: `~/.local/share/timecard`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("timecard"))
}
