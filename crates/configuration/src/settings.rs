use crate::error::ConfigError;
use core_types::{Continuity, PeriodKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The root configuration structure for the journal.
///
/// Every field has a default, so an absent `journal.toml` is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub analytics: AnalyticsConfig,
    pub logging: LoggingConfig,
}

/// Where the JSON collections live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("journal-data"),
        }
    }
}

/// Policies handed to the analytics engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Adjacency rule for day streaks.
    pub continuity: Continuity,
    /// A personal best set within this many days of today is flagged as recent.
    pub recent_window_days: u64,
    /// Maximum number of personal bests shown.
    pub personal_best_limit: usize,
    /// Consecutive losing trading days before the streak view warns.
    pub losing_streak_warning: usize,
    /// Default period for growth comparisons.
    pub growth_period: PeriodKind,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            continuity: Continuity::default(),
            recent_window_days: 7,
            personal_best_limit: 6,
            losing_streak_warning: 3,
            growth_period: PeriodKind::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The `EnvFilter` directive for this level.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Used unless `RUST_LOG` is set.
    pub level: LogLevel,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            directory: None,
            file_prefix: "journal.log".to_string(),
        }
    }
}

impl Config {
    /// Rejects values the engines cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.data_dir must not be empty".to_string(),
            ));
        }
        if self.analytics.personal_best_limit == 0 {
            return Err(ConfigError::ValidationError(
                "analytics.personal_best_limit must be at least 1".to_string(),
            ));
        }
        if self.analytics.losing_streak_warning == 0 {
            return Err(ConfigError::ValidationError(
                "analytics.losing_streak_warning must be at least 1".to_string(),
            ));
        }
        if self.logging.directory.is_some() && self.logging.file_prefix.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "logging.file_prefix must not be empty when logging.directory is set".to_string(),
            ));
        }
        Ok(())
    }
}
