use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{AnalyticsConfig, Config, LogLevel, LoggingConfig, StorageConfig};

/// Prefix for environment overrides, e.g. `JOURNAL__ANALYTICS__CONTINUITY=business_days`.
pub const ENV_PREFIX: &str = "JOURNAL";

/// Loads the journal configuration.
///
/// Sources, lowest precedence first: built-in defaults, the TOML file, then
/// `JOURNAL__*` environment variables. Without an explicit `path` an optional
/// `journal.toml` in the working directory is used; an explicit path must exist.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path.to_path_buf()).required(true),
        None => config::File::with_name("journal").required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(data_dir = %config.storage.data_dir.display(), "Configuration loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Continuity, PeriodKind};
    use std::io::Write;

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.analytics.recent_window_days, 7);
        assert_eq!(config.analytics.personal_best_limit, 6);
        assert_eq!(config.analytics.continuity, Continuity::CalendarDays);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn partial_file_is_layered_over_defaults() {
        let file = write_toml(
            r#"
            [analytics]
            continuity = "business_days"
            growth_period = "week"

            [logging]
            level = "debug"
            "#,
        );
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.analytics.continuity, Continuity::BusinessDays);
        assert_eq!(config.analytics.growth_period, PeriodKind::Week);
        assert_eq!(config.analytics.personal_best_limit, 6);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let file = write_toml("[analytics]\npersonal_best_limit = 0\n");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }
}
