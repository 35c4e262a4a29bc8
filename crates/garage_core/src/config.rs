//! Store configuration loaded from the environment.
//!
//! # Responsibility
//! - Collect database and logging settings in one value.
//! - Keep environment parsing separate from connection bootstrap.
//!
//! # Invariants
//! - An unset database path selects an in-memory database.
//! - Logging is only configured when a log directory is given.

use crate::logging::{default_log_level, LogConfig, LogLevel};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "GARAGE_DB_PATH";
pub const ENV_BUSY_TIMEOUT_MS: &str = "GARAGE_DB_BUSY_TIMEOUT_MS";
pub const ENV_LOG_LEVEL: &str = "GARAGE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "GARAGE_LOG_DIR";
pub const ENV_LOG_STDERR: &str = "GARAGE_LOG_STDERR";

/// How long a connection waits on a locked database before failing.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Runtime settings for opening the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Database file. `None` means in-memory.
    pub db_path: Option<PathBuf>,
    pub busy_timeout: Duration,
    pub log: Option<LogConfig>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            log: None,
        }
    }
}

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue {
                key,
                value,
                expected,
            } => write!(f, "invalid value `{value}` for {key}; expected {expected}"),
        }
    }
}

impl Error for ConfigError {}

impl StoreConfig {
    /// Reads settings from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = get(ENV_DB_PATH).map(PathBuf::from);

        let busy_timeout = match get(ENV_BUSY_TIMEOUT_MS) {
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidValue {
                    key: ENV_BUSY_TIMEOUT_MS,
                    value: raw,
                    expected: "milliseconds as a non-negative integer",
                })?,
            None => DEFAULT_BUSY_TIMEOUT,
        };

        let level = match get(ENV_LOG_LEVEL) {
            Some(raw) => LogLevel::parse(&raw).ok_or(ConfigError::InvalidValue {
                key: ENV_LOG_LEVEL,
                value: raw,
                expected: "trace|debug|info|warn|error",
            })?,
            None => default_log_level(),
        };

        let duplicate_to_stderr = match get(ENV_LOG_STDERR) {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidValue {
                key: ENV_LOG_STDERR,
                value: raw,
                expected: "true|false",
            })?,
            None => false,
        };

        let log = get(ENV_LOG_DIR).map(|dir| LogConfig {
            level,
            log_dir: PathBuf::from(dir),
            duplicate_to_stderr,
        });

        Ok(Self {
            db_path,
            busy_timeout,
            log,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StoreConfig, DEFAULT_BUSY_TIMEOUT};
    use crate::logging::LogLevel;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_in_memory_defaults() {
        let config = StoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.busy_timeout, DEFAULT_BUSY_TIMEOUT);
    }

    #[test]
    fn reads_all_settings() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("GARAGE_DB_PATH", "/var/lib/garage/cars.db"),
            ("GARAGE_DB_BUSY_TIMEOUT_MS", "250"),
            ("GARAGE_LOG_LEVEL", "WARN"),
            ("GARAGE_LOG_DIR", "/var/log/garage"),
            ("GARAGE_LOG_STDERR", "yes"),
        ]))
        .unwrap();

        assert_eq!(
            config.db_path,
            Some(PathBuf::from("/var/lib/garage/cars.db"))
        );
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        let log = config.log.expect("log dir should enable logging");
        assert_eq!(log.level, LogLevel::Warn);
        assert_eq!(log.log_dir, PathBuf::from("/var/log/garage"));
        assert!(log.duplicate_to_stderr);
    }

    #[test]
    fn blank_values_are_treated_as_unset() {
        let config =
            StoreConfig::from_lookup(lookup_from(&[("GARAGE_DB_PATH", "  "), ("GARAGE_LOG_DIR", "")]))
                .unwrap();
        assert_eq!(config.db_path, None);
        assert_eq!(config.log, None);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = StoreConfig::from_lookup(lookup_from(&[("GARAGE_DB_BUSY_TIMEOUT_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "GARAGE_DB_BUSY_TIMEOUT_MS",
                ..
            }
        ));

        let err =
            StoreConfig::from_lookup(lookup_from(&[("GARAGE_LOG_LEVEL", "loud")])).unwrap_err();
        assert!(err.to_string().contains("GARAGE_LOG_LEVEL"));
    }
}
