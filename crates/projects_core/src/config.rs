//! Runtime configuration for storage and logging.
//!
//! # Responsibility
//! - Resolve database and logging settings from process environment.
//! - Keep environment parsing testable through an injected lookup.
//!
//! # Invariants
//! - File logging is enabled only when a log directory is configured.
//! - Invalid values are rejected instead of silently falling back.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "PROJECTS_DB_PATH";
pub const ENV_BUSY_TIMEOUT_MS: &str = "PROJECTS_BUSY_TIMEOUT_MS";
pub const ENV_LOG_LEVEL: &str = "PROJECTS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PROJECTS_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "projects.sqlite3";
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors raised while resolving configuration values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value `{value}` for `{key}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// SQLite connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub path: PathBuf,
    pub busy_timeout: Duration,
}

impl DbConfig {
    /// Creates settings for the given database file with default timeouts.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_FILE_NAME)
    }
}

/// Rolling file logger settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    pub dir: PathBuf,
}

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub db: DbConfig,
    pub log: Option<LogConfig>,
}

impl AppConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, treating blank values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut db = match get(ENV_DB_PATH) {
            Some(path) => DbConfig::new(path),
            None => DbConfig::default(),
        };

        if let Some(raw) = get(ENV_BUSY_TIMEOUT_MS) {
            let millis = raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: ENV_BUSY_TIMEOUT_MS,
                value: raw.clone(),
            })?;
            db.busy_timeout = Duration::from_millis(millis);
        }

        let log = get(ENV_LOG_DIR).map(|dir| LogConfig {
            level: get(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            dir: PathBuf::from(dir),
        });

        Ok(Self { db, log })
    }
}
