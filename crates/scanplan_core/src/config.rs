//! Runtime configuration for embedding callers and the CLI.
//!
//! Resolution order: built-in defaults, then `SCANPLAN_*` environment
//! variables, then explicit overrides applied by the caller.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DB_PATH: &str = "SCANPLAN_DB";
pub const ENV_LOG_DIR: &str = "SCANPLAN_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "SCANPLAN_LOG_LEVEL";

pub const DEFAULT_DB_FILE_NAME: &str = "scanplan.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnsupportedLogLevel(String),
    EmptyPath(&'static str),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLogLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::EmptyPath(field) => write!(f, "{field} cannot be empty"),
            Self::RelativeLogDir(path) => write!(
                f,
                "log_dir must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file holding the local-storage table.
    pub db_path: PathBuf,
    /// Rolling log directory; file logging is off when `None`.
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_dir: None,
            log_level: default_log_level().to_string(),
        }
    }
}

impl CoreConfig {
    /// Defaults overlaid with any `SCANPLAN_*` variables that are set and
    /// non-blank.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`CoreConfig::from_env`] with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(db_path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(db_path);
        }
        if let Some(log_dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(log_dir));
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        config
    }

    /// Checks every field and normalizes the log level in place.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath("db_path"));
        }
        self.log_level = normalize_level(&self.log_level)?.to_string();
        if let Some(log_dir) = &self.log_dir {
            normalize_log_dir(log_dir)?;
        }
        Ok(())
    }
}

/// Returns the default log level for current build mode.
///
/// - `debug` builds -> `debug`
/// - `release` builds -> `info`
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

pub fn normalize_level(level: &str) -> Result<&'static str, ConfigError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(ConfigError::UnsupportedLogLevel(other.to_string())),
    }
}

pub fn normalize_log_dir(log_dir: &Path) -> Result<PathBuf, ConfigError> {
    if log_dir.as_os_str().is_empty() {
        return Err(ConfigError::EmptyPath("log_dir"));
    }
    if !log_dir.is_absolute() {
        return Err(ConfigError::RelativeLogDir(log_dir.to_path_buf()));
    }
    Ok(log_dir.to_path_buf())
}
