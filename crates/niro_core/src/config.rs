//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve storage, logging and summarizer settings in one place.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - `log_dir` is always absolute when resolution succeeds.

use crate::logging::{default_log_level, normalize_level, LoggingError};
use crate::summarize::gemini::{GeminiConfig, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "NIRO_DB_PATH";
pub const ENV_LOG_DIR: &str = "NIRO_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "NIRO_LOG_LEVEL";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_LEGACY_API_KEY: &str = "API_KEY";
pub const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";
pub const ENV_GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";

const DATA_DIR_NAME: &str = ".niro_notes";
const DB_FILE_NAME: &str = "niro_notes.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Configuration resolution error.
#[derive(Debug)]
pub enum ConfigError {
    InvalidLogLevel(LoggingError),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(err) => write!(f, "{ENV_LOG_LEVEL}: {err}"),
            Self::RelativeLogDir(dir) => write!(
                f,
                "{ENV_LOG_DIR} must be an absolute path, got `{}`",
                dir.display()
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLogLevel(err) => Some(err),
            Self::RelativeLogDir(_) => None,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite file backing the local key-value store.
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: &'static str,
    pub gemini: GeminiConfig,
}

impl AppConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through `lookup`, which maps variable names to
    /// values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = var(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| default_data_dir(var("HOME")).join(DB_FILE_NAME));

        let log_dir = match var(ENV_LOG_DIR) {
            Some(value) => PathBuf::from(value),
            None => absolute_parent(&db_path).join(LOG_DIR_NAME),
        };
        if !log_dir.is_absolute() {
            return Err(ConfigError::RelativeLogDir(log_dir));
        }

        let log_level = match var(ENV_LOG_LEVEL) {
            Some(value) => normalize_level(&value).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        let gemini = GeminiConfig {
            api_key: var(ENV_GEMINI_API_KEY).or_else(|| var(ENV_LEGACY_API_KEY)),
            model: var(ENV_GEMINI_MODEL).unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: var(ENV_GEMINI_BASE_URL)
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
        };

        Ok(Self {
            db_path,
            log_dir,
            log_level,
            gemini,
        })
    }
}

fn default_data_dir(home: Option<String>) -> PathBuf {
    match home {
        Some(home) => PathBuf::from(home).join(DATA_DIR_NAME),
        None => std::env::temp_dir().join(DATA_DIR_NAME),
    }
}

fn absolute_parent(db_path: &std::path::Path) -> PathBuf {
    let parent = db_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    if parent.is_absolute() {
        parent
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(&parent))
            .unwrap_or_else(|_| std::env::temp_dir().join(DATA_DIR_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn resolve(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_live_under_home() {
        let config = resolve(&[("HOME", "/home/u")]).unwrap();
        assert_eq!(
            config.db_path,
            PathBuf::from("/home/u/.niro_notes/niro_notes.sqlite3")
        );
        assert_eq!(config.log_dir, PathBuf::from("/home/u/.niro_notes/logs"));
        assert_eq!(config.gemini.api_key, None);
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = resolve(&[
            ("NIRO_DB_PATH", "/data/n.db"),
            ("NIRO_LOG_DIR", "/var/log/niro"),
            ("NIRO_LOG_LEVEL", "WARNING"),
            ("GEMINI_API_KEY", " k1 "),
            ("API_KEY", "legacy"),
        ])
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/data/n.db"));
        assert_eq!(config.log_dir, PathBuf::from("/var/log/niro"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.gemini.api_key.as_deref(), Some("k1"));
    }

    #[test]
    fn legacy_api_key_is_used_when_primary_is_blank() {
        let config = resolve(&[("HOME", "/h"), ("GEMINI_API_KEY", "  "), ("API_KEY", "legacy")])
            .unwrap();
        assert_eq!(config.gemini.api_key.as_deref(), Some("legacy"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            resolve(&[("HOME", "/h"), ("NIRO_LOG_LEVEL", "loud")]),
            Err(ConfigError::InvalidLogLevel(_))
        ));
        assert!(matches!(
            resolve(&[("HOME", "/h"), ("NIRO_LOG_DIR", "logs")]),
            Err(ConfigError::RelativeLogDir(_))
        ));
    }
}
