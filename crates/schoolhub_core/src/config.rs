//! Runtime configuration for the core.
//!
//! # Responsibility
//! - Hold the database location, storage deadline, session key and the
//!   simulated assistant delay.
//! - Resolve overrides from process environment variables.
//!
//! # Invariants
//! - `from_env()` never fails; blank or unparsable overrides fall back to
//!   defaults with a warning.

use log::warn;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the SQLite database path.
pub const ENV_DB_PATH: &str = "SCHOOLHUB_DB_PATH";
/// Environment variable overriding the storage deadline in milliseconds.
pub const ENV_STORAGE_TIMEOUT_MS: &str = "SCHOOLHUB_STORAGE_TIMEOUT_MS";
/// Environment variable overriding the simulated assistant delay in milliseconds.
pub const ENV_ASSISTANT_DELAY_MS: &str = "SCHOOLHUB_ASSISTANT_DELAY_MS";

const DEFAULT_DB_FILE_NAME: &str = "schoolhub.sqlite3";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_ASSISTANT_DELAY_MS: u64 = 1_500;
/// Key under which the current session identity is stored.
pub const DEFAULT_SESSION_KEY: &str = "session.current_user";

/// Storage connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Upper bound for a single durable-storage call waiting on a lock.
    pub busy_timeout: Duration,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }
}

/// Top-level core configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub storage: StorageConfig,
    pub session_key: String,
    /// Delay injected into the simulated assistant backend.
    pub assistant_delay: Duration,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            storage: StorageConfig::default(),
            session_key: DEFAULT_SESSION_KEY.to_string(),
            assistant_delay: Duration::from_millis(DEFAULT_ASSISTANT_DELAY_MS),
        }
    }
}

impl CoreConfig {
    /// Builds a config from defaults plus environment overrides.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from defaults plus overrides returned by `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_DB_PATH) {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                warn!("event=config_override module=config status=ignored key={ENV_DB_PATH} reason=blank");
            } else {
                config.db_path = PathBuf::from(trimmed);
            }
        }

        if let Some(raw) = lookup(ENV_STORAGE_TIMEOUT_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => config.storage.busy_timeout = Duration::from_millis(ms),
                _ => warn!(
                    "event=config_override module=config status=ignored key={ENV_STORAGE_TIMEOUT_MS} reason=invalid"
                ),
            }
        }

        if let Some(raw) = lookup(ENV_ASSISTANT_DELAY_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.assistant_delay = Duration::from_millis(ms),
                Err(_) => warn!(
                    "event=config_override module=config status=ignored key={ENV_ASSISTANT_DELAY_MS} reason=invalid"
                ),
            }
        }

        config
    }

    /// Replaces the database path.
    pub fn with_db_path(mut self, db_path: impl Into<PathBuf>) -> Self {
        self.db_path = db_path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let config = CoreConfig::from_lookup(|_| None);
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.session_key, "session.current_user");
        assert_eq!(config.storage.busy_timeout, Duration::from_secs(5));
        assert!(config.db_path.ends_with("schoolhub.sqlite3"));
    }

    #[test]
    fn overrides_are_trimmed_and_applied() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "  /data/school.db "),
            (ENV_STORAGE_TIMEOUT_MS, "250"),
            (ENV_ASSISTANT_DELAY_MS, "0"),
        ]));
        assert_eq!(config.db_path, PathBuf::from("/data/school.db"));
        assert_eq!(config.storage.busy_timeout, Duration::from_millis(250));
        assert!(config.assistant_delay.is_zero());
    }

    #[test]
    fn blank_or_invalid_overrides_fall_back_to_defaults() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "   "),
            (ENV_STORAGE_TIMEOUT_MS, "soon"),
        ]));
        assert_eq!(config, CoreConfig::default());

        let zero = CoreConfig::from_lookup(lookup_from(&[(ENV_STORAGE_TIMEOUT_MS, "0")]));
        assert_eq!(zero.storage, StorageConfig::default());
    }
}
