//! Configuration for the todo application.
//!
//! Every setting comes from an environment variable and has a default:
//!
//! | Variable | Default |
//! |---|---|
//! | `TODO_DATA_DIR` | `$HOME/.local/share/todo`, or `./.todo` without `HOME` |
//! | `TODO_NAMESPACE` | `todos` |
//! | `TODO_LOG_LEVEL` | `warn` (ignored when `RUST_LOG` is set) |
//! | `TODO_SHUTDOWN_TIMEOUT_SECS` | `5` |
//!
//! # Example
//!
//! ```no_run
//! use todo::config::Config;
//!
//! # fn main() -> Result<(), todo::config::ConfigError> {
//! let config = Config::from_env()?;
//! println!("Data dir: {}", config.storage.data_dir.display());
//! # Ok(())
//! # }
//! ```

use crate::repository::DEFAULT_NAMESPACE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but its value cannot be used
    #[error("Invalid value for {var}: {reason}")]
    Invalid {
        /// Variable name
        var: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Where and under which keys state is stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for the file-backed store
    pub data_dir: PathBuf,
    /// Key prefix
    pub namespace: String,
}

impl StorageConfig {
    /// Validate storage configuration
    ///
    /// # Errors
    ///
    /// Returns error if the namespace is empty or contains whitespace
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace.is_empty() || self.namespace.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid {
                var: "TODO_NAMESPACE",
                reason: format!("`{}` must be non-empty without whitespace", self.namespace),
            });
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(std::env::var_os("HOME").map(PathBuf::from)),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Storage configuration
    pub storage: StorageConfig,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// How long `quit` waits for pending writes, in seconds
    pub shutdown_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            log_level: "warn".to_string(),
            shutdown_timeout_secs: 5,
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set to an unusable value
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable source
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set to an unusable value
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self {
            storage: StorageConfig {
                data_dir: default_data_dir(lookup("HOME").map(PathBuf::from)),
                namespace: DEFAULT_NAMESPACE.to_string(),
            },
            ..Self::default()
        };

        if let Some(dir) = lookup("TODO_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(namespace) = lookup("TODO_NAMESPACE") {
            config.storage.namespace = namespace;
        }
        if let Some(level) = lookup("TODO_LOG_LEVEL") {
            config.log_level = level;
        }
        if let Some(secs) = lookup("TODO_SHUTDOWN_TIMEOUT_SECS") {
            config.shutdown_timeout_secs = secs.trim().parse().map_err(|e| ConfigError::Invalid {
                var: "TODO_SHUTDOWN_TIMEOUT_SECS",
                reason: format!("`{secs}`: {e}"),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the whole configuration
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.storage.validate()?;

        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid {
                var: "TODO_LOG_LEVEL",
                reason: format!(
                    "`{}` is not one of: {}",
                    self.log_level,
                    valid_levels.join(", ")
                ),
            });
        }
        Ok(())
    }

    /// Shutdown timeout as Duration
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

fn default_data_dir(home: Option<PathBuf>) -> PathBuf {
    home.map_or_else(
        || PathBuf::from(".todo"),
        |home| home.join(".local").join("share").join("todo"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[("HOME", "/home/ada")]).unwrap();

        assert_eq!(config.storage.data_dir, PathBuf::from("/home/ada/.local/share/todo"));
        assert_eq!(config.storage.namespace, "todos");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn no_home_uses_working_directory() {
        let config = load(&[]).unwrap();
        assert_eq!(config.storage.data_dir, PathBuf::from(".todo"));
    }

    #[test]
    fn overrides() {
        let config = load(&[
            ("TODO_DATA_DIR", "/tmp/todo"),
            ("TODO_NAMESPACE", "work"),
            ("TODO_LOG_LEVEL", "debug"),
            ("TODO_SHUTDOWN_TIMEOUT_SECS", "12"),
        ])
        .unwrap();

        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/todo"));
        assert_eq!(config.storage.namespace, "work");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.shutdown_timeout_secs, 12);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = load(&[("TODO_SHUTDOWN_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "TODO_SHUTDOWN_TIMEOUT_SECS", .. }));

        let err = load(&[("TODO_LOG_LEVEL", "loud")]).unwrap_err();
        assert!(err.to_string().contains("TODO_LOG_LEVEL"));

        let err = load(&[("TODO_NAMESPACE", "my todos")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "TODO_NAMESPACE", .. }));
    }
}
