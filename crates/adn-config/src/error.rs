//! Error types for configuration management.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or changing the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error on the configuration file or directory.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid YAML.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The key is not a known configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// The value is not acceptable for the key.
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// `init` without `force` on an existing configuration.
    #[error("Configuration already exists at {}", .0.display())]
    AlreadyExists(PathBuf),

    /// A configuration or backup file is missing.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A backup file could not be parsed as a configuration.
    #[error("Invalid backup file {}: {message}", .path.display())]
    InvalidBackup { path: PathBuf, message: String },

    /// Neither `ADN_CONFIG_DIR` nor a home directory is available.
    #[error("Could not determine the configuration directory")]
    NoConfigDir,
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
