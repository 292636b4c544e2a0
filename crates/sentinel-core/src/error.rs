//! Error types for Sentinel Core
//!
//! Provides error handling for:
//! - Configuration loading and validation
//! - Logging initialisation

use std::path::PathBuf;

/// Main core error type
#[derive(Debug, thiserror::Error)]
pub enum SentinelError {
    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Subscriber installation failed
    #[error("logging error: {0}")]
    Logging(String),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error during file read
    #[error("io error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or shape error
    #[error("invalid toml: {0}")]
    InvalidToml(#[from] toml::de::Error),

    /// YAML syntax or shape error
    #[error("invalid yaml: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// File extension is neither TOML nor YAML
    #[error("unsupported config format: '{0}'")]
    UnsupportedFormat(String),

    /// Semantically invalid value
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create invalid value error
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}
