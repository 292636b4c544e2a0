//! Tracing subscriber setup
//!
//! `RUST_LOG` wins over the configured level when present.

use crate::config::{LoggingConfig, SentinelConfig};
use crate::error::SentinelError;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Build the filter for a logging configuration
#[must_use]
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global subscriber
///
/// Safe to call more than once; later calls after a successful install
/// return [`SentinelError::Logging`] without touching the installed one.
///
/// # Errors
/// Returns error if a global subscriber is already set
pub fn init(config: &LoggingConfig) -> Result<(), SentinelError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(true);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| SentinelError::Logging(e.to_string()))
}

/// Load configuration, then install the subscriber it describes
///
/// Without a path the defaults are used. The load itself is logged once
/// the subscriber is in place.
///
/// # Errors
/// - `SentinelError::Config` if the file cannot be read, parsed or validated
/// - `SentinelError::Logging` if a global subscriber is already set
pub fn bootstrap(path: Option<&Path>) -> Result<SentinelConfig, SentinelError> {
    let config = match path {
        Some(path) => SentinelConfig::load(path)?,
        None => SentinelConfig::default(),
    };
    init(&config.logging)?;

    match path {
        Some(path) => tracing::info!(
            path = %path.display(),
            streams = config.streams.len(),
            "loaded configuration"
        ),
        None => tracing::debug!("using default configuration"),
    }
    Ok(config)
}
