//! Error types for the monitor host

use sentinel_core::{ConfigError, StreamId};
use sentinel_stream::StreamError;

/// Monitor errors
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// Controller rejected a source
    #[error("stream error: {0}")]
    Stream(#[from] StreamError),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No tile for this id
    #[error("unknown stream: {0}")]
    UnknownStream(StreamId),

    /// Duplicate ids in the configured camera list
    #[error("duplicate stream id: {0}")]
    DuplicateStream(StreamId),
}

impl MonitorError {
    /// Whether the operator can fix this by editing configuration
    #[inline]
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::Config(_) | Self::DuplicateStream(_) => true,
            Self::Stream(e) => e.is_user_error(),
            Self::UnknownStream(_) => false,
        }
    }
}
