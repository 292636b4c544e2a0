//! Error types for stream control
//!
//! These are programming or provisioning errors. Playback faults a viewer
//! should see are [`PlaybackError`](crate::PlaybackError) values carried in
//! the stream status instead.

use crate::phase::LifecyclePhase;

/// Stream control errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    /// Phase change not in the transition table
    #[error("illegal phase transition: {from} -> {to}")]
    IllegalTransition {
        from: LifecyclePhase,
        to: LifecyclePhase,
    },

    /// Timer-driven source configured outside a Tokio runtime
    #[error("no async runtime available to drive {0}")]
    NoRuntime(&'static str),

    /// Provisioning only accepts RTSP sources
    #[error("invalid protocol: expected rtsp://, got '{0}'")]
    InvalidProtocol(String),
}

impl StreamError {
    /// Whether the caller made a configuration mistake rather than hitting a bug
    #[inline]
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidProtocol(_))
    }
}
