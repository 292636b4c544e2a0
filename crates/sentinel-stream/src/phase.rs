//! Playback lifecycle phases
//!
//! A source is in exactly one phase at a time. `Unsupported` and `Failed`
//! are terminal until the source URL changes, which resets to `New`.

use crate::error::StreamError;
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a stream source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    /// Source just (re)configured; no error
    New,
    /// Transport cannot be played at all
    Unsupported,
    /// Realtime link negotiation in flight
    Connecting,
    /// Playback attached
    Connected,
    /// Unrecoverable fault
    Failed,
}

impl LifecyclePhase {
    /// Whether only a URL change leaves this phase
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Unsupported | Self::Failed)
    }
}

impl std::fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::New => "new",
            Self::Unsupported => "unsupported",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Validates a phase transition.
///
/// Illegal transitions panic with the `strict-debug` feature; otherwise
/// they are reported as errors.
pub fn validate_transition(from: LifecyclePhase, to: LifecyclePhase) -> Result<(), StreamError> {
    if allowed(from, to) {
        Ok(())
    } else {
        #[cfg(feature = "strict-debug")]
        panic!("Illegal phase transition attempted: {from:?} -> {to:?}");

        #[cfg(not(feature = "strict-debug"))]
        Err(StreamError::IllegalTransition { from, to })
    }
}

pub fn allowed_transitions(from: LifecyclePhase) -> Vec<LifecyclePhase> {
    use LifecyclePhase::*;
    match from {
        New => vec![New, Unsupported, Connecting, Connected],
        Connecting => vec![New, Connected],
        Connected => vec![New, Failed],
        Unsupported => vec![New],
        Failed => vec![New],
    }
}

fn allowed(from: LifecyclePhase, to: LifecyclePhase) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}
