//! Tile-facing stream status

use crate::fault::PlaybackError;
use crate::metrics::LinkMetrics;
use crate::phase::LifecyclePhase;
use crate::transport::Transport;
use serde::{Deserialize, Serialize};

/// Everything a tile needs to render its stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamStatus {
    /// Configured source URL (empty when unconfigured)
    pub url: String,
    pub phase: LifecyclePhase,
    /// `None` until a non-empty URL is configured
    pub transport: Option<Transport>,
    /// Set in `Unsupported` and `Failed`
    pub error: Option<PlaybackError>,
    /// Set only while a realtime link is connected
    pub metrics: Option<LinkMetrics>,
}

impl StreamStatus {
    /// Status of a tile with no source
    #[must_use]
    pub fn idle() -> Self {
        Self {
            url: String::new(),
            phase: LifecyclePhase::New,
            transport: None,
            error: None,
            metrics: None,
        }
    }

    /// One-line indicator shown over the tile
    #[must_use]
    pub fn indicator(&self) -> &str {
        match (&self.error, self.phase) {
            (Some(err), _) => &err.title,
            (None, LifecyclePhase::New) if self.url.is_empty() => "No signal",
            (None, LifecyclePhase::New) => "Initializing",
            (None, LifecyclePhase::Connecting) => "Establishing link",
            (None, LifecyclePhase::Connected) => "Live",
            (None, LifecyclePhase::Unsupported | LifecyclePhase::Failed) => "Unavailable",
        }
    }
}

impl Default for StreamStatus {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::capability_error;

    #[test]
    fn indicators() {
        let mut status = StreamStatus::idle();
        assert_eq!(status.indicator(), "No signal");

        status.url = "mock-webrtc://stream-01".into();
        status.phase = LifecyclePhase::Connecting;
        assert_eq!(status.indicator(), "Establishing link");

        status.phase = LifecyclePhase::Unsupported;
        status.error = Some(capability_error());
        assert_eq!(status.indicator(), "Protocol Unsupported");
    }
}
