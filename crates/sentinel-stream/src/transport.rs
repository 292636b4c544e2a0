//! Transport classification
//!
//! Decided from the URL alone, before anything is attached.

use serde::{Deserialize, Serialize};

/// Scheme of raw camera sources no playback runtime can decode
pub const RTSP_PREFIX: &str = "rtsp://";
/// Scheme of simulated realtime peer links
pub const REALTIME_PREFIX: &str = "mock-webrtc://";
/// Marker of segmented-stream manifests
pub const MANIFEST_MARKER: &str = "m3u8";

/// How a source URL is played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// Raw streaming protocol; needs a transcoding backend
    Unsupported,
    /// Plain media file played by the native element
    DirectFile,
    /// Manifest-based chunked stream
    AdaptiveSegmented,
    /// Stand-in for an ultra-low-latency peer link
    SimulatedRealtime,
}

impl Transport {
    /// Classify a playback URL
    ///
    /// Scheme checks win over the manifest marker, so
    /// `rtsp://cam/live.m3u8` is still unsupported.
    #[must_use]
    pub fn classify(url: &str) -> Self {
        let url = url.trim();
        if url.starts_with(RTSP_PREFIX) {
            Self::Unsupported
        } else if url.starts_with(REALTIME_PREFIX) {
            Self::SimulatedRealtime
        } else if url.contains(MANIFEST_MARKER) {
            Self::AdaptiveSegmented
        } else {
            Self::DirectFile
        }
    }

    /// Short label for status displays
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Unsupported => "RTSP",
            Self::DirectFile => "MP4",
            Self::AdaptiveSegmented => "HLS",
            Self::SimulatedRealtime => "WebRTC",
        }
    }
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
