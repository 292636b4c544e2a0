//! Fault classification
//!
//! Maps raw player faults to either an engine recovery call or a terminal
//! [`PlaybackError`] a viewer can act on. All lookups are fixed tables.

use serde::{Deserialize, Serialize};

/// What a failed tile shows in place of video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackError {
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl PlaybackError {
    fn fixed(title: &str, message: &str, suggestion: &str) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            suggestion: Some(suggestion.to_string()),
        }
    }

    /// Multi-line rendering: title, message, then the tip if present
    #[must_use]
    pub fn render(&self) -> String {
        match &self.suggestion {
            Some(tip) => format!("{}\n{}\nTip: {}", self.title, self.message, tip),
            None => format!("{}\n{}", self.title, self.message),
        }
    }
}

impl std::fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

/// Error shown when the transport has no decoder at all
#[must_use]
pub fn capability_error() -> PlaybackError {
    PlaybackError::fixed(
        "Protocol Unsupported",
        "The playback runtime cannot play raw RTSP streams directly.",
        "Use the configuration menu to provision a transcoding backend.",
    )
}

/// Broad class of an adaptive engine fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    Network,
    Media,
    Other,
}

/// Engine detail code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaultDetail {
    ManifestLoad,
    ManifestParse,
    SegmentLoad,
    Other(String),
}

impl FaultDetail {
    /// Parse the engine's detail string
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "manifestLoadError" => Self::ManifestLoad,
            "manifestParsingError" => Self::ManifestParse,
            "levelLoadError" => Self::SegmentLoad,
            other => Self::Other(other.to_string()),
        }
    }

    /// Terminal error for this detail
    #[must_use]
    pub fn playback_error(&self) -> PlaybackError {
        match self {
            Self::ManifestLoad => PlaybackError::fixed(
                "Manifest Load Error",
                "Unable to load the stream manifest from the server.",
                "Ensure the server is online and supports CORS.",
            ),
            Self::ManifestParse => PlaybackError::fixed(
                "Manifest Parsing Error",
                "The stream manifest is invalid or corrupted.",
                "Verify the stream source configuration.",
            ),
            Self::SegmentLoad => PlaybackError::fixed(
                "Segment Load Error",
                "Failed to load video segments.",
                "The camera might be offline or experiencing high latency.",
            ),
            Self::Other(_) => PlaybackError::fixed(
                "Stream Connection Failed",
                "A fatal error occurred during playback.",
                "Check your network connection and stream URL.",
            ),
        }
    }
}

/// Fault reported by the adaptive engine's error channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineFault {
    /// Configured source URL of the tile when the engine faulted
    pub source: String,
    pub kind: FaultKind,
    pub detail: FaultDetail,
    /// Non-fatal faults are handled inside the engine
    pub fatal: bool,
}

impl EngineFault {
    /// Fatal fault
    #[must_use]
    pub fn fatal(source: impl Into<String>, kind: FaultKind, detail: FaultDetail) -> Self {
        Self {
            source: source.into(),
            kind,
            detail,
            fatal: true,
        }
    }

    /// Non-fatal fault
    #[must_use]
    pub fn non_fatal(source: impl Into<String>, kind: FaultKind, detail: FaultDetail) -> Self {
        Self {
            fatal: false,
            ..Self::fatal(source, kind, detail)
        }
    }
}

/// Fault reported by the native media element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFault {
    /// Configured source URL of the tile when the element faulted
    pub source: String,
    /// Numeric media error code (1 aborted, 2 network, 3 decode, 4 unsupported)
    pub code: u16,
    /// Runtime-provided message, if any
    pub message: Option<String>,
}

impl MediaFault {
    /// Create a media fault
    #[must_use]
    pub fn new(source: impl Into<String>, code: u16) -> Self {
        Self {
            source: source.into(),
            code,
            message: None,
        }
    }

    /// With runtime message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Terminal error for this fault
    #[must_use]
    pub fn playback_error(&self) -> PlaybackError {
        media_error(self.code, self.message.as_deref())
    }
}

/// Map a native media error code to a viewer-facing error
#[must_use]
pub fn media_error(code: u16, message: Option<&str>) -> PlaybackError {
    match code {
        1 => PlaybackError::fixed(
            "Playback Aborted",
            "The video playback was aborted.",
            "Try refreshing the stream.",
        ),
        2 => PlaybackError::fixed(
            "Network Error",
            "A network error caused the video download to fail.",
            "Check your internet connection.",
        ),
        3 => PlaybackError::fixed(
            "Decoding Error",
            "Video data is corrupted or the format is not supported.",
            "The stream encoding (e.g., H.265) might not be supported by this runtime.",
        ),
        4 => PlaybackError::fixed(
            "Format Not Supported",
            "The video format or MIME type is not supported.",
            "Ensure the URL points to a valid MP4, WebM, or HLS stream.",
        ),
        _ => PlaybackError {
            title: "Playback Error".to_string(),
            message: message
                .filter(|m| !m.is_empty())
                .unwrap_or("Unknown error occurred")
                .to_string(),
            suggestion: Some("Try refreshing the stream.".to_string()),
        },
    }
}

/// Engine recovery capability to invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecoveryAction {
    /// Restart segment loading
    RestartLoad,
    /// Reset the decode pipeline
    RecoverDecode,
}

/// Outcome of classifying an engine fault
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultDecision {
    /// Engine handles it; nothing to do
    Ignore,
    /// Invoke a recovery call and stay connected
    Recover(RecoveryAction),
    /// Tear down and fail
    Fail(PlaybackError),
}

/// Classify an adaptive engine fault
///
/// `recoveries_used` counts recovery calls already made for this fault kind
/// on the current source; once it reaches `budget` the fault is terminal.
#[must_use]
pub fn classify_engine_fault(fault: &EngineFault, recoveries_used: u32, budget: u32) -> FaultDecision {
    if !fault.fatal {
        return FaultDecision::Ignore;
    }

    let action = match fault.kind {
        FaultKind::Network => Some(RecoveryAction::RestartLoad),
        FaultKind::Media => Some(RecoveryAction::RecoverDecode),
        FaultKind::Other => None,
    };

    match action {
        Some(action) if recoveries_used < budget => FaultDecision::Recover(action),
        _ => FaultDecision::Fail(fault.detail.playback_error()),
    }
}
