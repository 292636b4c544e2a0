//! Core types for Sentinel
//!
//! Defines the fundamental records shared by the alert and stream crates:
//! - Detection events and their classification
//! - Camera stream configuration
//! - Frame analysis results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Camera stream identifier
///
/// Stream ids are operator-assigned strings (short numbers for seeded
/// cameras, UUIDs for cameras added at runtime).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamId(pub String);

impl StreamId {
    /// Create from any string-like value
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random id
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow as str
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StreamId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Unique alert identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertId(pub Uuid);

impl AlertId {
    /// Generate new alert ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AlertId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AlertId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of detection that raised an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertCategory {
    Person,
    Vehicle,
    /// License plate recognition match
    Lpr,
    FaceMatch,
    Unauthorized,
}

impl AlertCategory {
    /// Display label as rendered on alert chips
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::Vehicle => "VEHICLE",
            Self::Lpr => "LPR",
            Self::FaceMatch => "FACE MATCH",
            Self::Unauthorized => "UNAUTHORIZED",
        }
    }
}

impl std::fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Alert severity
///
/// Ordered: `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

/// A single detection event
///
/// Immutable once created. Producers emit them with non-decreasing
/// timestamps; the dashboard feed keeps them newest-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityAlert {
    pub id: AlertId,
    pub stream_id: StreamId,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub category: AlertCategory,
    pub severity: Severity,
    pub description: String,
    /// Evidence frame (base64 data URL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl SecurityAlert {
    /// Create a new alert stamped with the current time
    #[must_use]
    pub fn new(
        stream_id: StreamId,
        category: AlertCategory,
        severity: Severity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: AlertId::new(),
            stream_id,
            timestamp: Utc::now(),
            category,
            severity,
            description: description.into(),
            thumbnail: None,
        }
    }

    /// With explicit timestamp
    #[inline]
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// With evidence image
    #[inline]
    #[must_use]
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    /// Whether two alerts describe the same detection from the same camera
    ///
    /// Compares the `(category, severity, stream)` triple only.
    #[inline]
    #[must_use]
    pub fn same_detection(&self, other: &SecurityAlert) -> bool {
        self.category == other.category
            && self.severity == other.severity
            && self.stream_id == other.stream_id
    }
}

/// Threat level returned by frame analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatLevel {
    #[default]
    Low,
    Medium,
    High,
}

/// Result of analysing a single camera frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default)]
    pub detected_objects: Vec<String>,
    #[serde(default)]
    pub threat_level: ThreatLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_plates: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faces_detected: Option<u32>,
}

/// Whether a camera is reachable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StreamAvailability {
    Online,
    #[default]
    Offline,
    Error,
}

/// Playback latency preference for provisioned streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LatencyMode {
    /// Segmented HTTP playback
    #[default]
    Standard,
    /// Realtime peer link
    LowLatency,
}

/// Camera stream configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraStream {
    pub id: StreamId,
    pub name: String,
    /// Playback URL (direct file, segmented manifest or realtime link)
    #[serde(default)]
    pub url: String,
    /// Original RTSP source, if the playback URL was provisioned from one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtsp_url: Option<String>,
    #[serde(default)]
    pub status: StreamAvailability,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub latency_mode: LatencyMode,
}

impl CameraStream {
    /// Create an online stream
    #[must_use]
    pub fn new(id: impl Into<StreamId>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
            rtsp_url: None,
            status: StreamAvailability::Online,
            location: String::new(),
            latency_mode: LatencyMode::Standard,
        }
    }

    /// With location
    #[inline]
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// With availability
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: StreamAvailability) -> Self {
        self.status = status;
        self
    }

    /// Whether the camera reports itself online
    #[inline]
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.status == StreamAvailability::Online
    }
}
