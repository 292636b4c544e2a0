//! Sentinel configuration
//!
//! Loaded from TOML or YAML (selected by file extension). Every field has a
//! default, so an empty file yields [`SentinelConfig::default`].

use crate::error::ConfigError;
use crate::types::CameraStream;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Stand-in asset played once a simulated realtime link is up
pub const DEFAULT_REALTIME_STANDIN_URL: &str =
    "https://media.w3.org/2010/05/sintel/trailer.mp4";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SentinelConfig {
    /// Playback controller tuning
    pub stream: StreamConfig,
    /// Alert feed tuning
    pub alerts: AlertsConfig,
    /// Auto-guard analysis loop
    pub guard: GuardConfig,
    /// Log output
    pub logging: LoggingConfig,
    /// Cameras shown on the dashboard
    pub streams: Vec<CameraStream>,
}

impl SentinelConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a `.toml`, `.yaml` or `.yml` file
    ///
    /// # Errors
    /// Returns error if the file cannot be read, parsed or validated
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match ext.as_str() {
            "toml" => Self::from_toml(&raw),
            "yaml" | "yml" => Self::from_yaml(&raw),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Parse from TOML string
    ///
    /// # Errors
    /// Returns error if TOML is invalid or values fail validation
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from YAML string
    ///
    /// # Errors
    /// Returns error if YAML is invalid or values fail validation
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = if raw.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(raw)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the runtime cannot work with
    ///
    /// # Errors
    /// Returns the first offending field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stream.metrics_interval_ms == 0 {
            return Err(ConfigError::invalid("stream.metrics_interval_ms", "must be > 0"));
        }
        if self.guard.interval_secs == 0 {
            return Err(ConfigError::invalid("guard.interval_secs", "must be > 0"));
        }
        if self.alerts.badge_cap < 2 {
            return Err(ConfigError::invalid("alerts.badge_cap", "must be >= 2"));
        }
        if self.alerts.retention == Some(0) {
            return Err(ConfigError::invalid("alerts.retention", "must be > 0 when set"));
        }
        Ok(())
    }

    /// With stream configuration
    #[inline]
    #[must_use]
    pub fn with_stream(mut self, stream: StreamConfig) -> Self {
        self.stream = stream;
        self
    }

    /// With a camera appended
    #[inline]
    #[must_use]
    pub fn with_camera(mut self, camera: CameraStream) -> Self {
        self.streams.push(camera);
        self
    }
}

/// Playback controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Simulated link negotiation before a realtime source connects
    pub negotiation_delay_ms: u64,
    /// Refresh period of synthetic link metrics
    pub metrics_interval_ms: u64,
    /// Asset attached once a realtime link is up
    pub realtime_standin_url: String,
    /// Engine recovery calls allowed per fault kind before failing
    pub recoveries_per_kind: u32,
    /// Simulated transcoder start-up time
    pub provision_delay_ms: u64,
}

impl StreamConfig {
    /// Negotiation delay as a duration
    #[inline]
    #[must_use]
    pub fn negotiation_delay(&self) -> Duration {
        Duration::from_millis(self.negotiation_delay_ms)
    }

    /// Metrics period as a duration
    #[inline]
    #[must_use]
    pub fn metrics_interval(&self) -> Duration {
        Duration::from_millis(self.metrics_interval_ms)
    }

    /// Provisioning delay as a duration
    #[inline]
    #[must_use]
    pub fn provision_delay(&self) -> Duration {
        Duration::from_millis(self.provision_delay_ms)
    }

    /// With negotiation delay
    #[inline]
    #[must_use]
    pub fn with_negotiation_delay_ms(mut self, ms: u64) -> Self {
        self.negotiation_delay_ms = ms;
        self
    }

    /// With recovery budget
    #[inline]
    #[must_use]
    pub fn with_recoveries_per_kind(mut self, n: u32) -> Self {
        self.recoveries_per_kind = n;
        self
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            negotiation_delay_ms: 1500,
            metrics_interval_ms: 1000,
            realtime_standin_url: DEFAULT_REALTIME_STANDIN_URL.to_string(),
            recoveries_per_kind: 1,
            provision_delay_ms: 1500,
        }
    }
}

/// Alert feed configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    /// Maximum events kept in the feed (oldest dropped first)
    pub retention: Option<usize>,
    /// Group counts above this render as `"{cap}+"`
    pub badge_cap: u32,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            retention: Some(500),
            badge_cap: 99,
        }
    }
}

/// Auto-guard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Seconds between automatic frame analyses
    pub interval_secs: u64,
    /// Whether tiles start with auto-guard enabled
    pub enabled_by_default: bool,
}

impl GuardConfig {
    /// Interval as a duration
    #[inline]
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            enabled_by_default: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LatencyMode, StreamAvailability};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_toml_is_default() {
        let config = SentinelConfig::from_toml("").unwrap();
        assert_eq!(config, SentinelConfig::default());
    }

    #[test]
    fn empty_yaml_is_default() {
        let config = SentinelConfig::from_yaml("").unwrap();
        assert_eq!(config, SentinelConfig::default());
    }

    #[test]
    fn toml_overrides_and_streams() {
        let config = SentinelConfig::from_toml(
            r#"
            [stream]
            negotiation_delay_ms = 200

            [alerts]
            badge_cap = 9

            [[streams]]
            id = "2"
            name = "Perimeter HLS"
            url = "https://test-streams.mux.dev/x36xhzz/x36xhzz.m3u8"
            status = "online"
            latencyMode = "LOW_LATENCY"
            "#,
        )
        .unwrap();

        assert_eq!(config.stream.negotiation_delay_ms, 200);
        assert_eq!(config.stream.metrics_interval_ms, 1000);
        assert_eq!(config.alerts.badge_cap, 9);
        assert_eq!(config.streams.len(), 1);
        assert_eq!(config.streams[0].status, StreamAvailability::Online);
        assert_eq!(config.streams[0].latency_mode, LatencyMode::LowLatency);
    }

    #[test]
    fn yaml_overrides() {
        let config = SentinelConfig::from_yaml(
            "guard:\n  interval_secs: 3\nlogging:\n  json: true\n",
        )
        .unwrap();

        assert_eq!(config.guard.interval_secs, 3);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn zero_metrics_interval_rejected() {
        let err = SentinelConfig::from_toml("[stream]\nmetrics_interval_ms = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { field: "stream.metrics_interval_ms", .. }
        ));
    }

    #[test]
    fn unknown_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentinel.ini");
        std::fs::write(&path, "").unwrap();

        let err = SentinelConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ext) if ext == "ini"));
    }

    #[test]
    fn load_reads_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentinel.yml");
        std::fs::write(&path, "stream:\n  recoveries_per_kind: 3\n").unwrap();

        let config = SentinelConfig::load(&path).unwrap();
        assert_eq!(config.stream.recoveries_per_kind, 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SentinelConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
