//! Sentinel Core
//!
//! Shared vocabulary for the Sentinel monitoring console:
//! - Detection events ([`SecurityAlert`]) with category and severity
//! - Camera stream configuration ([`CameraStream`])
//! - Frame analysis results ([`AnalysisResult`])
//! - Configuration loading ([`SentinelConfig`])
//! - Logging initialisation ([`logging::init`], [`logging::bootstrap`])
//!
//! # Example
//!
//! ```rust,ignore
//! use sentinel_core::logging;
//! use std::path::Path;
//!
//! let config = logging::bootstrap(Some(Path::new("sentinel.toml")))?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

// Re-exports for convenience
pub use config::{AlertsConfig, GuardConfig, LoggingConfig, SentinelConfig, StreamConfig};
pub use error::{ConfigError, SentinelError};
pub use types::{
    AlertCategory, AlertId, AnalysisResult, CameraStream, LatencyMode, SecurityAlert, Severity,
    StreamAvailability, StreamId, ThreatLevel,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Sentinel types
    pub use crate::{
        AlertCategory, AnalysisResult, CameraStream, SecurityAlert, SentinelConfig, Severity,
        StreamId, ThreatLevel,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
