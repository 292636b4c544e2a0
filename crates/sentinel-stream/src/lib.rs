//! Sentinel Stream
//!
//! Best-effort playback for one camera tile without ever leaving the tile
//! stuck in an ambiguous loading state.
//!
//! # Core Concepts
//!
//! - [`Transport`]: how a URL is played (unsupported, direct file,
//!   adaptive segmented, simulated realtime)
//! - [`LifecyclePhase`]: `new -> connecting -> connected -> failed`, plus
//!   `unsupported` for transports with no decoder
//! - [`StreamController`]: per-tile state machine driving a [`PlayerBackend`]
//! - [`PlaybackError`]: title, message and suggestion shown on failure
//!
//! # Example
//!
//! ```rust,ignore
//! use sentinel_stream::{StreamController, LifecyclePhase};
//!
//! let controller = StreamController::new(backend, config.stream.clone());
//! controller.set_source("https://test-streams.mux.dev/x36xhzz/x36xhzz.m3u8")?;
//! assert_eq!(controller.phase(), LifecyclePhase::Connected);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod backend;
pub mod controller;
pub mod error;
pub mod fault;
pub mod metrics;
pub mod phase;
pub mod provision;
pub mod status;
pub mod transport;

// Re-exports for convenience
pub use backend::PlayerBackend;
pub use controller::{FaultOutcome, StreamController};
pub use error::StreamError;
pub use fault::{
    capability_error, classify_engine_fault, media_error, EngineFault, FaultDecision, FaultDetail,
    FaultKind, MediaFault, PlaybackError, RecoveryAction,
};
pub use metrics::LinkMetrics;
pub use phase::{allowed_transitions, validate_transition, LifecyclePhase};
pub use provision::{provision, select_output};
pub use status::StreamStatus;
pub use transport::Transport;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
