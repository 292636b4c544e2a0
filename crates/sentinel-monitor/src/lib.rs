//! Sentinel Monitor
//!
//! Headless host for the monitoring console: a dashboard of camera tiles,
//! each driving its own stream controller, a shared alert feed, and
//! auto-guard loops that periodically analyse frames.
//!
//! # Example
//!
//! ```rust,ignore
//! use sentinel_monitor::{Dashboard, HeadlessPlayer, SimulatedAnalyzer, guard};
//!
//! let dashboard = Arc::new(Dashboard::new(config, |s| HeadlessPlayer::new(s.id.clone())));
//! dashboard.mount_all(demo_streams())?;
//! let analyzer: Arc<dyn FrameAnalyzer> = Arc::new(SimulatedAnalyzer::seeded(42));
//! let guards = guard::spawn_all(&dashboard, &analyzer, config.guard.interval());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod analyzer;
pub mod dashboard;
pub mod error;
pub mod guard;
pub mod headless;
pub mod simulate;
pub mod tile;

// Re-exports for convenience
pub use analyzer::{Frame, FrameAnalyzer, SimulatedAnalyzer};
pub use dashboard::{demo_streams, BackendFactory, Dashboard};
pub use error::MonitorError;
pub use guard::{spawn_all, spawn_guard};
pub use headless::HeadlessPlayer;
pub use simulate::FaultInjector;
pub use tile::{AnalysisOutcome, Tile};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
