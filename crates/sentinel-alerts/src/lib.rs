//! Sentinel Alerts
//!
//! Turns the raw, newest-first stream of detection events into what the
//! dashboard sidebar shows.
//!
//! # Core Concepts
//!
//! - [`group_alerts`]: collapses runs of adjacent identical detections
//! - [`AlertGroup`]: a representative event plus its run length
//! - [`AlertFeed`]: the dashboard-owned, prepend-only event list
//! - [`alert_from_analysis`]: frame analysis result to alert mapping
//!
//! # Example
//!
//! ```rust,ignore
//! use sentinel_alerts::{AlertFeed, group_alerts};
//!
//! let feed = AlertFeed::unbounded();
//! feed.push(alert);
//! for group in feed.groups() {
//!     println!("{} {:?}", group.alert().description, group.badge(99));
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod aggregate;
mod analysis;
mod feed;

pub use aggregate::{group_alerts, AlertGroup};
pub use analysis::{alert_from_analysis, decode_analysis, fallback_analysis, DEFAULT_ANOMALY_DESCRIPTION};
pub use feed::AlertFeed;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
