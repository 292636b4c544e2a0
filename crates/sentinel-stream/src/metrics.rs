//! Synthetic link metrics
//!
//! Cosmetic figures for realtime tiles. Nothing reads them to make playback
//! decisions.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Link quality snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkMetrics {
    pub bitrate_kbps: u32,
    pub rtt_ms: u32,
    pub fps: u32,
}

impl LinkMetrics {
    /// Draw a plausible sample for a healthy low-latency link
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            bitrate_kbps: rng.random_range(2000..=4500),
            rtt_ms: rng.random_range(15..=45),
            fps: rng.random_range(28..=30),
        }
    }
}

impl std::fmt::Display for LinkMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} kbps | {} ms RTT | {} fps", self.bitrate_kbps, self.rtt_ms, self.fps)
    }
}
