//! Frame analysis seam
//!
//! Analyzers never fail outward: whatever goes wrong comes back as the
//! low-threat fallback result.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sentinel_alerts::decode_analysis;
use sentinel_core::{AnalysisResult, StreamId};
use std::time::Duration;

/// A captured camera frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub stream_id: StreamId,
    pub captured_at: DateTime<Utc>,
    /// JPEG as a base64 data URL
    pub data_url: String,
}

impl Frame {
    /// Raw base64 payload with any data-URL header removed
    #[must_use]
    pub fn base64_payload(&self) -> &str {
        ["data:image/jpeg;base64,", "data:image/jpg;base64,", "data:image/png;base64,"]
            .iter()
            .find_map(|prefix| self.data_url.strip_prefix(prefix))
            .unwrap_or(&self.data_url)
    }
}

/// Anything that can look at a frame and judge the threat
#[async_trait]
pub trait FrameAnalyzer: Send + Sync {
    /// Analyse one frame
    async fn analyze(&self, frame: &Frame) -> AnalysisResult;
}

const SCENES: [(&str, &[&str]); 4] = [
    ("Person loitering near restricted door", &["person"]),
    ("Vehicle stopped in fire lane", &["vehicle"]),
    ("Unidentified person climbing perimeter fence", &["person", "fence"]),
    ("Delivery van at loading dock after hours", &["vehicle", "van"]),
];

/// Random analyzer for demo sessions
///
/// Answers through the same JSON decoding path a remote analyzer uses.
#[derive(Debug)]
pub struct SimulatedAnalyzer {
    rng: Mutex<StdRng>,
    latency: Duration,
}

impl SimulatedAnalyzer {
    /// Create with a fixed seed
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            latency: Duration::from_millis(400),
        }
    }

    /// With simulated model latency
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn respond(&self) -> String {
        let mut rng = self.rng.lock();
        let roll: f64 = rng.random();
        let (level, scene) = if roll < 0.7 {
            ("LOW", None)
        } else if roll < 0.9 {
            ("MEDIUM", Some(SCENES[rng.random_range(0..SCENES.len())]))
        } else {
            ("HIGH", Some(SCENES[rng.random_range(0..SCENES.len())]))
        };

        let body = match scene {
            Some((description, objects)) => serde_json::json!({
                "detectedObjects": objects,
                "threatLevel": level,
                "description": description,
                "facesDetected": u32::from(objects.contains(&"person")),
            }),
            None => serde_json::json!({
                "detectedObjects": [],
                "threatLevel": level,
            }),
        };
        body.to_string()
    }
}

#[async_trait]
impl FrameAnalyzer for SimulatedAnalyzer {
    async fn analyze(&self, frame: &Frame) -> AnalysisResult {
        tokio::time::sleep(self.latency).await;
        let body = self.respond();
        tracing::debug!(stream = %frame.stream_id, %body, "simulated analysis");
        decode_analysis(&body)
    }
}
