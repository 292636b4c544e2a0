//! Random playback faults for demo sessions
//!
//! Feeds faults into a tile through the same channels a real media runtime
//! would use, so recovery and failure paths show up in a headless run.

use crate::tile::Tile;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sentinel_stream::{
    EngineFault, FaultDetail, FaultKind, FaultOutcome, LifecyclePhase, MediaFault, PlayerBackend,
    StreamError, Transport,
};

const ENGINE_FAULTS: [(FaultKind, &str); 4] = [
    (FaultKind::Network, "fragLoadError"),
    (FaultKind::Network, "manifestLoadError"),
    (FaultKind::Media, "bufferStalledError"),
    (FaultKind::Other, "internalException"),
];

/// Seeded fault source
#[derive(Debug)]
pub struct FaultInjector {
    rng: Mutex<StdRng>,
    probability: f64,
}

impl FaultInjector {
    /// Create with a fixed seed; `probability` is clamped to `0.0..=1.0`
    #[must_use]
    pub fn seeded(seed: u64, probability: f64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            probability: probability.clamp(0.0, 1.0),
        }
    }

    /// Maybe report one fault against the tile's current source
    ///
    /// Returns `None` when no fault was drawn or the transport has no fault
    /// channel to inject into. A realtime link only has one once connected.
    ///
    /// # Errors
    /// Propagates controller errors
    pub fn inject<B: PlayerBackend + 'static>(
        &self,
        tile: &Tile<B>,
    ) -> Result<Option<FaultOutcome>, StreamError> {
        let status = tile.status();
        let mut rng = self.rng.lock();
        if !rng.random_bool(self.probability) {
            return Ok(None);
        }

        let outcome = match status.transport {
            Some(Transport::AdaptiveSegmented) => {
                let (kind, code) = ENGINE_FAULTS[rng.random_range(0..ENGINE_FAULTS.len())];
                let fault = EngineFault::fatal(status.url.clone(), kind, FaultDetail::from_code(code));
                drop(rng);
                tile.controller().report_engine_fault(&fault)?
            }
            Some(Transport::DirectFile) => {
                let fault = MediaFault::new(status.url.clone(), rng.random_range(1..=4));
                drop(rng);
                tile.controller().report_media_fault(&fault)?
            }
            // the stand-in asset only has a media surface once the link is up
            Some(Transport::SimulatedRealtime) if status.phase == LifecyclePhase::Connected => {
                let fault = MediaFault::new(status.url.clone(), rng.random_range(1..=4));
                drop(rng);
                tile.controller().report_media_fault(&fault)?
            }
            _ => return Ok(None),
        };

        tracing::info!(stream = %tile.id(), ?outcome, "injected playback fault");
        Ok(Some(outcome))
    }
}
