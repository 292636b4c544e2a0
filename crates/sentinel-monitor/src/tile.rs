//! Camera tile
//!
//! A tile owns exactly one stream controller and its player backend; tiles
//! never share players.

use crate::analyzer::{Frame, FrameAnalyzer};
use crate::error::MonitorError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use parking_lot::RwLock;
use sentinel_alerts::alert_from_analysis;
use sentinel_core::{CameraStream, SecurityAlert, StreamConfig, StreamId};
use sentinel_stream::{LifecyclePhase, PlayerBackend, StreamController, StreamStatus};
use std::sync::atomic::{AtomicBool, Ordering};

/// Result of one analysis request
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// Another analysis is still running on this tile
    Busy,
    /// Nothing is playing, so there is no frame to grab
    NoFrame,
    /// Analysed; nothing worth an alert
    Clear,
    /// Analysed; threat found
    Alert(SecurityAlert),
}

/// Clears the in-flight flag however the analysis ends
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One camera on the dashboard
pub struct Tile<B: PlayerBackend + 'static> {
    stream: RwLock<CameraStream>,
    controller: StreamController<B>,
    auto_guard: AtomicBool,
    analyzing: AtomicBool,
}

impl<B: PlayerBackend + 'static> Tile<B> {
    /// Mount a tile and start playback of its URL
    ///
    /// # Errors
    /// Returns error if the controller rejects the source
    pub fn mount(stream: CameraStream, backend: B, config: StreamConfig) -> Result<Self, MonitorError> {
        let controller = StreamController::new(backend, config);
        controller.set_source(stream.url.clone())?;
        tracing::info!(stream = %stream.id, name = %stream.name, "tile mounted");

        Ok(Self {
            stream: RwLock::new(stream),
            controller,
            auto_guard: AtomicBool::new(false),
            analyzing: AtomicBool::new(false),
        })
    }

    /// Stream id
    #[must_use]
    pub fn id(&self) -> StreamId {
        self.stream.read().id.clone()
    }

    /// Current stream configuration
    #[must_use]
    pub fn stream(&self) -> CameraStream {
        self.stream.read().clone()
    }

    /// Apply edited configuration; a changed URL restarts playback
    ///
    /// # Errors
    /// Returns error if the controller rejects the new source
    pub fn update(&self, stream: CameraStream) -> Result<(), MonitorError> {
        let url_changed = self.stream.read().url != stream.url;
        if url_changed {
            self.controller.set_source(stream.url.clone())?;
        }
        *self.stream.write() = stream;
        Ok(())
    }

    /// Playback controller
    #[inline]
    #[must_use]
    pub fn controller(&self) -> &StreamController<B> {
        &self.controller
    }

    /// Current playback status
    #[must_use]
    pub fn status(&self) -> StreamStatus {
        self.controller.status()
    }

    /// Toggle periodic analysis
    pub fn set_auto_guard(&self, enabled: bool) {
        self.auto_guard.store(enabled, Ordering::Release);
        tracing::info!(stream = %self.id(), enabled, "auto-guard toggled");
    }

    /// Whether periodic analysis is on
    #[must_use]
    pub fn auto_guard(&self) -> bool {
        self.auto_guard.load(Ordering::Acquire)
    }

    /// Whether a periodic analysis should run now
    ///
    /// Requires auto-guard on, the camera online and no playback error.
    #[must_use]
    pub fn guard_eligible(&self) -> bool {
        self.auto_guard() && self.stream.read().is_online() && self.status().error.is_none()
    }

    fn capture(&self) -> Option<Frame> {
        if self.controller.phase() != LifecyclePhase::Connected {
            return None;
        }
        let stream_id = self.id();
        let captured_at = Utc::now();
        // Headless surfaces have no pixels; tag the frame so it is traceable.
        let data_url = format!(
            "data:image/jpeg;base64,{}",
            STANDARD.encode(format!("{stream_id}@{}", captured_at.timestamp_millis()))
        );
        Some(Frame {
            stream_id,
            captured_at,
            data_url,
        })
    }

    /// Grab the current frame and analyse it
    ///
    /// Overlapping requests on the same tile are refused with `Busy`.
    pub async fn analyze(&self, analyzer: &dyn FrameAnalyzer) -> AnalysisOutcome {
        if self.analyzing.swap(true, Ordering::AcqRel) {
            return AnalysisOutcome::Busy;
        }
        let _in_flight = InFlight(&self.analyzing);

        let Some(frame) = self.capture() else {
            return AnalysisOutcome::NoFrame;
        };

        let result = analyzer.analyze(&frame).await;
        match alert_from_analysis(&frame.stream_id, &result, Some(&frame.data_url)) {
            Some(alert) => AnalysisOutcome::Alert(alert),
            None => AnalysisOutcome::Clear,
        }
    }

    /// Release playback, as on unmount
    pub fn unmount(&self) {
        self.set_auto_guard(false);
        self.controller.shutdown();
        tracing::info!(stream = %self.id(), "tile unmounted");
    }
}

impl<B: PlayerBackend + 'static> std::fmt::Debug for Tile<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tile")
            .field("stream", &*self.stream.read())
            .field("controller", &self.controller)
            .field("auto_guard", &self.auto_guard())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::SimulatedAnalyzer;
    use crate::headless::HeadlessPlayer;
    use sentinel_core::StreamAvailability;
    use std::time::Duration;

    fn tile(url: &str) -> Tile<HeadlessPlayer> {
        let stream = CameraStream::new("7", "Dock", url);
        Tile::mount(stream, HeadlessPlayer::new("7".into()), StreamConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn nothing_to_analyse_without_playback() {
        let tile = tile("rtsp://10.1.1.1/cam");
        let analyzer = SimulatedAnalyzer::seeded(3).with_latency(Duration::ZERO);

        assert_eq!(tile.analyze(&analyzer).await, AnalysisOutcome::NoFrame);
    }

    #[test]
    fn eligibility_needs_guard_online_and_healthy() {
        let tile = tile("https://media.w3.org/2010/05/sintel/trailer.mp4");
        assert!(!tile.guard_eligible());

        tile.set_auto_guard(true);
        assert!(tile.guard_eligible());

        let offline = tile.stream().with_status(StreamAvailability::Offline);
        tile.update(offline).unwrap();
        assert!(!tile.guard_eligible());
    }

    #[test]
    fn captured_frames_carry_a_data_url() {
        let tile = tile("https://media.w3.org/2010/05/sintel/trailer.mp4");
        let frame = tile.capture().unwrap();

        assert!(frame.data_url.starts_with("data:image/jpeg;base64,"));
        assert!(!frame.base64_payload().is_empty());
        assert_eq!(frame.stream_id, StreamId::new("7"));
    }
}
