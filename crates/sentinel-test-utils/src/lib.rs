//! Testing utilities for the Sentinel workspace
//!
//! Shared fixtures, a call-recording player and a scripted analyzer.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use sentinel_core::{
    AlertCategory, AnalysisResult, CameraStream, SecurityAlert, Severity, StreamConfig, StreamId,
    ThreatLevel,
};
use sentinel_monitor::{Frame, FrameAnalyzer};
use sentinel_stream::PlayerBackend;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const HLS_URL: &str = "https://test-streams.mux.dev/x36xhzz/x36xhzz.m3u8";
pub const MP4_URL: &str = "https://media.w3.org/2010/05/sintel/trailer.mp4";
pub const ALT_MP4_URL: &str =
    "http://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4";
pub const RTSP_URL: &str = "rtsp://192.168.1.40:554/stream1";
pub const REALTIME_URL: &str = "mock-webrtc://stream-01";

pub fn alert_on(stream: &str, category: AlertCategory, severity: Severity) -> SecurityAlert {
    SecurityAlert::new(
        StreamId::new(stream),
        category,
        severity,
        format!("{} on camera {stream}", category.label()),
    )
}

pub fn alert_burst(
    stream: &str,
    category: AlertCategory,
    severity: Severity,
    n: usize,
) -> Vec<SecurityAlert> {
    (0..n).map(|_| alert_on(stream, category, severity)).collect()
}

pub fn camera(id: &str, url: &str) -> CameraStream {
    CameraStream::new(id, format!("Camera {id}"), url)
}

/// Controller tuning with short, round timings
pub fn fast_stream_config() -> StreamConfig {
    StreamConfig::default().with_negotiation_delay_ms(100)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCall {
    AttachAdaptive(String),
    AttachDirect(String),
    RestartLoad,
    RecoverDecode,
    Detach,
}

/// Player that records every call into a shared log
#[derive(Debug, Clone)]
pub struct RecordingPlayer {
    calls: Arc<Mutex<Vec<PlayerCall>>>,
    adaptive: bool,
}

impl RecordingPlayer {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            adaptive: true,
        }
    }

    pub fn without_adaptive(mut self) -> Self {
        self.adaptive = false;
        self
    }

    /// Handle onto the call log that outlives the player
    pub fn log(&self) -> CallLog {
        CallLog(Arc::clone(&self.calls))
    }

    fn record(&self, call: PlayerCall) {
        self.calls.lock().push(call);
    }
}

impl Default for RecordingPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerBackend for RecordingPlayer {
    fn supports_adaptive(&self) -> bool {
        self.adaptive
    }

    fn attach_adaptive(&mut self, url: &str) {
        self.record(PlayerCall::AttachAdaptive(url.to_string()));
    }

    fn attach_direct(&mut self, url: &str) {
        self.record(PlayerCall::AttachDirect(url.to_string()));
    }

    fn restart_load(&mut self) {
        self.record(PlayerCall::RestartLoad);
    }

    fn recover_decode(&mut self) {
        self.record(PlayerCall::RecoverDecode);
    }

    fn detach(&mut self) {
        self.record(PlayerCall::Detach);
    }
}

#[derive(Debug, Clone)]
pub struct CallLog(Arc<Mutex<Vec<PlayerCall>>>);

impl CallLog {
    pub fn calls(&self) -> Vec<PlayerCall> {
        self.0.lock().clone()
    }

    pub fn count(&self, call: &PlayerCall) -> usize {
        self.0.lock().iter().filter(|c| *c == call).count()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

pub fn threat(level: ThreatLevel, description: &str) -> AnalysisResult {
    AnalysisResult {
        threat_level: level,
        description: Some(description.to_string()),
        ..AnalysisResult::default()
    }
}

/// Analyzer that replays queued results, then answers LOW
#[derive(Debug, Default)]
pub struct ScriptedAnalyzer {
    script: Mutex<VecDeque<AnalysisResult>>,
    latency: Duration,
    calls: AtomicUsize,
    running: AtomicUsize,
    max_running: AtomicUsize,
}

impl ScriptedAnalyzer {
    pub fn new(script: impl IntoIterator<Item = AnalysisResult>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Most analyses ever in flight at once
    pub fn max_concurrent(&self) -> usize {
        self.max_running.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FrameAnalyzer for ScriptedAnalyzer {
    async fn analyze(&self, _frame: &Frame) -> AnalysisResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_running.fetch_max(running, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let result = self.script.lock().pop_front().unwrap_or_default();

        self.running.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
