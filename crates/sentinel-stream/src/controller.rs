//! Stream resilience controller
//!
//! One controller per camera tile. It owns the tile's player backend,
//! attaches playback for the configured URL, classifies faults, applies the
//! engine's own recovery calls within a fixed budget and otherwise parks the
//! source in a terminal phase with a [`PlaybackError`].
//!
//! Every URL change bumps a generation counter. Timer tasks are checked
//! against the current generation, and fault reports against the configured
//! source URL, before they touch state, so callbacks from an old source are
//! dropped. Realtime links all attach the same stand-in asset, so the URL
//! handed to the backend cannot tell two sources apart.

use crate::backend::PlayerBackend;
use crate::error::StreamError;
use crate::fault::{
    capability_error, classify_engine_fault, EngineFault, FaultDecision, FaultKind, MediaFault,
    PlaybackError, RecoveryAction,
};
use crate::metrics::LinkMetrics;
use crate::phase::{validate_transition, LifecyclePhase};
use crate::status::StreamStatus;
use crate::transport::Transport;
use parking_lot::Mutex;
use sentinel_core::StreamConfig;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// What the controller did with a reported fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultOutcome {
    /// Fault belongs to a source that is no longer attached
    Stale,
    /// Nothing to do in the current phase, or the engine handles it
    Ignored,
    /// A recovery call was made; still connected
    Recovered(RecoveryAction),
    /// Source moved to `Failed`
    Failed,
}

struct Inner<B> {
    backend: B,
    generation: u64,
    status: StreamStatus,
    /// URL currently handed to the backend
    attached: Option<String>,
    /// An adaptive engine owns fault reporting for this source
    adaptive_active: bool,
    recoveries: HashMap<FaultKind, u32>,
    pending: Option<JoinHandle<()>>,
    status_tx: watch::Sender<StreamStatus>,
}

impl<B: PlayerBackend> Inner<B> {
    fn enter(&mut self, to: LifecyclePhase) -> Result<(), StreamError> {
        let from = self.status.phase;
        validate_transition(from, to)?;
        tracing::info!(url = %self.status.url, %from, %to, "stream phase change");
        self.status.phase = to;
        Ok(())
    }

    fn publish(&self) {
        self.status_tx.send_replace(self.status.clone());
    }

    fn attach_direct(&mut self, url: &str) {
        self.backend.attach_direct(url);
        self.attached = Some(url.to_string());
    }

    fn detach(&mut self) {
        if self.attached.take().is_some() {
            self.backend.detach();
        }
    }

    /// Cancel timers and release the player for the current source
    fn teardown(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
        self.detach();
        self.adaptive_active = false;
        self.recoveries.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Whether a fault raised for `source` belongs to the live source
    fn owns(&self, source: &str) -> bool {
        self.status.url == source && self.attached.is_some()
    }

    fn fail(&mut self, error: PlaybackError) -> Result<(), StreamError> {
        self.detach();
        self.enter(LifecyclePhase::Failed)?;
        tracing::warn!(url = %self.status.url, error = %error, "stream failed");
        self.status.error = Some(error);
        self.status.metrics = None;
        Ok(())
    }
}

/// Per-tile playback controller
pub struct StreamController<B: PlayerBackend + 'static> {
    inner: Arc<Mutex<Inner<B>>>,
    config: StreamConfig,
}

impl<B: PlayerBackend + 'static> StreamController<B> {
    /// Create a controller with no source configured
    #[must_use]
    pub fn new(backend: B, config: StreamConfig) -> Self {
        let status = StreamStatus::idle();
        let (status_tx, _) = watch::channel(status.clone());
        Self {
            inner: Arc::new(Mutex::new(Inner {
                backend,
                generation: 0,
                status,
                attached: None,
                adaptive_active: false,
                recoveries: HashMap::new(),
                pending: None,
                status_tx,
            })),
            config,
        }
    }

    /// Receive a fresh status on every change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<StreamStatus> {
        self.inner.lock().status_tx.subscribe()
    }

    /// Current status snapshot
    #[must_use]
    pub fn status(&self) -> StreamStatus {
        self.inner.lock().status.clone()
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> LifecyclePhase {
        self.inner.lock().status.phase
    }

    /// Controller tuning
    #[inline]
    #[must_use]
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Configure a new source URL
    ///
    /// Tears down whatever the previous URL attached, resets to `New` and
    /// starts the new source. Setting the URL that is already configured
    /// does nothing, so a failed source stays failed until the URL changes.
    /// Realtime links need a Tokio runtime to drive their timers.
    ///
    /// # Errors
    /// - `StreamError::NoRuntime` for a realtime URL outside a runtime
    pub fn set_source(&self, url: impl Into<String>) -> Result<(), StreamError> {
        let url = url.into();
        let mut inner = self.inner.lock();
        if inner.status.url == url {
            return Ok(());
        }

        let transport = (!url.trim().is_empty()).then(|| Transport::classify(&url));
        let runtime = match transport {
            Some(Transport::SimulatedRealtime) => Some(
                tokio::runtime::Handle::try_current()
                    .map_err(|_| StreamError::NoRuntime("realtime link negotiation"))?,
            ),
            _ => None,
        };

        inner.teardown();
        inner.enter(LifecyclePhase::New)?;
        inner.status = StreamStatus {
            url: url.clone(),
            transport,
            ..StreamStatus::idle()
        };

        match transport {
            None => {
                tracing::debug!("stream source cleared");
            }
            Some(Transport::Unsupported) => {
                let error = capability_error();
                tracing::warn!(%url, error = %error, "stream transport unsupported");
                inner.status.error = Some(error);
                inner.enter(LifecyclePhase::Unsupported)?;
            }
            Some(Transport::DirectFile) => {
                inner.attach_direct(&url);
                inner.enter(LifecyclePhase::Connected)?;
            }
            Some(Transport::AdaptiveSegmented) => {
                if inner.backend.supports_adaptive() {
                    inner.backend.attach_adaptive(&url);
                    inner.attached = Some(url.clone());
                    inner.adaptive_active = true;
                } else {
                    tracing::debug!(%url, "no adaptive engine; using native playback");
                    inner.attach_direct(&url);
                }
                inner.enter(LifecyclePhase::Connected)?;
            }
            Some(Transport::SimulatedRealtime) => {
                inner.enter(LifecyclePhase::Connecting)?;
                if let Some(runtime) = runtime {
                    let task = runtime.spawn(negotiate(
                        Arc::clone(&self.inner),
                        inner.generation,
                        self.config.clone(),
                    ));
                    inner.pending = Some(task);
                }
            }
        }

        inner.publish();
        Ok(())
    }

    /// Fault channel of the adaptive engine
    ///
    /// # Errors
    /// Only on an internal transition bug
    pub fn report_engine_fault(&self, fault: &EngineFault) -> Result<FaultOutcome, StreamError> {
        let mut inner = self.inner.lock();
        if !inner.owns(&fault.source) {
            tracing::debug!(source = %fault.source, "dropping fault from detached source");
            return Ok(FaultOutcome::Stale);
        }
        if !inner.adaptive_active || inner.status.phase != LifecyclePhase::Connected {
            return Ok(FaultOutcome::Ignored);
        }

        let used = inner.recoveries.get(&fault.kind).copied().unwrap_or(0);
        match classify_engine_fault(fault, used, self.config.recoveries_per_kind) {
            FaultDecision::Ignore => Ok(FaultOutcome::Ignored),
            FaultDecision::Recover(action) => {
                *inner.recoveries.entry(fault.kind).or_insert(0) += 1;
                tracing::info!(
                    url = %inner.status.url,
                    kind = ?fault.kind,
                    ?action,
                    attempt = used + 1,
                    "recovering adaptive stream"
                );
                match action {
                    RecoveryAction::RestartLoad => inner.backend.restart_load(),
                    RecoveryAction::RecoverDecode => inner.backend.recover_decode(),
                }
                Ok(FaultOutcome::Recovered(action))
            }
            FaultDecision::Fail(error) => {
                inner.fail(error)?;
                inner.publish();
                Ok(FaultOutcome::Failed)
            }
        }
    }

    /// Fault channel of the native media surface
    ///
    /// Ignored while an adaptive engine owns the source. For a realtime link
    /// the fault names the configured realtime URL, not the stand-in asset.
    ///
    /// # Errors
    /// Only on an internal transition bug
    pub fn report_media_fault(&self, fault: &MediaFault) -> Result<FaultOutcome, StreamError> {
        let mut inner = self.inner.lock();
        if !inner.owns(&fault.source) {
            tracing::debug!(source = %fault.source, "dropping fault from detached source");
            return Ok(FaultOutcome::Stale);
        }
        if inner.adaptive_active || inner.status.phase != LifecyclePhase::Connected {
            return Ok(FaultOutcome::Ignored);
        }

        inner.fail(fault.playback_error())?;
        inner.publish();
        Ok(FaultOutcome::Failed)
    }

    /// Release the source, as when the tile unmounts
    pub fn shutdown(&self) {
        let mut inner = self.inner.lock();
        inner.teardown();
        inner.status = StreamStatus::idle();
        inner.publish();
    }
}

impl<B: PlayerBackend + 'static> Drop for StreamController<B> {
    fn drop(&mut self) {
        self.inner.lock().teardown();
    }
}

impl<B: PlayerBackend + 'static> std::fmt::Debug for StreamController<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamController")
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

/// Simulated realtime link: negotiate, connect, then refresh metrics
async fn negotiate<B: PlayerBackend + 'static>(
    inner: Arc<Mutex<Inner<B>>>,
    generation: u64,
    config: StreamConfig,
) {
    tokio::time::sleep(config.negotiation_delay()).await;

    {
        let mut guard = inner.lock();
        if !guard.is_current(generation) {
            tracing::debug!("discarding stale link negotiation");
            return;
        }
        guard.attach_direct(&config.realtime_standin_url);
        if let Err(e) = guard.enter(LifecyclePhase::Connected) {
            tracing::warn!(error = %e, "realtime link could not connect");
            return;
        }
        guard.status.metrics = Some(LinkMetrics::sample(&mut rand::rng()));
        guard.publish();
    }

    let mut ticker = tokio::time::interval(config.metrics_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let mut guard = inner.lock();
        if !guard.is_current(generation) || guard.status.phase != LifecyclePhase::Connected {
            break;
        }
        guard.status.metrics = Some(LinkMetrics::sample(&mut rand::rng()));
        guard.publish();
    }
}
