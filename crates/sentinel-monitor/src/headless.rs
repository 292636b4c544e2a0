//! Player backend with no surface
//!
//! Used by the command line host: every player call is logged and the
//! attached URL is remembered so faults can be injected against it.

use sentinel_core::StreamId;
use sentinel_stream::PlayerBackend;

/// Surface-less player for one tile
#[derive(Debug, Clone)]
pub struct HeadlessPlayer {
    stream: StreamId,
    adaptive: bool,
    attached: Option<String>,
}

impl HeadlessPlayer {
    /// Player with an adaptive engine available
    #[must_use]
    pub fn new(stream: StreamId) -> Self {
        Self {
            stream,
            adaptive: true,
            attached: None,
        }
    }

    /// Without an adaptive engine; manifests fall back to native playback
    #[inline]
    #[must_use]
    pub fn without_adaptive(mut self) -> Self {
        self.adaptive = false;
        self
    }

    /// URL currently on the surface
    #[must_use]
    pub fn attached(&self) -> Option<&str> {
        self.attached.as_deref()
    }
}

impl PlayerBackend for HeadlessPlayer {
    fn supports_adaptive(&self) -> bool {
        self.adaptive
    }

    fn attach_adaptive(&mut self, url: &str) {
        tracing::debug!(stream = %self.stream, %url, "adaptive engine attached");
        self.attached = Some(url.to_string());
    }

    fn attach_direct(&mut self, url: &str) {
        tracing::debug!(stream = %self.stream, %url, "native playback attached");
        self.attached = Some(url.to_string());
    }

    fn restart_load(&mut self) {
        tracing::debug!(stream = %self.stream, "adaptive engine restarting load");
    }

    fn recover_decode(&mut self) {
        tracing::debug!(stream = %self.stream, "adaptive engine recovering decode");
    }

    fn detach(&mut self) {
        if let Some(url) = self.attached.take() {
            tracing::debug!(stream = %self.stream, %url, "player detached");
        }
    }
}
