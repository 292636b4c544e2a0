//! Player backend seam
//!
//! The controller drives whatever media runtime hosts the tile through this
//! trait. Faults flow the other way, through
//! [`StreamController::report_engine_fault`](crate::StreamController::report_engine_fault)
//! and [`StreamController::report_media_fault`](crate::StreamController::report_media_fault).
//!
//! Implementations must not call back into the controller from these
//! methods; the controller holds its state lock while invoking them.

/// Media runtime owned by one tile
#[cfg_attr(test, mockall::automock)]
pub trait PlayerBackend: Send {
    /// Whether a segmented-stream engine is available
    fn supports_adaptive(&self) -> bool;

    /// Create an adaptive engine, load the manifest and attach it to the surface
    fn attach_adaptive(&mut self, url: &str);

    /// Point the native surface at a URL
    fn attach_direct(&mut self, url: &str);

    /// Ask the adaptive engine to restart loading after a network fault
    fn restart_load(&mut self);

    /// Ask the adaptive engine to reset decoding after a media fault
    fn recover_decode(&mut self);

    /// Destroy any engine and clear the surface
    fn detach(&mut self);
}

impl<B: PlayerBackend + ?Sized> PlayerBackend for Box<B> {
    fn supports_adaptive(&self) -> bool {
        (**self).supports_adaptive()
    }

    fn attach_adaptive(&mut self, url: &str) {
        (**self).attach_adaptive(url);
    }

    fn attach_direct(&mut self, url: &str) {
        (**self).attach_direct(url);
    }

    fn restart_load(&mut self) {
        (**self).restart_load();
    }

    fn recover_decode(&mut self) {
        (**self).recover_decode();
    }

    fn detach(&mut self) {
        (**self).detach();
    }
}
