//! Live monitoring dashboard
//!
//! Holds one [`Tile`] per configured camera plus the shared alert feed.
//! Tiles are reference counted so guard loops can keep using a tile they
//! cloned out of the map while the operator edits or deletes it.

use crate::error::MonitorError;
use crate::tile::Tile;
use dashmap::DashMap;
use sentinel_alerts::{AlertFeed, AlertGroup};
use sentinel_core::{CameraStream, SecurityAlert, SentinelConfig, StreamAvailability, StreamId};
use sentinel_stream::transport::RTSP_PREFIX;
use sentinel_stream::{provision, PlayerBackend};
use std::collections::HashSet;
use std::sync::Arc;

/// Builds the player for a newly mounted tile
pub type BackendFactory<B> = Arc<dyn Fn(&CameraStream) -> B + Send + Sync>;

/// Camera grid and alert feed
pub struct Dashboard<B: PlayerBackend + 'static> {
    tiles: DashMap<StreamId, Arc<Tile<B>>>,
    feed: AlertFeed,
    config: SentinelConfig,
    backends: BackendFactory<B>,
}

impl<B: PlayerBackend + 'static> Dashboard<B> {
    /// Create an empty dashboard
    #[must_use]
    pub fn new<F>(config: SentinelConfig, backends: F) -> Self
    where
        F: Fn(&CameraStream) -> B + Send + Sync + 'static,
    {
        Self {
            tiles: DashMap::new(),
            feed: AlertFeed::from_config(&config.alerts),
            config,
            backends: Arc::new(backends),
        }
    }

    /// Mount every configured camera
    ///
    /// # Errors
    /// - `MonitorError::DuplicateStream` if two cameras share an id; nothing
    ///   is mounted in that case
    /// - Any error from mounting a tile
    pub fn mount_all(&self, streams: Vec<CameraStream>) -> Result<(), MonitorError> {
        let mut seen = HashSet::with_capacity(streams.len());
        for stream in &streams {
            if !seen.insert(&stream.id) || self.tiles.contains_key(&stream.id) {
                return Err(MonitorError::DuplicateStream(stream.id.clone()));
            }
        }

        for stream in streams {
            // Configured cameras keep their declared availability.
            self.mount(stream)?;
        }
        Ok(())
    }

    fn mount(&self, stream: CameraStream) -> Result<Arc<Tile<B>>, MonitorError> {
        let id = stream.id.clone();
        let backend = (self.backends)(&stream);
        let tile = Arc::new(Tile::mount(stream, backend, self.config.stream.clone())?);
        tile.set_auto_guard(self.config.guard.enabled_by_default);
        self.tiles.insert(id, Arc::clone(&tile));
        Ok(tile)
    }

    /// Add a camera or replace an existing one's configuration
    ///
    /// A camera that is not on the dashboard yet is added as online. For an
    /// existing camera a changed URL restarts playback.
    ///
    /// # Errors
    /// Returns error if the tile's controller rejects the URL
    pub fn save_stream(&self, mut stream: CameraStream) -> Result<Arc<Tile<B>>, MonitorError> {
        let existing = self.tiles.get(&stream.id).map(|t| Arc::clone(t.value()));
        match existing {
            Some(tile) => {
                tile.update(stream)?;
                tracing::info!(stream = %tile.id(), "stream updated");
                Ok(tile)
            }
            None => {
                stream.status = StreamAvailability::Online;
                let tile = self.mount(stream)?;
                tracing::info!(stream = %tile.id(), "stream added");
                Ok(tile)
            }
        }
    }

    /// Save a camera from an operator-entered source
    ///
    /// An `rtsp://` source is provisioned through the transcoding backend
    /// with the stream's latency mode; the camera then plays the returned
    /// URL and remembers the RTSP original. Any other source is played as
    /// entered. Either way the camera ends up online.
    ///
    /// # Errors
    /// - `MonitorError::Stream` if provisioning fails; the dashboard is left
    ///   unchanged
    pub async fn configure_stream(
        &self,
        mut stream: CameraStream,
        source_url: &str,
    ) -> Result<Arc<Tile<B>>, MonitorError> {
        let source = source_url.trim();
        if source.starts_with(RTSP_PREFIX) {
            let playback =
                provision(source, stream.latency_mode, self.config.stream.provision_delay()).await?;
            stream.url = playback;
            stream.rtsp_url = Some(source.to_string());
        } else {
            stream.url = source.to_string();
            stream.rtsp_url = None;
        }
        stream.status = StreamAvailability::Online;

        tracing::info!(
            stream = %stream.id,
            source = if stream.rtsp_url.is_some() { "RTSP" } else { "Direct URL" },
            mode = ?stream.latency_mode,
            "stream configured"
        );
        self.save_stream(stream)
    }

    /// Remove a camera and release its player
    ///
    /// # Errors
    /// - `MonitorError::UnknownStream` if no tile has this id
    pub fn delete_stream(&self, id: &StreamId) -> Result<(), MonitorError> {
        let (_, tile) = self
            .tiles
            .remove(id)
            .ok_or_else(|| MonitorError::UnknownStream(id.clone()))?;
        tile.unmount();
        tracing::info!(stream = %id, "stream deleted");
        Ok(())
    }

    /// Record a freshly produced alert
    pub fn handle_new_alert(&self, alert: SecurityAlert) {
        self.feed.push(alert);
    }

    /// Current feed collapsed into runs of identical detections
    #[must_use]
    pub fn grouped_alerts(&self) -> Vec<AlertGroup<'static>> {
        self.feed.groups()
    }

    /// Tile for a camera
    #[must_use]
    pub fn tile(&self, id: &StreamId) -> Option<Arc<Tile<B>>> {
        self.tiles.get(id).map(|t| Arc::clone(t.value()))
    }

    /// All tiles ordered by id
    #[must_use]
    pub fn tiles(&self) -> Vec<Arc<Tile<B>>> {
        let mut tiles: Vec<_> = self.tiles.iter().map(|t| Arc::clone(t.value())).collect();
        tiles.sort_by(|a, b| a.id().cmp(&b.id()));
        tiles
    }

    /// Number of mounted cameras
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no camera is mounted
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Alert feed
    #[inline]
    #[must_use]
    pub fn feed(&self) -> &AlertFeed {
        &self.feed
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SentinelConfig {
        &self.config
    }

    /// Largest count shown on a group badge before it saturates
    #[inline]
    #[must_use]
    pub fn badge_cap(&self) -> u32 {
        self.config.alerts.badge_cap
    }

    /// Unmount every tile
    pub fn shutdown(&self) {
        for tile in self.tiles() {
            tile.unmount();
        }
        self.tiles.clear();
    }
}

impl<B: PlayerBackend + 'static> std::fmt::Debug for Dashboard<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("tiles", &self.tiles.len())
            .field("feed", &self.feed)
            .finish_non_exhaustive()
    }
}

/// Cameras for a demo session
///
/// Covers every transport: direct files, an adaptive manifest, a simulated
/// realtime link, a raw RTSP camera and an offline camera with no URL.
#[must_use]
pub fn demo_streams() -> Vec<CameraStream> {
    vec![
        CameraStream::new("1", "Main Entrance", "https://media.w3.org/2010/05/sintel/trailer.mp4")
            .with_location("Building A"),
        CameraStream::new(
            "2",
            "Perimeter HLS",
            "https://test-streams.mux.dev/x36xhzz/x36xhzz.m3u8",
        )
        .with_location("Exterior"),
        CameraStream::new(
            "3",
            "Server Room Hallway",
            "http://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4",
        )
        .with_location("Building B"),
        CameraStream::new("4", "Loading Dock", "")
            .with_location("Rear")
            .with_status(StreamAvailability::Offline),
        CameraStream::new("5", "Lobby Realtime", "mock-webrtc://stream-01")
            .with_location("Building A"),
        CameraStream::new("6", "Parking Gate", "rtsp://192.168.1.40:554/stream1")
            .with_location("Parking"),
    ]
}
