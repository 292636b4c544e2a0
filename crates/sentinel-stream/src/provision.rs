//! Simulated transcoding backend
//!
//! Stands in for an ingest service that turns an RTSP camera into a
//! playable URL. The output is chosen deterministically from the source URL
//! so a camera always lands on the same demo asset.

use crate::error::StreamError;
use crate::transport::RTSP_PREFIX;
use sentinel_core::LatencyMode;
use std::time::Duration;

/// Segmented/direct outputs for `LatencyMode::Standard`
pub const STANDARD_OUTPUTS: [&str; 3] = [
    "https://test-streams.mux.dev/x36xhzz/x36xhzz.m3u8",
    "https://media.w3.org/2010/05/sintel/trailer.mp4",
    "http://commondatastorage.googleapis.com/gtv-videos-bucket/sample/TearsOfSteel.mp4",
];

/// Realtime link outputs for `LatencyMode::LowLatency`
pub const REALTIME_OUTPUTS: [&str; 3] = [
    "mock-webrtc://stream-01",
    "mock-webrtc://stream-02",
    "mock-webrtc://stream-03",
];

/// Provision a playback URL for an RTSP source
///
/// Waits `startup` to mimic transcoder start-up, then validates the source.
///
/// # Errors
/// - `StreamError::InvalidProtocol` if the source is not `rtsp://`
pub async fn provision(
    rtsp_url: &str,
    mode: LatencyMode,
    startup: Duration,
) -> Result<String, StreamError> {
    tracing::info!(source = %rtsp_url, ?mode, "provisioning transcoding session");
    tokio::time::sleep(startup).await;

    let output = select_output(rtsp_url, mode)?;
    tracing::info!(source = %rtsp_url, playback = %output, "transcoding session established");
    Ok(output.to_string())
}

/// Output URL for a source, without the start-up delay
///
/// # Errors
/// - `StreamError::InvalidProtocol` if the source is not `rtsp://`
pub fn select_output(rtsp_url: &str, mode: LatencyMode) -> Result<&'static str, StreamError> {
    if !rtsp_url.starts_with(RTSP_PREFIX) {
        return Err(StreamError::InvalidProtocol(rtsp_url.to_string()));
    }

    let index = rtsp_url.chars().count() % 3;
    Ok(match mode {
        LatencyMode::Standard => STANDARD_OUTPUTS[index],
        LatencyMode::LowLatency => REALTIME_OUTPUTS[index],
    })
}
