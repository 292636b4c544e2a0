//! Controller lifecycle
//!
//! Drives a `StreamController` against a recording player with Tokio's
//! paused clock, so timer-driven transitions are deterministic.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sentinel_core::config::DEFAULT_REALTIME_STANDIN_URL;
use sentinel_core::StreamConfig;
use sentinel_stream::{
    allowed_transitions, EngineFault, FaultDetail, FaultKind, FaultOutcome, LifecyclePhase,
    MediaFault, RecoveryAction, StreamController, StreamError, Transport,
};
use sentinel_test_utils::{
    fast_stream_config, PlayerCall, RecordingPlayer, ALT_MP4_URL, HLS_URL, MP4_URL, REALTIME_URL,
    RTSP_URL,
};
use std::time::Duration;

fn controller(player: RecordingPlayer) -> StreamController<RecordingPlayer> {
    StreamController::new(player, fast_stream_config())
}

async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn url_change_while_connecting_discards_the_old_link() {
    let player = RecordingPlayer::new();
    let log = player.log();
    let controller = controller(player);

    controller.set_source(REALTIME_URL).unwrap();
    advance(50).await;
    controller.set_source(ALT_MP4_URL).unwrap();
    advance(500).await;

    let status = controller.status();
    assert_eq!(status.url, ALT_MP4_URL);
    assert_eq!(status.phase, LifecyclePhase::Connected);
    assert!(status.metrics.is_none());
    assert_eq!(log.calls(), vec![PlayerCall::AttachDirect(ALT_MP4_URL.to_string())]);
    assert_eq!(
        log.count(&PlayerCall::AttachDirect(DEFAULT_REALTIME_STANDIN_URL.to_string())),
        0
    );
}

#[tokio::test(start_paused = true)]
async fn metrics_only_while_connected() {
    let player = RecordingPlayer::new();
    let controller = controller(player);

    controller.set_source(REALTIME_URL).unwrap();
    let status = controller.status();
    assert_eq!(status.phase, LifecyclePhase::Connecting);
    assert_eq!(status.indicator(), "Establishing link");
    assert!(status.metrics.is_none());

    advance(90).await;
    assert_eq!(controller.phase(), LifecyclePhase::Connecting);
    assert!(controller.status().metrics.is_none());

    advance(20).await;
    let status = controller.status();
    assert_eq!(status.phase, LifecyclePhase::Connected);
    assert_eq!(status.indicator(), "Live");
    let metrics = status.metrics.unwrap();
    assert!((2000..=4500).contains(&metrics.bitrate_kbps));

    // a native fault on the stand-in asset ends the link
    let outcome = controller
        .report_media_fault(&MediaFault::new(REALTIME_URL, 2))
        .unwrap();
    assert_eq!(outcome, FaultOutcome::Failed);

    advance(5_000).await;
    let status = controller.status();
    assert_eq!(status.phase, LifecyclePhase::Failed);
    assert!(status.metrics.is_none());
    assert_eq!(status.error.unwrap().title, "Network Error");
}

#[tokio::test(start_paused = true)]
async fn late_fault_from_previous_realtime_link_is_stale() {
    let player = RecordingPlayer::new();
    let log = player.log();
    let controller = controller(player);
    let next = "mock-webrtc://stream-02";

    controller.set_source(REALTIME_URL).unwrap();
    advance(110).await;
    assert_eq!(controller.phase(), LifecyclePhase::Connected);
    let late = MediaFault::new(REALTIME_URL, 2);

    controller.set_source(next).unwrap();
    advance(110).await;
    assert_eq!(controller.phase(), LifecyclePhase::Connected);
    // both links played the same stand-in asset
    assert_eq!(
        log.count(&PlayerCall::AttachDirect(DEFAULT_REALTIME_STANDIN_URL.to_string())),
        2
    );

    assert_eq!(controller.report_media_fault(&late).unwrap(), FaultOutcome::Stale);
    assert_eq!(
        controller
            .report_media_fault(&MediaFault::new(DEFAULT_REALTIME_STANDIN_URL, 2))
            .unwrap(),
        FaultOutcome::Stale
    );
    let status = controller.status();
    assert_eq!(status.phase, LifecyclePhase::Connected);
    assert_eq!(status.url, next);
    assert!(status.metrics.is_some());
    assert!(status.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn fault_from_direct_file_is_stale_once_realtime_takes_over() {
    let controller = controller(RecordingPlayer::new());
    controller.set_source(DEFAULT_REALTIME_STANDIN_URL).unwrap();
    let late = MediaFault::new(DEFAULT_REALTIME_STANDIN_URL, 3);

    controller.set_source(REALTIME_URL).unwrap();
    assert_eq!(controller.report_media_fault(&late).unwrap(), FaultOutcome::Stale);

    advance(110).await;
    assert_eq!(controller.report_media_fault(&late).unwrap(), FaultOutcome::Stale);
    assert_eq!(controller.phase(), LifecyclePhase::Connected);
}

#[tokio::test(start_paused = true)]
async fn fault_while_negotiating_is_stale() {
    let controller = controller(RecordingPlayer::new());
    controller.set_source(REALTIME_URL).unwrap();

    let outcome = controller
        .report_media_fault(&MediaFault::new(REALTIME_URL, 2))
        .unwrap();

    assert_eq!(outcome, FaultOutcome::Stale);
    assert_eq!(controller.phase(), LifecyclePhase::Connecting);
}

#[tokio::test(start_paused = true)]
async fn shutdown_while_connecting_cancels_negotiation() {
    let player = RecordingPlayer::new();
    let log = player.log();
    let controller = controller(player);
    let mut rx = controller.subscribe();

    controller.set_source(REALTIME_URL).unwrap();
    advance(50).await;
    controller.shutdown();
    let _ = rx.borrow_and_update();
    advance(500).await;

    let status = controller.status();
    assert_eq!(status.phase, LifecyclePhase::New);
    assert!(status.metrics.is_none());
    assert!(status.url.is_empty());
    assert!(log.calls().is_empty());
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_every_phase() {
    let controller = controller(RecordingPlayer::new());
    let mut rx = controller.subscribe();

    controller.set_source(REALTIME_URL).unwrap();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().phase, LifecyclePhase::Connecting);

    rx.changed().await.unwrap();
    let status = rx.borrow_and_update().clone();
    assert_eq!(status.phase, LifecyclePhase::Connected);
    assert!(status.metrics.is_some());
}

#[test]
fn previous_player_is_released_before_the_next_attaches() {
    let player = RecordingPlayer::new();
    let log = player.log();
    let controller = controller(player);

    controller.set_source(HLS_URL).unwrap();
    controller.set_source(MP4_URL).unwrap();
    controller.shutdown();

    assert_eq!(
        log.calls(),
        vec![
            PlayerCall::AttachAdaptive(HLS_URL.to_string()),
            PlayerCall::Detach,
            PlayerCall::AttachDirect(MP4_URL.to_string()),
            PlayerCall::Detach,
        ]
    );
    assert_eq!(controller.phase(), LifecyclePhase::New);
}

#[test]
fn second_network_fault_is_terminal() {
    let player = RecordingPlayer::new();
    let log = player.log();
    let controller = controller(player);
    controller.set_source(HLS_URL).unwrap();

    let fault = EngineFault::fatal(HLS_URL, FaultKind::Network, FaultDetail::ManifestLoad);
    assert_eq!(
        controller.report_engine_fault(&fault).unwrap(),
        FaultOutcome::Recovered(RecoveryAction::RestartLoad)
    );
    assert_eq!(controller.report_engine_fault(&fault).unwrap(), FaultOutcome::Failed);

    let status = controller.status();
    assert_eq!(status.phase, LifecyclePhase::Failed);
    let error = status.error.unwrap();
    assert_eq!(error.title, "Manifest Load Error");
    assert_eq!(
        error.suggestion.as_deref(),
        Some("Ensure the server is online and supports CORS.")
    );
    assert_eq!(log.count(&PlayerCall::RestartLoad), 1);
    assert_eq!(log.count(&PlayerCall::Detach), 1);

    // the engine is gone; anything it still says is stale
    assert_eq!(controller.report_engine_fault(&fault).unwrap(), FaultOutcome::Stale);
}

#[test]
fn recovery_budget_is_per_kind_and_per_source() {
    let controller = controller(RecordingPlayer::new());
    controller.set_source(HLS_URL).unwrap();

    let network = EngineFault::fatal(HLS_URL, FaultKind::Network, FaultDetail::SegmentLoad);
    let media = EngineFault::fatal(HLS_URL, FaultKind::Media, FaultDetail::from_code("bufferStalledError"));
    assert!(matches!(
        controller.report_engine_fault(&network).unwrap(),
        FaultOutcome::Recovered(_)
    ));
    assert!(matches!(
        controller.report_engine_fault(&media).unwrap(),
        FaultOutcome::Recovered(_)
    ));

    // a new source starts with a fresh budget
    let other = "https://cdn.example.com/cam2/index.m3u8";
    controller.set_source(other).unwrap();
    let network = EngineFault::fatal(other, FaultKind::Network, FaultDetail::SegmentLoad);
    assert_eq!(
        controller.report_engine_fault(&network).unwrap(),
        FaultOutcome::Recovered(RecoveryAction::RestartLoad)
    );
}

#[test]
fn larger_budget_allows_more_recoveries() {
    let controller = StreamController::new(
        RecordingPlayer::new(),
        StreamConfig::default().with_recoveries_per_kind(3),
    );
    controller.set_source(HLS_URL).unwrap();
    let fault = EngineFault::fatal(HLS_URL, FaultKind::Media, FaultDetail::from_code("bufferAppendError"));

    for _ in 0..3 {
        assert_eq!(
            controller.report_engine_fault(&fault).unwrap(),
            FaultOutcome::Recovered(RecoveryAction::RecoverDecode)
        );
    }
    assert_eq!(controller.report_engine_fault(&fault).unwrap(), FaultOutcome::Failed);
}

#[test]
fn non_fatal_engine_faults_change_nothing() {
    let player = RecordingPlayer::new();
    let log = player.log();
    let controller = controller(player);
    controller.set_source(HLS_URL).unwrap();

    let fault = EngineFault::non_fatal(HLS_URL, FaultKind::Network, FaultDetail::SegmentLoad);
    for _ in 0..5 {
        assert_eq!(controller.report_engine_fault(&fault).unwrap(), FaultOutcome::Ignored);
    }
    assert_eq!(controller.phase(), LifecyclePhase::Connected);
    assert_eq!(log.calls(), vec![PlayerCall::AttachAdaptive(HLS_URL.to_string())]);
}

#[test]
fn faults_from_a_replaced_source_are_stale() {
    let controller = controller(RecordingPlayer::new());
    controller.set_source(HLS_URL).unwrap();
    controller.set_source(MP4_URL).unwrap();

    let old = EngineFault::fatal(HLS_URL, FaultKind::Other, FaultDetail::ManifestParse);
    assert_eq!(controller.report_engine_fault(&old).unwrap(), FaultOutcome::Stale);
    assert_eq!(
        controller.report_media_fault(&MediaFault::new(HLS_URL, 4)).unwrap(),
        FaultOutcome::Stale
    );
    assert_eq!(controller.phase(), LifecyclePhase::Connected);
}

#[test]
fn manifest_without_engine_uses_native_fault_channel() {
    let player = RecordingPlayer::new().without_adaptive();
    let log = player.log();
    let controller = controller(player);
    controller.set_source(HLS_URL).unwrap();

    assert_eq!(log.calls(), vec![PlayerCall::AttachDirect(HLS_URL.to_string())]);
    let engine = EngineFault::fatal(HLS_URL, FaultKind::Network, FaultDetail::SegmentLoad);
    assert_eq!(controller.report_engine_fault(&engine).unwrap(), FaultOutcome::Ignored);

    let outcome = controller
        .report_media_fault(&MediaFault::new(HLS_URL, 9).with_message("decoder crashed"))
        .unwrap();
    assert_eq!(outcome, FaultOutcome::Failed);
    let error = controller.status().error.unwrap();
    assert_eq!(error.title, "Playback Error");
    assert_eq!(error.message, "decoder crashed");
}

#[test]
fn rtsp_is_unsupported_and_recovers_on_url_change() {
    let player = RecordingPlayer::new();
    let log = player.log();
    let controller = controller(player);

    controller.set_source(RTSP_URL).unwrap();
    let status = controller.status();
    assert_eq!(status.phase, LifecyclePhase::Unsupported);
    assert_eq!(status.indicator(), "Protocol Unsupported");
    assert!(log.calls().is_empty());

    controller.set_source(MP4_URL).unwrap();
    let status = controller.status();
    assert_eq!(status.phase, LifecyclePhase::Connected);
    assert!(status.error.is_none());
}

#[test]
fn empty_url_stays_idle() {
    let player = RecordingPlayer::new();
    let log = player.log();
    let controller = controller(player);

    controller.set_source(MP4_URL).unwrap();
    controller.set_source("").unwrap();

    let status = controller.status();
    assert_eq!(status.phase, LifecyclePhase::New);
    assert_eq!(status.transport, None);
    assert_eq!(status.indicator(), "No signal");
    assert_eq!(log.count(&PlayerCall::Detach), 1);
}

#[test]
fn realtime_needs_a_runtime() {
    let controller = controller(RecordingPlayer::new());
    assert!(matches!(
        controller.set_source(REALTIME_URL),
        Err(StreamError::NoRuntime(_))
    ));
}

fn any_url() -> impl Strategy<Value = String> {
    prop_oneof![
        "\\PC{0,40}",
        "rtsp://[a-z0-9./:]{0,20}",
        "https://[a-z]{1,10}\\.example/[a-z]{1,8}\\.(mp4|m3u8)",
        "mock-webrtc://[a-z0-9-]{1,10}",
    ]
}

proptest! {
    #[test]
    fn classification_is_total_and_stable(url in any_url()) {
        let first = Transport::classify(&url);
        prop_assert_eq!(first, Transport::classify(&url));
        if url.trim().starts_with("rtsp://") {
            prop_assert_eq!(first, Transport::Unsupported);
        }
    }

    #[test]
    fn every_source_lands_in_a_settled_phase(urls in prop::collection::vec(any_url(), 1..8)) {
        let controller = controller(RecordingPlayer::new());
        for url in &urls {
            let before = controller.phase();
            match controller.set_source(url.clone()) {
                Ok(()) => {
                    let after = controller.phase();
                    prop_assert!(
                        after == before || allowed_transitions(LifecyclePhase::New).contains(&after)
                    );
                    prop_assert_ne!(after, LifecyclePhase::Connecting);
                }
                Err(e) => {
                    prop_assert_eq!(Transport::classify(url), Transport::SimulatedRealtime);
                    prop_assert!(matches!(e, StreamError::NoRuntime(_)));
                    prop_assert_eq!(controller.phase(), before);
                }
            }
        }
    }
}
