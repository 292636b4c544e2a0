//! Auto-guard loop
//!
//! One task per tile. Each tick re-reads the tile from the dashboard, so a
//! deleted camera ends its loop and an edited camera is judged on its new
//! configuration. Ticks that arrive while an analysis is still running are
//! skipped rather than queued, and an analysis that outlives its camera
//! raises nothing.

use crate::analyzer::FrameAnalyzer;
use crate::dashboard::Dashboard;
use crate::tile::AnalysisOutcome;
use sentinel_core::StreamId;
use sentinel_stream::PlayerBackend;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Start periodic analysis for one camera
///
/// The loop runs until the camera is removed from the dashboard or the
/// returned handle is aborted. Whether a tick analyses anything is decided
/// by [`Tile::guard_eligible`](crate::tile::Tile::guard_eligible).
pub fn spawn_guard<B: PlayerBackend + 'static>(
    dashboard: Arc<Dashboard<B>>,
    id: StreamId,
    analyzer: Arc<dyn FrameAnalyzer>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // first tick completes immediately; wait a full period instead
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let Some(tile) = dashboard.tile(&id) else {
                tracing::debug!(stream = %id, "guard stopped; stream removed");
                break;
            };
            if !tile.guard_eligible() {
                continue;
            }

            let analyzer = Arc::clone(&analyzer);
            let dashboard = Arc::clone(&dashboard);
            tokio::spawn(async move {
                match tile.analyze(analyzer.as_ref()).await {
                    AnalysisOutcome::Alert(alert) if dashboard.tile(&alert.stream_id).is_none() => {
                        tracing::debug!(
                            stream = %alert.stream_id,
                            "stream removed during analysis; alert dropped"
                        );
                    }
                    AnalysisOutcome::Alert(alert) => {
                        tracing::info!(
                            stream = %alert.stream_id,
                            category = %alert.category,
                            severity = %alert.severity,
                            "auto-guard raised alert"
                        );
                        dashboard.handle_new_alert(alert);
                    }
                    AnalysisOutcome::Busy => {
                        tracing::debug!(stream = %tile.id(), "analysis still running; tick skipped");
                    }
                    AnalysisOutcome::NoFrame | AnalysisOutcome::Clear => {}
                }
            });
        }
    })
}

/// Start guard loops for every mounted camera
#[must_use]
pub fn spawn_all<B: PlayerBackend + 'static>(
    dashboard: &Arc<Dashboard<B>>,
    analyzer: &Arc<dyn FrameAnalyzer>,
    interval: Duration,
) -> Vec<JoinHandle<()>> {
    dashboard
        .tiles()
        .into_iter()
        .map(|tile| {
            spawn_guard(
                Arc::clone(dashboard),
                tile.id(),
                Arc::clone(analyzer),
                interval,
            )
        })
        .collect()
}
