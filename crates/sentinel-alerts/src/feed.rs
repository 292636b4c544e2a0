//! Dashboard alert feed
//!
//! Single mutator: new events are prepended, existing events are never
//! touched. Readers get snapshots and recompute groups on demand.

use crate::aggregate::{group_alerts, AlertGroup};
use parking_lot::RwLock;
use sentinel_core::{AlertsConfig, SecurityAlert};
use std::collections::VecDeque;

/// Shared, newest-first list of detection events
#[derive(Debug)]
pub struct AlertFeed {
    /// Newest at the front
    events: RwLock<VecDeque<SecurityAlert>>,
    /// Oldest events beyond this are dropped
    retention: Option<usize>,
    /// Events ever pushed, including dropped ones
    total_received: RwLock<u64>,
}

impl AlertFeed {
    /// Create a feed with an optional retention bound
    #[inline]
    #[must_use]
    pub fn new(retention: Option<usize>) -> Self {
        Self {
            events: RwLock::new(VecDeque::new()),
            retention,
            total_received: RwLock::new(0),
        }
    }

    /// Create a feed that keeps every event
    #[inline]
    #[must_use]
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    /// Create from alert configuration
    #[inline]
    #[must_use]
    pub fn from_config(config: &AlertsConfig) -> Self {
        Self::new(config.retention)
    }

    /// Prepend a freshly produced event
    pub fn push(&self, alert: SecurityAlert) {
        tracing::debug!(
            stream = %alert.stream_id,
            category = %alert.category,
            severity = %alert.severity,
            "alert received"
        );

        let mut events = self.events.write();
        events.push_front(alert);
        if let Some(limit) = self.retention {
            events.truncate(limit);
        }
        drop(events);

        *self.total_received.write() += 1;
    }

    /// Copy of the current events, newest first
    #[must_use]
    pub fn snapshot(&self) -> Vec<SecurityAlert> {
        self.events.read().iter().cloned().collect()
    }

    /// Grouped view of the current events
    #[must_use]
    pub fn groups(&self) -> Vec<AlertGroup<'static>> {
        let snapshot = self.snapshot();
        group_alerts(&snapshot)
            .into_iter()
            .map(AlertGroup::into_owned)
            .collect()
    }

    /// Number of retained events
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Whether no events are retained
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Events ever pushed
    #[inline]
    #[must_use]
    pub fn total_received(&self) -> u64 {
        *self.total_received.read()
    }
}

impl Default for AlertFeed {
    fn default() -> Self {
        Self::from_config(&AlertsConfig::default())
    }
}
