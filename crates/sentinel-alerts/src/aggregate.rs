//! Run-length grouping of detection events
//!
//! Grouping is adjacency-only: two identical detections separated by a
//! different one stay in separate groups so the sidebar keeps its
//! chronological narrative.

use sentinel_core::SecurityAlert;
use std::borrow::Cow;

/// A run of consecutive identical detections
///
/// The representative is the first (newest) event of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertGroup<'a> {
    alert: Cow<'a, SecurityAlert>,
    count: usize,
}

impl<'a> AlertGroup<'a> {
    fn start(alert: &'a SecurityAlert) -> Self {
        Self {
            alert: Cow::Borrowed(alert),
            count: 1,
        }
    }

    /// Representative event
    #[inline]
    #[must_use]
    pub fn alert(&self) -> &SecurityAlert {
        &self.alert
    }

    /// Number of raw events folded into this group (always >= 1)
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Counter chip text
    ///
    /// `None` for a single event, `"x{n}"` up to `cap`, `"{cap}+"` beyond.
    #[must_use]
    pub fn badge(&self, cap: u32) -> Option<String> {
        match self.count {
            0 | 1 => None,
            n if n > cap as usize => Some(format!("{cap}+")),
            n => Some(format!("x{n}")),
        }
    }

    /// Detach from the borrowed event list
    #[must_use]
    pub fn into_owned(self) -> AlertGroup<'static> {
        AlertGroup {
            alert: Cow::Owned(self.alert.into_owned()),
            count: self.count,
        }
    }
}

/// Collapse adjacent events sharing `(category, severity, stream)`
///
/// Input and output are both newest-first; `output.len() <= alerts.len()`
/// and the counts sum to `alerts.len()`. Empty input yields empty output.
#[must_use]
pub fn group_alerts(alerts: &[SecurityAlert]) -> Vec<AlertGroup<'_>> {
    let mut groups = Vec::new();
    let Some((first, rest)) = alerts.split_first() else {
        return groups;
    };

    let mut current = AlertGroup::start(first);
    for next in rest {
        if next.same_detection(current.alert()) {
            current.count += 1;
        } else {
            groups.push(std::mem::replace(&mut current, AlertGroup::start(next)));
        }
    }
    groups.push(current);
    groups
}
