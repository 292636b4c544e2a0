//! Grouping properties
//!
//! Checks the run-length contract of `group_alerts` over generated feeds.

use proptest::prelude::*;
use sentinel_alerts::{group_alerts, AlertFeed};
use sentinel_core::{AlertCategory, SecurityAlert, Severity};
use sentinel_test_utils::{alert_burst, alert_on};

fn category() -> impl Strategy<Value = AlertCategory> {
    prop_oneof![
        Just(AlertCategory::Person),
        Just(AlertCategory::Vehicle),
        Just(AlertCategory::Lpr),
        Just(AlertCategory::FaceMatch),
        Just(AlertCategory::Unauthorized),
    ]
}

fn severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Low),
        Just(Severity::Medium),
        Just(Severity::High),
        Just(Severity::Critical),
    ]
}

// Small domains so adjacent duplicates are common.
fn feed() -> impl Strategy<Value = Vec<SecurityAlert>> {
    prop::collection::vec((category(), severity(), 0u8..3), 0..64).prop_map(|items| {
        items
            .into_iter()
            .map(|(c, s, stream)| alert_on(&stream.to_string(), c, s))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_counts_sum_to_input_length(alerts in feed()) {
        let groups = group_alerts(&alerts);
        let total: usize = groups.iter().map(|g| g.count()).sum();
        prop_assert_eq!(total, alerts.len());
    }

    #[test]
    fn prop_every_group_counts_at_least_one(alerts in feed()) {
        prop_assert!(group_alerts(&alerts).iter().all(|g| g.count() >= 1));
    }

    #[test]
    fn prop_length_shrinks_iff_adjacent_duplicates(alerts in feed()) {
        let groups = group_alerts(&alerts);
        prop_assert!(groups.len() <= alerts.len());

        let has_adjacent = alerts.windows(2).any(|w| w[0].same_detection(&w[1]));
        prop_assert_eq!(groups.len() == alerts.len(), !has_adjacent);
    }

    #[test]
    fn prop_neighbouring_groups_differ(alerts in feed()) {
        let groups = group_alerts(&alerts);
        for pair in groups.windows(2) {
            prop_assert!(!pair[0].alert().same_detection(pair[1].alert()));
        }
    }

    #[test]
    fn prop_representatives_keep_input_order(alerts in feed()) {
        let groups = group_alerts(&alerts);
        let mut offset = 0;
        for group in &groups {
            prop_assert_eq!(group.alert().id, alerts[offset].id);
            offset += group.count();
        }
    }
}

#[test]
fn five_identical_make_one_group() {
    let alerts = alert_burst("1", AlertCategory::Vehicle, Severity::High, 5);
    let groups = group_alerts(&alerts);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].count(), 5);
}

#[test]
fn interleaved_detection_breaks_the_run() {
    let alerts = vec![
        alert_on("1", AlertCategory::Person, Severity::High),
        alert_on("1", AlertCategory::Vehicle, Severity::High),
        alert_on("1", AlertCategory::Person, Severity::High),
    ];

    let counts: Vec<_> = group_alerts(&alerts).iter().map(|g| g.count()).collect();
    assert_eq!(counts, vec![1, 1, 1]);
}

#[test]
fn feed_regroups_on_every_push() {
    let feed = AlertFeed::unbounded();
    for alert in alert_burst("cam", AlertCategory::Lpr, Severity::Low, 3) {
        feed.push(alert);
    }
    feed.push(alert_on("cam", AlertCategory::Lpr, Severity::High));

    let counts: Vec<_> = feed.groups().iter().map(|g| g.count()).collect();
    assert_eq!(counts, vec![1, 3]);
}
