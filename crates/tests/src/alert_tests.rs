//! Alert flow from recorded events to the audit sink.

use crate::mock_infrastructure::{FailingAuditSink, RecordingAuditSink};
use pulse_core::{
    alerts::{AlertKind, ALERT_EVENT_NAME},
    config::MonitorConfig,
    monitor::Monitor,
    types::OperationEvent,
};
use std::{sync::Arc, time::Duration};

fn config(alerting: bool) -> MonitorConfig {
    let mut config = MonitorConfig::default();
    config.alerting.enabled = alerting;
    config.thresholds.success_rate_threshold = 0.9;
    config
}

#[test]
fn all_failing_category_raises_both_alerts() {
    let sink = RecordingAuditSink::new();
    let monitor = Monitor::builder()
        .with_config(config(false))
        .with_audit_sink(Arc::clone(&sink) as Arc<dyn pulse_core::alerts::AuditSink>)
        .build()
        .unwrap();

    for _ in 0..5 {
        monitor.record(OperationEvent::new("m365", false, Duration::from_millis(100), 0));
    }

    let stats = monitor.stats(Duration::from_secs(3_600));
    assert!(stats.per_category["m365"].success_rate.abs() < f64::EPSILON);

    let alerts = monitor.check_alerts();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].kind, AlertKind::SuccessRateLow);
    assert_eq!(alerts[1].kind, AlertKind::CategorySuccessRateLow);
    assert_eq!(alerts[1].details.category.as_deref(), Some("m365"));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.event_name == ALERT_EVENT_NAME));
    assert!(events.iter().all(|e| e.result == "triggered"));
    assert_eq!(events[0].action, "SuccessRateLow");
    assert_eq!(events[1].action, "CategorySuccessRateLow");
    assert_eq!(events[1].details.total_operations, 5);
}

#[test]
fn no_events_yields_zero_alerts() {
    let sink = RecordingAuditSink::new();
    let monitor = Monitor::builder()
        .with_config(config(false))
        .with_audit_sink(Arc::clone(&sink) as Arc<dyn pulse_core::alerts::AuditSink>)
        .build()
        .unwrap();

    assert!(monitor.check_alerts().is_empty());
    assert!(sink.is_empty());
}

#[test]
fn auto_alerting_fires_on_record() {
    let sink = RecordingAuditSink::new();
    let monitor = Monitor::builder()
        .with_config(config(true))
        .with_audit_sink(Arc::clone(&sink) as Arc<dyn pulse_core::alerts::AuditSink>)
        .build()
        .unwrap();

    // The very first failing event breaches the threshold, so the alert
    // pass attached to record() emits immediately.
    monitor.record(OperationEvent::new("m365", false, Duration::from_millis(100), 0));
    assert_eq!(sink.len(), 2);

    // The condition persists, so the next record re-emits both alerts.
    monitor.record(OperationEvent::new("m365", false, Duration::from_millis(100), 0));
    assert_eq!(sink.len(), 4);
}

#[test]
fn healthy_traffic_stays_silent_under_auto_alerting() {
    let sink = RecordingAuditSink::new();
    let monitor = Monitor::builder()
        .with_config(config(true))
        .with_audit_sink(Arc::clone(&sink) as Arc<dyn pulse_core::alerts::AuditSink>)
        .build()
        .unwrap();

    for _ in 0..50 {
        monitor.record(OperationEvent::new("github", true, Duration::from_millis(20), 0));
    }
    assert!(sink.is_empty());
}

#[test]
fn sink_failure_never_reaches_the_producer() {
    let monitor = Monitor::builder()
        .with_config(config(true))
        .with_audit_sink(Arc::new(FailingAuditSink))
        .build()
        .unwrap();

    // Both the record-attached pass and the standalone pass hit the broken
    // sink; neither propagates the failure.
    monitor.record(OperationEvent::new("m365", false, Duration::from_millis(100), 0));
    let alerts = monitor.check_alerts();
    assert_eq!(alerts.len(), 2);
}

#[test]
fn mixed_categories_alert_only_the_offenders() {
    let sink = RecordingAuditSink::new();
    let monitor = Monitor::builder()
        .with_config(config(false))
        .with_audit_sink(Arc::clone(&sink) as Arc<dyn pulse_core::alerts::AuditSink>)
        .build()
        .unwrap();

    for _ in 0..95 {
        monitor.record(OperationEvent::new("github", true, Duration::from_millis(20), 0));
    }
    for _ in 0..5 {
        monitor.record(OperationEvent::new("m365", false, Duration::from_millis(20), 0));
    }

    // Overall rate 95% passes the 0.9 threshold; only the failing category
    // alerts.
    let alerts = monitor.check_alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].kind, AlertKind::CategorySuccessRateLow);
    assert_eq!(alerts[0].details.category.as_deref(), Some("m365"));
    assert!((alerts[0].details.threshold - 0.9).abs() < f64::EPSILON);
}
