//! Facade behavior, hot configuration updates, and sweeper lifecycle.

use crate::mock_infrastructure::RecordingAuditSink;
use chrono::Utc;
use pulse_core::{
    config::MonitorConfig,
    health::HealthStatus,
    monitor::Monitor,
    types::OperationEvent,
};
use std::{sync::Arc, time::Duration};
use tokio::sync::broadcast;

fn quiet_config() -> MonitorConfig {
    let mut config = MonitorConfig::default();
    config.alerting.enabled = false;
    config
}

#[test]
fn record_is_visible_to_subsequent_reads() {
    let monitor = Monitor::builder().with_config(quiet_config()).build().unwrap();

    monitor.record(OperationEvent::new("github", true, Duration::from_millis(100), 0));
    let stats = monitor.stats(Duration::from_secs(3_600));

    assert_eq!(stats.total_operations, 1);
    assert_eq!(stats.per_category["github"].total_operations, 1);
}

#[test]
fn concurrent_producers_through_the_facade() {
    let monitor = Arc::new(Monitor::builder().with_config(quiet_config()).build().unwrap());
    let producers: usize = 6;
    let per_producer: usize = 150;

    let handles: Vec<_> = (0..producers)
        .map(|p| {
            let monitor = Arc::clone(&monitor);
            std::thread::spawn(move || {
                for i in 0..per_producer {
                    monitor.record(OperationEvent::new(
                        format!("worker-{p}"),
                        i % 9 != 0,
                        Duration::from_millis(10),
                        0,
                    ));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let stats = monitor.stats(Duration::from_secs(3_600));
    assert_eq!(stats.total_operations, (producers * per_producer) as u64);
    assert_eq!(stats.per_category.len(), producers);
}

#[test]
fn alerting_toggle_is_hot() {
    let sink = RecordingAuditSink::new();
    let mut config = MonitorConfig::default();
    config.alerting.enabled = false;
    config.thresholds.success_rate_threshold = 0.9;

    let monitor = Monitor::builder()
        .with_config(config.clone())
        .with_audit_sink(Arc::clone(&sink) as Arc<dyn pulse_core::alerts::AuditSink>)
        .build()
        .unwrap();

    monitor.record(OperationEvent::new("m365", false, Duration::from_millis(10), 0));
    assert!(sink.is_empty());

    config.alerting.enabled = true;
    monitor.config().update(config).unwrap();

    monitor.record(OperationEvent::new("m365", false, Duration::from_millis(10), 0));
    assert!(!sink.is_empty());
}

#[test]
fn monitoring_window_update_changes_the_read() {
    let mut config = quiet_config();
    config.thresholds.monitoring_window_seconds = 600;
    let monitor = Monitor::builder().with_config(config.clone()).build().unwrap();

    // A burst of failures half an hour ago, outside the 10 minute window.
    let half_hour_ago = Utc::now() - chrono::Duration::minutes(30);
    for _ in 0..10 {
        monitor.record(
            OperationEvent::new("github", false, Duration::from_millis(10), 0)
                .recorded_at(half_hour_ago),
        );
    }
    assert_eq!(monitor.evaluate().status, HealthStatus::Healthy);

    // Widening the window pulls the burst back into the evaluation.
    config.thresholds.monitoring_window_seconds = 3_600;
    monitor.config().update(config).unwrap();
    assert_eq!(monitor.evaluate().status, HealthStatus::Unhealthy);
}

#[tokio::test]
async fn sweeper_evicts_on_schedule() {
    let mut config = quiet_config();
    config.retention.retention_seconds = 3_600;
    config.retention.sweep_interval_seconds = 1;
    let monitor = Monitor::builder().with_config(config).build().unwrap();

    monitor
        .store()
        .record(
            OperationEvent::new("expired", true, Duration::from_millis(10), 0)
                .recorded_at(Utc::now() - chrono::Duration::hours(2)),
        );
    assert_eq!(monitor.store().len(), 1);

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let handle = monitor.start_sweeper(shutdown_rx);

    // The first tick fires immediately; give it a moment to run.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(monitor.store().is_empty());

    shutdown_tx.send(()).expect("send should succeed");
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("sweeper should shut down")
        .expect("sweeper task should not panic");
}

#[test]
fn store_snapshot_reflects_facade_records() {
    let monitor = Monitor::builder().with_config(quiet_config()).build().unwrap();
    monitor.record(OperationEvent::new("github", true, Duration::from_millis(5), 1));

    let snapshot = monitor.store().snapshot(Duration::from_secs(60));
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].retry_count, 1);
}
