//! Monitor facade: the external interface of the observability core.
//!
//! A [`Monitor`] ties the event store, aggregator, health evaluation, and
//! alert dispatcher together behind the operations the surrounding service
//! calls: `record`, `stats`, `evaluate`, `is_healthy`, and `check_alerts`.
//! Construction goes through [`MonitorBuilder`], which wires the config
//! handle, dependency probes, and audit sink with working defaults.
//!
//! Threshold, window, and retention values are re-read from the
//! [`ConfigHandle`] on every call, so hot updates from the configuration
//! collaborator take effect immediately.
//!
//! # Example
//!
//! ```
//! use pulse_core::{health, monitor::Monitor, types::OperationEvent};
//! use std::time::Duration;
//!
//! let monitor = Monitor::builder()
//!     .with_probe(health::probe("storage", || true))
//!     .build()
//!     .expect("default configuration is valid");
//!
//! monitor.record(OperationEvent::new("github", true, Duration::from_millis(120), 0));
//!
//! let stats = monitor.stats(Duration::from_secs(3600));
//! assert_eq!(stats.total_operations, 1);
//! assert!(monitor.is_healthy());
//! ```

use crate::{
    alerts::{AlertDispatcher, AlertRecord, AuditSink, TracingAuditSink},
    config::{ConfigHandle, MonitorConfig},
    health::{self, DependencyProbe, HealthReport, ProbeSet},
    stats::Aggregator,
    store::EventStore,
    types::{OperationEvent, WindowStats},
};
use std::{sync::Arc, time::Duration};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// In-process observability core for a long-running service.
pub struct Monitor {
    config: ConfigHandle,
    store: Arc<EventStore>,
    aggregator: Aggregator,
    probes: ProbeSet,
    dispatcher: AlertDispatcher,
}

impl Monitor {
    /// Starts building a monitor.
    #[must_use]
    pub fn builder() -> MonitorBuilder {
        MonitorBuilder::new()
    }

    /// Returns the hot-updatable configuration handle.
    ///
    /// The configuration collaborator pushes updated thresholds and
    /// retention settings through this handle.
    #[must_use]
    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    /// Returns the shared event store.
    #[must_use]
    pub fn store(&self) -> &Arc<EventStore> {
        &self.store
    }

    /// Records one completed operation.
    ///
    /// When alerting is enabled in the current configuration, an alert
    /// evaluation pass follows the append; its outcome never affects the
    /// caller.
    pub fn record(&self, event: OperationEvent) {
        debug!(
            category = %event.category,
            success = event.success,
            duration_ms = u64::try_from(event.duration.as_millis()).unwrap_or(u64::MAX),
            retry_count = event.retry_count,
            "recorded operation"
        );
        self.store.record(event);

        if self.config.load().alerting.enabled {
            self.check_alerts();
        }
    }

    /// Computes statistics over a trailing window, fresh on every call.
    #[must_use]
    pub fn stats(&self, window: Duration) -> WindowStats {
        self.aggregator.stats(window)
    }

    /// Evaluates health over the configured monitoring window.
    ///
    /// Combines windowed statistics, the registered dependency probes, and
    /// the current thresholds.
    #[must_use]
    pub fn evaluate(&self) -> HealthReport {
        let config = self.config.load();
        let stats = self.aggregator.stats(config.monitoring_window());
        let dependency_health = self.probes.check_all();
        health::evaluate(&stats, &dependency_health, &config.thresholds)
    }

    /// Convenience wrapper: `true` unless [`Monitor::evaluate`] yields an
    /// unhealthy verdict.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        let report = self.evaluate();
        if report.is_unhealthy() {
            warn!(issues = ?report.issues, "health check failed");
        }
        !report.is_unhealthy()
    }

    /// Runs an alert evaluation pass over the configured monitoring window.
    ///
    /// Side-effecting: emits through the audit sink. Returns the produced
    /// records. Callable on demand or from a periodic external timer; also
    /// invoked after every [`Monitor::record`] while alerting is enabled.
    pub fn check_alerts(&self) -> Vec<AlertRecord> {
        let config = self.config.load();
        let stats = self.aggregator.stats(config.monitoring_window());
        self.dispatcher.check(&stats, config.thresholds.success_rate_threshold)
    }

    /// Starts the background retention sweep task.
    ///
    /// The task evicts expired events on the configured sweep interval and
    /// exits when `shutdown_rx` receives. The interval is sampled when the
    /// task starts; retention itself is re-read on every sweep.
    #[must_use]
    pub fn start_sweeper(
        &self,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let interval = self.config.load().sweep_interval();

        tokio::spawn(async move {
            info!(interval_seconds = interval.as_secs(), "starting retention sweeper");

            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let evicted = store.sweep();
                        if evicted > 0 {
                            debug!(evicted, "retention sweep evicted events");
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        info!("retention sweeper shutting down");
                        break;
                    }
                }
            }
        })
    }
}

/// Builder wiring a [`Monitor`]'s collaborators.
///
/// Defaults: compiled-default configuration, no dependency probes, and the
/// [`TracingAuditSink`].
pub struct MonitorBuilder {
    config: Option<ConfigHandle>,
    probes: ProbeSet,
    sink: Option<Arc<dyn AuditSink>>,
}

impl MonitorBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self { config: None, probes: ProbeSet::new(), sink: None }
    }

    /// Uses `config` as the initial configuration, wrapped in a fresh
    /// hot-update handle.
    #[must_use]
    pub fn with_config(mut self, config: MonitorConfig) -> Self {
        self.config = Some(ConfigHandle::new(config));
        self
    }

    /// Shares an existing configuration handle, letting several components
    /// observe the same hot updates.
    #[must_use]
    pub fn with_config_handle(mut self, handle: ConfigHandle) -> Self {
        self.config = Some(handle);
        self
    }

    /// Registers a dependency probe consulted on every health evaluation.
    #[must_use]
    pub fn with_probe(mut self, probe: Arc<dyn DependencyProbe>) -> Self {
        self.probes.register(probe);
        self
    }

    /// Replaces the default audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Builds the monitor.
    ///
    /// # Errors
    ///
    /// Returns a descriptive error string if the initial configuration
    /// fails validation.
    pub fn build(self) -> Result<Monitor, String> {
        let config = self.config.unwrap_or_default();
        config.load().validate()?;

        let store = Arc::new(EventStore::new(config.clone()));
        let aggregator = Aggregator::new(Arc::clone(&store));
        let sink = self.sink.unwrap_or_else(|| Arc::new(TracingAuditSink));
        let dispatcher = AlertDispatcher::new(sink);

        Ok(Monitor { config, store, aggregator, probes: self.probes, dispatcher })
    }
}

impl Default for MonitorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
