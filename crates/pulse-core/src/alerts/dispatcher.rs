//! Alert evaluation and fire-and-forget dispatch.

use super::types::{AlertDetails, AlertKind, AlertRecord};
use crate::types::WindowStats;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Audit event name under which every alert is recorded.
pub const ALERT_EVENT_NAME: &str = "operations_alert";

/// Audit result tag for a freshly triggered alert.
const ALERT_RESULT: &str = "triggered";

/// Failure to deliver an audit event to the external sink.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit sink unavailable: {0}")]
    Unavailable(String),
    #[error("audit sink rejected event: {0}")]
    Rejected(String),
}

/// External audit log receiving alert records.
///
/// Implementations must be cheap and non-blocking from the dispatcher's
/// perspective; anything slow belongs behind a channel inside the sink.
/// Errors returned here are logged and discarded by the dispatcher.
pub trait AuditSink: Send + Sync {
    /// Records one audit event.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError`] if the event could not be delivered.
    fn log_event(
        &self,
        event_name: &str,
        action: &str,
        result: &str,
        details: &AlertDetails,
    ) -> Result<(), AuditError>;
}

/// Default sink recording alerts to the structured log.
#[derive(Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn log_event(
        &self,
        event_name: &str,
        action: &str,
        result: &str,
        details: &AlertDetails,
    ) -> Result<(), AuditError> {
        warn!(
            event = %event_name,
            action = %action,
            result = %result,
            category = details.category.as_deref().unwrap_or("all"),
            success_rate = details.success_rate,
            threshold = details.threshold,
            total_operations = details.total_operations,
            "audit event"
        );
        Ok(())
    }
}

/// Checks statistics against the success-rate threshold and emits alerts.
pub struct AlertDispatcher {
    sink: Arc<dyn AuditSink>,
}

impl AlertDispatcher {
    #[must_use]
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Produces and dispatches zero or more alerts for `stats`.
    ///
    /// One [`AlertKind::SuccessRateLow`] alert when the overall rate is
    /// below `threshold`, plus one [`AlertKind::CategorySuccessRateLow`]
    /// alert per offending category (in category order, so dispatch order
    /// is deterministic). A window with no operations never alerts.
    ///
    /// Every produced record is forwarded to the audit sink; delivery
    /// failures are logged and do not propagate. The emitted records are
    /// returned to the caller.
    pub fn check(&self, stats: &WindowStats, threshold: f64) -> Vec<AlertRecord> {
        if stats.total_operations == 0 {
            return Vec::new();
        }

        let mut alerts = Vec::new();

        if stats.success_rate < threshold {
            alerts.push(AlertRecord::new(
                AlertKind::SuccessRateLow,
                AlertDetails {
                    category: None,
                    success_rate: stats.success_rate,
                    threshold,
                    window: stats.window,
                    total_operations: stats.total_operations,
                },
            ));
        }

        let mut categories: Vec<_> = stats.per_category.iter().collect();
        categories.sort_by(|a, b| a.0.cmp(b.0));
        for (category, category_stats) in categories {
            if category_stats.success_rate < threshold {
                alerts.push(AlertRecord::new(
                    AlertKind::CategorySuccessRateLow,
                    AlertDetails {
                        category: Some(category.clone()),
                        success_rate: category_stats.success_rate,
                        threshold,
                        window: stats.window,
                        total_operations: category_stats.total_operations,
                    },
                ));
            }
        }

        for alert in &alerts {
            self.dispatch(alert);
        }
        alerts
    }

    fn dispatch(&self, alert: &AlertRecord) {
        warn!(
            alert_id = %alert.id,
            kind = %alert.kind,
            category = alert.details.category.as_deref().unwrap_or("all"),
            success_rate = alert.details.success_rate,
            threshold = alert.details.threshold,
            "alert triggered"
        );

        // Alerting must never break the producer's request path.
        if let Err(e) = self.sink.log_event(
            ALERT_EVENT_NAME,
            alert.kind.as_str(),
            ALERT_RESULT,
            &alert.details,
        ) {
            warn!(alert_id = %alert.id, error = %e, "failed to deliver alert to audit sink");
        }
    }
}
