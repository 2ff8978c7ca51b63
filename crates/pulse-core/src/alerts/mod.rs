//! Threshold-driven alerting.
//!
//! The dispatcher inspects a statistics snapshot against the configured
//! success-rate threshold and emits one [`AlertRecord`] per breach: one for
//! the overall rate and one per offending category. Records are forwarded
//! fire-and-forget to an [`AuditSink`]; a sink failure is logged and
//! swallowed so alerting can never break the producer's request path.
//!
//! There is no deduplication or suppression state: a persisting condition
//! re-emits its alert on every evaluation pass.

pub mod dispatcher;
pub mod types;

pub use dispatcher::{AlertDispatcher, AuditError, AuditSink, TracingAuditSink, ALERT_EVENT_NAME};
pub use types::{AlertDetails, AlertKind, AlertRecord};
