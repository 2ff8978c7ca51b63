//! Reusable mock types for integration tests.

use parking_lot::Mutex;
use pulse_core::{
    alerts::{AlertDetails, AuditError, AuditSink},
    health::DependencyProbe,
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// One call captured by [`RecordingAuditSink`].
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub event_name: String,
    pub action: String,
    pub result: String,
    pub details: AlertDetails,
}

/// Audit sink capturing every event for later assertions.
#[derive(Default)]
pub struct RecordingAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl RecordingAuditSink {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl AuditSink for RecordingAuditSink {
    fn log_event(
        &self,
        event_name: &str,
        action: &str,
        result: &str,
        details: &AlertDetails,
    ) -> Result<(), AuditError> {
        self.events.lock().push(AuditEvent {
            event_name: event_name.to_string(),
            action: action.to_string(),
            result: result.to_string(),
            details: details.clone(),
        });
        Ok(())
    }
}

/// Audit sink that rejects every event, for dispatch-failure tests.
pub struct FailingAuditSink;

impl AuditSink for FailingAuditSink {
    fn log_event(
        &self,
        _event_name: &str,
        _action: &str,
        _result: &str,
        _details: &AlertDetails,
    ) -> Result<(), AuditError> {
        Err(AuditError::Unavailable("sink offline".to_string()))
    }
}

/// Dependency probe whose answer can be flipped mid-test.
pub struct StaticProbe {
    name: String,
    healthy: AtomicBool,
}

impl StaticProbe {
    #[must_use]
    pub fn new(name: impl Into<String>, healthy: bool) -> Arc<Self> {
        Arc::new(Self { name: name.into(), healthy: AtomicBool::new(healthy) })
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::Release);
    }
}

impl DependencyProbe for StaticProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self) -> bool {
        self.healthy.load(Ordering::Acquire)
    }
}
