//! Core type definitions for operation events and windowed statistics.
//!
//! # Type Categories
//!
//! - [`OperationEvent`]: one immutable record per completed operation,
//!   created by the producer at call completion and retained only inside the
//!   event store.
//! - [`WindowStats`] / [`CategoryStats`]: derived, immutable snapshots
//!   computed fresh for a requested window; never cached.
//!
//! # Serialization
//!
//! When these records cross a process boundary, durations are expressed as
//! integer milliseconds (via the [`duration_ms`] serde helper) and timestamps
//! as UTC ISO-8601.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, time::Duration};

/// Serializes a [`Duration`] as integer milliseconds.
pub mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S: Serializer>(
        duration: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    /// # Errors
    ///
    /// Returns an error if the value is not an unsigned integer.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// One completed operation as reported by a producer.
///
/// Events are immutable once recorded. The `category` tag partitions events
/// for per-category statistics (e.g. a tool name or intent type).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationEvent {
    /// Caller-supplied tag partitioning events for per-category statistics.
    pub category: String,
    /// Whether the operation completed successfully.
    pub success: bool,
    /// Elapsed time of the operation.
    #[serde(with = "duration_ms")]
    pub duration: Duration,
    /// Number of retries the operation needed before completing.
    pub retry_count: u32,
    /// Instant of completion.
    pub timestamp: DateTime<Utc>,
}

impl OperationEvent {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn new(
        category: impl Into<String>,
        success: bool,
        duration: Duration,
        retry_count: u32,
    ) -> Self {
        Self { category: category.into(), success, duration, retry_count, timestamp: Utc::now() }
    }

    /// Overrides the completion timestamp.
    ///
    /// Producers that buffer outcomes before reporting use this to preserve
    /// the actual completion instant.
    #[must_use]
    pub fn recorded_at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Per-category aggregate within a [`WindowStats`] snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub total_operations: u64,
    pub successful_operations: u64,
    /// Fraction of successful operations, `0.0..=1.0`. A category present in
    /// the map always has at least one operation, so no empty default
    /// applies here.
    pub success_rate: f64,
    #[serde(with = "duration_ms")]
    pub average_duration: Duration,
    /// Sum of retry counts across the category's operations.
    pub total_retries: u64,
}

/// Statistics over a trailing window, anchored at "now" at query time.
///
/// Invariants: `successful_operations <= total_operations` and
/// `0.0 <= success_rate <= 1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    /// The window the statistics were computed over.
    #[serde(with = "duration_ms")]
    pub window: Duration,
    pub total_operations: u64,
    pub successful_operations: u64,
    /// Fraction of successful operations. `1.0` when the window holds no
    /// events: no traffic is never reported as unhealthy.
    pub success_rate: f64,
    #[serde(with = "duration_ms")]
    pub average_duration: Duration,
    /// Per-category breakdown keyed by the events' `category` tag.
    pub per_category: HashMap<String, CategoryStats>,
}

impl WindowStats {
    /// The defined snapshot for a window with no matching events.
    #[must_use]
    pub fn empty(window: Duration) -> Self {
        Self {
            window,
            total_operations: 0,
            successful_operations: 0,
            success_rate: 1.0,
            average_duration: Duration::ZERO,
            per_category: HashMap::new(),
        }
    }

    /// Fraction of failed operations, computed independently of
    /// `success_rate`. Zero when the window holds no events.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn error_rate(&self) -> f64 {
        if self.total_operations == 0 {
            0.0
        } else {
            (self.total_operations - self.successful_operations) as f64
                / self.total_operations as f64
        }
    }
}
