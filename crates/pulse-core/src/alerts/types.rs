//! Alert type definitions.

use crate::types::duration_ms;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Kind of threshold breach an alert describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    /// The overall success rate fell below the configured threshold.
    SuccessRateLow,
    /// A single category's success rate fell below the configured threshold.
    CategorySuccessRateLow,
}

impl AlertKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SuccessRateLow => "SuccessRateLow",
            Self::CategorySuccessRateLow => "CategorySuccessRateLow",
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit, statically typed payload attached to an alert.
///
/// Built by the dispatcher from the offending statistics; audit sinks
/// receive this struct rather than an anonymous bag of values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertDetails {
    /// The offending category for [`AlertKind::CategorySuccessRateLow`];
    /// `None` for the overall alert.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// The observed success rate that breached the threshold.
    pub success_rate: f64,
    /// The threshold in effect when the alert fired.
    pub threshold: f64,
    /// The window the statistics were computed over.
    #[serde(with = "duration_ms")]
    pub window: Duration,
    /// Operations contributing to the observed rate.
    pub total_operations: u64,
}

/// A one-shot notification of a threshold breach.
///
/// Not retained by the core; forwarded to the audit sink and returned to
/// the caller of the evaluation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: String,
    pub kind: AlertKind,
    pub details: AlertDetails,
    pub triggered_at: DateTime<Utc>,
}

impl AlertRecord {
    #[must_use]
    pub fn new(kind: AlertKind, details: AlertDetails) -> Self {
        Self { id: Uuid::new_v4().to_string(), kind, details, triggered_at: Utc::now() }
    }
}
