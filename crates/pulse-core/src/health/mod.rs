//! Multi-signal health evaluation.
//!
//! [`evaluate`] combines a [`WindowStats`] snapshot, dependency probe
//! results, and the configured targets into a [`HealthReport`]. Rules run in
//! a fixed order and each can only escalate the verdict, never downgrade
//! it; a failed dependency forces [`HealthStatus::Unhealthy`] regardless of
//! every other signal.
//!
//! Dependency health comes from named boolean probes registered in a
//! [`ProbeSet`]. A dependency with no registered probe is healthy by
//! convention.

use crate::{config::ThresholdsConfig, types::WindowStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tracing::warn;

/// Observed success rates below this fraction of the accuracy target are
/// unhealthy rather than degraded.
const UNHEALTHY_ACCURACY_FACTOR: f64 = 0.8;

/// Error-rate band edges for the independent error-rate check.
const DEGRADED_ERROR_RATE: f64 = 0.05;
const UNHEALTHY_ERROR_RATE: f64 = 0.10;

/// Tri-state health verdict, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// Escalates to `at_least` if that is more severe; never downgrades.
    #[must_use]
    pub fn escalate_to(self, at_least: HealthStatus) -> HealthStatus {
        self.max(at_least)
    }
}

/// Health verdict with paired human-readable issues and recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl HealthReport {
    /// A clean report with no issues.
    #[must_use]
    pub fn healthy() -> Self {
        Self {
            status: HealthStatus::Healthy,
            issues: Vec::new(),
            recommendations: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    /// The report shape for an evaluation that could not complete: not
    /// being able to determine health counts as unhealthy, never as a
    /// panic into the caller.
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            issues: vec![format!("Health check failed: {}", reason.into())],
            recommendations: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn is_unhealthy(&self) -> bool {
        self.status == HealthStatus::Unhealthy
    }
}

/// Named boolean health check for one external dependency.
///
/// Probes are synchronous and must be cheap: they run inline on every
/// health evaluation. A probe that cannot determine its dependency's state
/// should return `false`.
pub trait DependencyProbe: Send + Sync {
    fn name(&self) -> &str;
    fn check(&self) -> bool;
}

struct FnProbe<F> {
    name: String,
    check: F,
}

impl<F: Fn() -> bool + Send + Sync> DependencyProbe for FnProbe<F> {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self) -> bool {
        (self.check)()
    }
}

/// Builds a probe from a closure.
pub fn probe(
    name: impl Into<String>,
    check: impl Fn() -> bool + Send + Sync + 'static,
) -> Arc<dyn DependencyProbe> {
    Arc::new(FnProbe { name: name.into(), check })
}

/// Registry of declared dependency probes.
#[derive(Clone, Default)]
pub struct ProbeSet {
    probes: Vec<Arc<dyn DependencyProbe>>,
}

impl ProbeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, probe: Arc<dyn DependencyProbe>) {
        self.probes.push(probe);
    }

    /// Checks a single dependency by name.
    ///
    /// A name with no registered probe is healthy by convention.
    #[must_use]
    pub fn check(&self, name: &str) -> bool {
        self.probes.iter().find(|p| p.name() == name).map_or(true, |p| p.check())
    }

    /// Runs every registered probe, returning the name → healthy map
    /// consumed by [`evaluate`].
    #[must_use]
    pub fn check_all(&self) -> HashMap<String, bool> {
        self.probes
            .iter()
            .map(|p| {
                let healthy = p.check();
                if !healthy {
                    warn!(dependency = %p.name(), "dependency probe failed");
                }
                (p.name().to_string(), healthy)
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

/// Derives a health verdict from windowed statistics, dependency health,
/// and the configured targets.
///
/// Rules, applied in fixed order, each only escalating the status:
///
/// 1. No operations in the window short-circuits to healthy: there is no
///    signal to evaluate.
/// 2. Success rate below the accuracy target degrades; below 80% of the
///    target it is unhealthy.
/// 3. Average duration above the latency threshold degrades.
/// 4. Error rate (computed independently) above 5% degrades; above 10% it
///    is unhealthy.
/// 5. Any failed dependency forces unhealthy unconditionally.
#[must_use]
pub fn evaluate(
    stats: &WindowStats,
    dependency_health: &HashMap<String, bool>,
    thresholds: &ThresholdsConfig,
) -> HealthReport {
    if stats.total_operations == 0 {
        return HealthReport::healthy();
    }

    let mut status = HealthStatus::Healthy;
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    if stats.success_rate < thresholds.accuracy_target {
        issues.push(format!(
            "Success rate ({:.1}%) is below target ({:.1}%)",
            stats.success_rate * 100.0,
            thresholds.accuracy_target * 100.0
        ));
        recommendations
            .push("Review recent operation failures and retry configuration".to_string());

        if stats.success_rate < thresholds.accuracy_target * UNHEALTHY_ACCURACY_FACTOR {
            status = status.escalate_to(HealthStatus::Unhealthy);
        } else {
            status = status.escalate_to(HealthStatus::Degraded);
        }
    }

    if stats.average_duration > thresholds.unhealthy_latency() {
        issues.push(format!(
            "Average duration ({}ms) exceeds threshold ({}ms)",
            stats.average_duration.as_millis(),
            thresholds.unhealthy_latency_ms
        ));
        recommendations
            .push("Profile slow operations and consider scaling resources".to_string());
        status = status.escalate_to(HealthStatus::Degraded);
    }

    let error_rate = stats.error_rate();
    if error_rate > DEGRADED_ERROR_RATE {
        issues.push(format!("Error rate ({:.1}%) is high", error_rate * 100.0));
        recommendations.push("Review recent errors and implement fixes".to_string());

        if error_rate > UNHEALTHY_ERROR_RATE {
            status = status.escalate_to(HealthStatus::Unhealthy);
        } else {
            status = status.escalate_to(HealthStatus::Degraded);
        }
    }

    let mut failed: Vec<&str> = dependency_health
        .iter()
        .filter(|(_, healthy)| !**healthy)
        .map(|(name, _)| name.as_str())
        .collect();
    failed.sort_unstable();
    if !failed.is_empty() {
        issues.push(format!("Unhealthy dependencies: {}", failed.join(", ")));
        recommendations.push("Check dependency configuration and connectivity".to_string());
        // Dependency failure dominates every other signal.
        status = HealthStatus::Unhealthy;
    }

    HealthReport { status, issues, recommendations, generated_at: Utc::now() }
}
