//! Windowed statistics over the event store.
//!
//! [`Aggregator::stats`] is a pure, single-pass reduction over a store
//! snapshot: no caching, no side effects, no error conditions. Empty-window
//! arithmetic resolves to the defined optimistic defaults rather than
//! signaling failure.

use crate::{
    store::EventStore,
    types::{CategoryStats, WindowStats},
};
use std::{collections::HashMap, sync::Arc, time::Duration};

/// Computes [`WindowStats`] from the shared event store on demand.
#[derive(Clone)]
pub struct Aggregator {
    store: Arc<EventStore>,
}

#[derive(Default)]
struct CategoryAccumulator {
    total: u64,
    successful: u64,
    duration_sum: Duration,
    retries: u64,
}

impl CategoryAccumulator {
    fn finish(self) -> CategoryStats {
        CategoryStats {
            total_operations: self.total,
            successful_operations: self.successful,
            success_rate: ratio(self.successful, self.total),
            average_duration: average(self.duration_sum, self.total),
            total_retries: self.retries,
        }
    }
}

/// `successful / total`; `1.0` for an empty set ("no traffic is healthy").
#[allow(clippy::cast_precision_loss)]
fn ratio(successful: u64, total: u64) -> f64 {
    if total == 0 {
        1.0
    } else {
        successful as f64 / total as f64
    }
}

fn average(duration_sum: Duration, count: u64) -> Duration {
    if count == 0 {
        return Duration::ZERO;
    }
    let nanos = duration_sum.as_nanos() / u128::from(count);
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

impl Aggregator {
    #[must_use]
    pub fn new(store: Arc<EventStore>) -> Self {
        Self { store }
    }

    /// Reduces the events within `window` to a fresh statistics snapshot.
    ///
    /// Zero matching events yield `success_rate = 1.0`, a zero average
    /// duration, and an empty per-category map. A category present in the
    /// map with zero successes has `success_rate = 0.0`, not a default.
    #[must_use]
    pub fn stats(&self, window: Duration) -> WindowStats {
        let events = self.store.snapshot(window);
        if events.is_empty() {
            return WindowStats::empty(window);
        }

        let mut total = 0u64;
        let mut successful = 0u64;
        let mut duration_sum = Duration::ZERO;
        let mut categories: HashMap<String, CategoryAccumulator> = HashMap::new();

        for event in &events {
            total += 1;
            if event.success {
                successful += 1;
            }
            duration_sum += event.duration;

            let acc = categories.entry(event.category.clone()).or_default();
            acc.total += 1;
            if event.success {
                acc.successful += 1;
            }
            acc.duration_sum += event.duration;
            acc.retries += u64::from(event.retry_count);
        }

        WindowStats {
            window,
            total_operations: total,
            successful_operations: successful,
            success_rate: ratio(successful, total),
            average_duration: average(duration_sum, total),
            per_category: categories.into_iter().map(|(name, acc)| (name, acc.finish())).collect(),
        }
    }
}
