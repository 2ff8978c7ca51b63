//! Concurrency-safe, time-bounded log of operation outcomes.
//!
//! The store accepts appends from any number of concurrent producers and
//! answers windowed snapshot queries for readers. Events older than the
//! configured retention horizon are evicted from the oldest end: a bounded
//! incremental pass runs inline on every [`EventStore::record`] call, and
//! the background sweeper (see [`crate::monitor`]) drains the remainder in
//! batches so eviction lag never exceeds the horizon by more than one sweep
//! interval.
//!
//! # Locking
//!
//! The event sequence is the only mutable shared state in the core. It is a
//! `parking_lot::RwLock<VecDeque<_>>`: producers append at the back under a
//! short write lock (append plus at most `evict_batch` removals), readers
//! clone matching events under a read lock. The history is append-ordered;
//! producers stamp completion time at enqueue, so the expired prefix always
//! sits at the front.

use crate::{config::ConfigHandle, types::OperationEvent};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::{collections::VecDeque, time::Duration};

/// Shared event log with retention-horizon eviction.
pub struct EventStore {
    config: ConfigHandle,
    events: RwLock<VecDeque<OperationEvent>>,
}

/// Computes `now - window`, saturating at the representable minimum.
fn cutoff(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    let millis = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);
    now.checked_sub_signed(chrono::Duration::milliseconds(millis))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl EventStore {
    /// Creates an empty store reading retention settings through `config`.
    #[must_use]
    pub fn new(config: ConfigHandle) -> Self {
        Self { config, events: RwLock::new(VecDeque::new()) }
    }

    /// Appends one completed operation.
    ///
    /// Also evicts up to `evict_batch` expired events from the front, so the
    /// write lock is held for a bounded number of entries regardless of how
    /// much history has expired. Never loses or duplicates an event under
    /// concurrent calls.
    pub fn record(&self, event: OperationEvent) {
        let config = self.config.load();
        let expired_before = cutoff(Utc::now(), config.retention());
        let batch = config.retention.evict_batch;

        let mut events = self.events.write();
        Self::evict_front(&mut events, expired_before, batch);
        events.push_back(event);
    }

    /// Returns owned copies of all retained events with
    /// `timestamp >= now - window`.
    ///
    /// The snapshot is consistent for the caller; it may trail concurrent
    /// appends and pending evictions, which is acceptable for statistics
    /// that are always "as of approximately now".
    #[must_use]
    pub fn snapshot(&self, window: Duration) -> Vec<OperationEvent> {
        let included_from = cutoff(Utc::now(), window);
        self.events.read().iter().filter(|e| e.timestamp >= included_from).cloned().collect()
    }

    /// Evicts every event older than the retention horizon.
    ///
    /// Works in `evict_batch`-sized chunks, releasing the write lock between
    /// chunks so producers are never stalled behind a long expired prefix.
    /// Returns the number of events evicted.
    pub fn sweep(&self) -> usize {
        let config = self.config.load();
        let expired_before = cutoff(Utc::now(), config.retention());
        let batch = config.retention.evict_batch;

        let mut total = 0;
        loop {
            let evicted = {
                let mut events = self.events.write();
                Self::evict_front(&mut events, expired_before, batch)
            };
            total += evicted;
            if evicted < batch {
                break;
            }
        }
        total
    }

    /// Number of retained events, including any not yet evicted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    fn evict_front(
        events: &mut VecDeque<OperationEvent>,
        expired_before: DateTime<Utc>,
        batch: usize,
    ) -> usize {
        let mut evicted = 0;
        while evicted < batch {
            match events.front() {
                Some(oldest) if oldest.timestamp < expired_before => {
                    events.pop_front();
                    evicted += 1;
                }
                _ => break,
            }
        }
        evicted
    }
}
