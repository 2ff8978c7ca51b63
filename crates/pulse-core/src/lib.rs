//! # Pulse Core
//!
//! In-process observability core for long-running services.
//!
//! Pulse ingests discrete operation-completion events, keeps a bounded,
//! time-windowed history of them, computes aggregate and per-category
//! statistics on demand, derives a tri-state health verdict from multiple
//! independent signals, and raises alerts when thresholds are breached.
//!
//! This crate provides the foundational components for:
//!
//! - **[`store`]**: Concurrency-safe, time-bounded log of operation outcomes
//!   with incremental eviction past the retention horizon.
//!
//! - **[`stats`]**: Windowed statistics computed fresh on every query:
//!   success rate, average duration, and per-category breakdowns.
//!
//! - **[`health`]**: Multi-signal health evaluation combining windowed
//!   statistics, dependency probes, and configured targets into a
//!   `Healthy`/`Degraded`/`Unhealthy` verdict with issues and
//!   recommendations.
//!
//! - **[`alerts`]**: Threshold-driven alert dispatch through a pluggable
//!   audit sink; dispatch failures never reach the caller.
//!
//! - **[`config`]**: Layered configuration (defaults, TOML file, environment
//!   overrides) with a lock-free hot-update handle.
//!
//! - **[`monitor`]**: The facade tying the pieces together, plus the
//!   background retention sweeper.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                          Monitor                           │
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────────────┐    │
//! │  │ EventStore  │◄─┤ Aggregator  │◄─┤ HealthEvaluation │    │
//! │  └──────▲──────┘  └──────▲──────┘  └────────▲─────────┘    │
//! │         │                │                  │              │
//! │     record()         stats(w)        ProbeSet / targets    │
//! │         │                │                                 │
//! │         │         ┌──────┴──────────┐                      │
//! │         │         │ AlertDispatcher │──► AuditSink         │
//! │         │         └─────────────────┘                      │
//! └─────────┼──────────────────────────────────────────────────┘
//!           │
//!    producers (request pipeline, CLI execution, ...)
//! ```
//!
//! ## Event Flow
//!
//! ```text
//! Producer completes an operation
//!       │
//!       ▼
//! Monitor::record(event) ──► EventStore (append + bounded eviction)
//!       │
//!       ▼ (when alerting is enabled)
//! AlertDispatcher::check ──► AuditSink::log_event (failures swallowed)
//!
//! Health endpoint calls Monitor::evaluate()
//!       │
//!       ▼
//! Aggregator::stats(window) + ProbeSet::check_all()
//!       │
//!       ▼
//! HealthReport { status, issues, recommendations }
//! ```
//!
//! No operation in this crate blocks on network or disk I/O; everything is
//! in-memory and bounded-time, safe under concurrent producers and readers.

pub mod alerts;
pub mod config;
pub mod health;
pub mod monitor;
pub mod stats;
pub mod store;
pub mod types;
