//! Integration tests for the Pulse observability core.
//!
//! This crate contains the cross-component test modules:
//!
//! - `store_tests`: Concurrent ingestion, windowing, and retention eviction
//! - `stats_tests`: Aggregation invariants over realistic event mixes
//! - `health_tests`: End-to-end health scenarios through the monitor facade
//! - `alert_tests`: Alert flow from recorded events to the audit sink
//! - `monitor_tests`: Facade behavior, hot configuration updates, sweeper
//!   lifecycle
//! - `mock_infrastructure`: Reusable mock types (recording/failing audit
//!   sinks, toggleable dependency probes)
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --package tests
//! ```




#[cfg(test)]
mod alert_tests;

#[cfg(test)]
mod monitor_tests;

/// Mock infrastructure for testing
pub mod mock_infrastructure;
