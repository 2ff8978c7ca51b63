//! Monitoring configuration with layered loading and hot updates.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//!
//! 1. **Compiled defaults**: Hardcoded in struct `Default` implementations
//! 2. **Config file**: TOML file specified by `PULSE_CONFIG` env var
//! 3. **Environment variables**: `PULSE__*` env vars override specific fields
//!
//! # Configuration Sections
//!
//! - [`RetentionConfig`]: event history retention and eviction cadence
//! - [`ThresholdsConfig`]: health and alerting targets, monitoring window
//! - [`AlertingConfig`]: whether alert passes run automatically on record
//! - [`LoggingConfig`]: log level and format for the embedding service
//!
//! # Hot Updates
//!
//! Threshold and retention values may change at runtime. Components hold a
//! [`ConfigHandle`] and re-read current values on every evaluation instead
//! of caching them at construction; `ConfigHandle::load` is a lock-free
//! atomic pointer read.
//!
//! # Validation
//!
//! Configuration is validated at load time and on every hot update. Invalid
//! configurations (zero windows, out-of-range rates) return errors rather
//! than failing silently.
//!
//! # Example
//!
//! ```toml
//! [retention]
//! retention_seconds = 86400
//! sweep_interval_seconds = 60
//!
//! [thresholds]
//! success_rate_threshold = 0.95
//! accuracy_target = 0.95
//! unhealthy_latency_ms = 5000
//! monitoring_window_seconds = 3600
//! ```

use arc_swap::ArcSwap;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::{path::Path, sync::Arc, time::Duration};

/// Event history retention settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Maximum age of a recorded event before eviction, independent of any
    /// query window. Defaults to `86400` (24 hours).
    #[serde(default = "default_retention_seconds")]
    pub retention_seconds: u64,

    /// Interval between background retention sweeps. Defaults to `60`.
    #[serde(default = "default_sweep_interval_seconds")]
    pub sweep_interval_seconds: u64,

    /// Maximum number of expired events removed per lock acquisition, both
    /// inline on `record` and per sweep batch. Bounds how long any single
    /// producer can be held behind eviction. Defaults to `128`.
    #[serde(default = "default_evict_batch")]
    pub evict_batch: usize,
}

fn default_retention_seconds() -> u64 {
    86_400
}

fn default_sweep_interval_seconds() -> u64 {
    60
}

fn default_evict_batch() -> usize {
    128
}

/// Health and alerting targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    /// Success rate below which alerts fire, overall and per category.
    /// Defaults to `0.95`.
    #[serde(default = "default_success_rate_threshold")]
    pub success_rate_threshold: f64,

    /// Success rate target for the health accuracy check. Observed rates
    /// below 80% of this target are unhealthy rather than degraded.
    /// Defaults to `0.95`.
    #[serde(default = "default_accuracy_target")]
    pub accuracy_target: f64,

    /// Average operation duration above which health degrades, in
    /// milliseconds. Defaults to `5000`.
    #[serde(default = "default_unhealthy_latency_ms")]
    pub unhealthy_latency_ms: u64,

    /// Trailing window over which health and alert evaluations read
    /// statistics. Defaults to `3600` (1 hour).
    #[serde(default = "default_monitoring_window_seconds")]
    pub monitoring_window_seconds: u64,
}

fn default_success_rate_threshold() -> f64 {
    0.95
}

fn default_accuracy_target() -> f64 {
    0.95
}

fn default_unhealthy_latency_ms() -> u64 {
    5_000
}

fn default_monitoring_window_seconds() -> u64 {
    3_600
}

impl ThresholdsConfig {
    /// Returns the unhealthy-latency threshold as a [`Duration`].
    #[must_use]
    pub fn unhealthy_latency(&self) -> Duration {
        Duration::from_millis(self.unhealthy_latency_ms)
    }
}

/// Alert pass behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertingConfig {
    /// When `true`, every recorded event is followed by an alert evaluation
    /// pass. The standalone check remains available either way. Defaults to
    /// `true`.
    #[serde(default = "default_alerting_enabled")]
    pub enabled: bool,
}

fn default_alerting_enabled() -> bool {
    true
}

/// Logging configuration consumed by the embedding service when installing
/// its tracing subscriber.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "trace", "debug", "info", "warn", "error").
    /// Defaults to `"info"`.
    pub level: String,

    /// Output format: `"json"` or `"pretty"`. Defaults to `"pretty"`.
    pub format: String,
}

/// Root monitoring configuration containing all subsystem settings.
///
/// Loaded from TOML files and environment variables with the `PULSE_` prefix
/// for environment overrides, using `__` as a separator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Event history retention settings.
    #[serde(default)]
    pub retention: RetentionConfig,

    /// Health and alerting targets.
    #[serde(default)]
    pub thresholds: ThresholdsConfig,

    /// Alert pass behavior.
    #[serde(default)]
    pub alerting: AlertingConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            retention_seconds: default_retention_seconds(),
            sweep_interval_seconds: default_sweep_interval_seconds(),
            evict_batch: default_evict_batch(),
        }
    }
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            success_rate_threshold: default_success_rate_threshold(),
            accuracy_target: default_accuracy_target(),
            unhealthy_latency_ms: default_unhealthy_latency_ms(),
            monitoring_window_seconds: default_monitoring_window_seconds(),
        }
    }
}

impl Default for AlertingConfig {
    fn default() -> Self {
        Self { enabled: default_alerting_enabled() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            retention: RetentionConfig::default(),
            thresholds: ThresholdsConfig::default(),
            alerting: AlertingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl MonitorConfig {
    /// Loads configuration from a TOML file with environment variable
    /// overrides.
    ///
    /// Environment variables with the `PULSE__` prefix can override any
    /// configuration value. Use `__` as a separator for nested fields
    /// (e.g., `PULSE__THRESHOLDS__ACCURACY_TARGET=0.9`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed, or
    /// deserialized.
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_builder = Config::builder()
            .set_default("retention.retention_seconds", 86_400)?
            .set_default("retention.sweep_interval_seconds", 60)?
            .set_default("retention.evict_batch", 128)?
            .set_default("thresholds.success_rate_threshold", 0.95)?
            .set_default("thresholds.accuracy_target", 0.95)?
            .set_default("thresholds.unhealthy_latency_ms", 5_000)?
            .set_default("thresholds.monitoring_window_seconds", 3_600)?
            .set_default("alerting.enabled", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name(&config_path.as_ref().to_string_lossy()).required(false))
            .add_source(Environment::with_prefix("PULSE").separator("__"))
            .build()?;

        config_builder.try_deserialize()
    }

    /// Loads configuration from `config/config.toml` with fallback to
    /// defaults.
    ///
    /// The config file path can be overridden using the `PULSE_CONFIG`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration cannot be loaded or
    /// parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("PULSE_CONFIG").unwrap_or_else(|_| "config/config.toml".to_string());
        Self::from_file(&config_path)
    }

    /// Returns the retention horizon as a [`Duration`].
    #[must_use]
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention.retention_seconds)
    }

    /// Returns the background sweep interval as a [`Duration`].
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.retention.sweep_interval_seconds)
    }

    /// Returns the monitoring window as a [`Duration`].
    #[must_use]
    pub fn monitoring_window(&self) -> Duration {
        Duration::from_secs(self.thresholds.monitoring_window_seconds)
    }

    /// Validates the configuration for correctness and consistency.
    ///
    /// # Errors
    ///
    /// Returns a descriptive error string if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.retention.retention_seconds == 0 {
            return Err("Retention horizon must be greater than 0".to_string());
        }

        if self.retention.sweep_interval_seconds == 0 {
            return Err("Sweep interval must be greater than 0".to_string());
        }

        if self.retention.evict_batch == 0 {
            return Err("Eviction batch size must be greater than 0".to_string());
        }

        if self.thresholds.monitoring_window_seconds == 0 {
            return Err("Monitoring window must be greater than 0".to_string());
        }

        if self.retention.retention_seconds < self.thresholds.monitoring_window_seconds {
            return Err(format!(
                "Retention horizon ({}s) must cover the monitoring window ({}s)",
                self.retention.retention_seconds, self.thresholds.monitoring_window_seconds
            ));
        }

        if !(0.0..=1.0).contains(&self.thresholds.success_rate_threshold) {
            return Err(format!(
                "Success rate threshold must be within 0.0..=1.0, got {}",
                self.thresholds.success_rate_threshold
            ));
        }

        if !(0.0..=1.0).contains(&self.thresholds.accuracy_target) {
            return Err(format!(
                "Accuracy target must be within 0.0..=1.0, got {}",
                self.thresholds.accuracy_target
            ));
        }

        if self.thresholds.unhealthy_latency_ms == 0 {
            return Err("Unhealthy latency threshold must be greater than 0".to_string());
        }

        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return Err("Logging format must be 'json' or 'pretty'".to_string());
        }

        Ok(())
    }
}

/// Shared, hot-updatable view of the current [`MonitorConfig`].
///
/// The configuration collaborator may replace values at runtime; components
/// re-read through this handle on every evaluation. Reads are lock-free
/// atomic pointer loads, so per-record access is cheap.
#[derive(Clone)]
pub struct ConfigHandle {
    inner: Arc<ArcSwap<MonitorConfig>>,
}

impl ConfigHandle {
    /// Wraps a configuration in a hot-updatable handle.
    #[must_use]
    pub fn new(config: MonitorConfig) -> Self {
        Self { inner: Arc::new(ArcSwap::from_pointee(config)) }
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn load(&self) -> Arc<MonitorConfig> {
        self.inner.load_full()
    }

    /// Replaces the current configuration after validating it.
    ///
    /// # Errors
    ///
    /// Returns a descriptive error string if the new configuration is
    /// invalid; the previous configuration stays in effect.
    pub fn update(&self, config: MonitorConfig) -> Result<(), String> {
        config.validate()?;
        self.inner.store(Arc::new(config));
        Ok(())
    }
}

impl Default for ConfigHandle {
    fn default() -> Self {
        Self::new(MonitorConfig::default())
    }
}
