//! Configuration of the process-wide error reporting policy.
//!
//! All types implement [`serde::Deserialize`] so the policy can be loaded
//! from any external source, typically a TOML file owned by the host
//! application.
//!
//! # Overview
//!
//! - [`ReportConfig`] - Top-level configuration combining logging and trace settings.
//! - [`LoggingConfig`] - Whether and at which [`ErrorLevel`] new errors are logged.
//! - [`TraceConfig`] - Bounds on captured stack traces.
//!
//! # Example
//!
//! ```
//! # use deeperror::config::ReportConfig;
//! let config = ReportConfig::default();
//! assert!(!config.logging().enabled());
//! assert_eq!(config.trace().max_bytes(), 4096);
//! ```

use serde::Deserialize;

use crate::{
    ErrorLevel,
    logging::{self, DEFAULT_STACK_TRACE_LIMIT},
};

/// Top-level reporting configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    /// Construction-time logging section.
    #[serde(default)]
    logging: LoggingConfig,

    /// Stack trace section.
    #[serde(default)]
    trace: TraceConfig,
}

impl ReportConfig {
    /// Creates a new [`ReportConfig`] from its sections.
    pub fn new(logging: LoggingConfig, trace: TraceConfig) -> Self {
        Self { logging, trace }
    }

    /// Returns the logging configuration.
    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    /// Returns the trace configuration.
    pub fn trace(&self) -> &TraceConfig {
        &self.trace
    }

    /// Install this configuration as the process-wide policy.
    pub fn apply(&self) {
        logging::set_error_logging_enabled(self.logging.enabled);
        logging::set_auto_log_level(self.logging.level);
        logging::set_stack_trace_limit(self.trace.max_bytes);
    }
}

/// Construction-time logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log every new error when `true`.
    #[serde(default)]
    enabled: bool,

    /// Level used for those records, by canonical name (e.g. `"WARN"`).
    #[serde(default = "default_log_level")]
    level: ErrorLevel,
}

impl LoggingConfig {
    /// Creates a new [`LoggingConfig`].
    ///
    /// # Arguments
    ///
    /// * `enabled` - Whether new errors are logged on construction.
    /// * `level` - Level of the emitted records.
    pub fn new(enabled: bool, level: ErrorLevel) -> Self {
        Self { enabled, level }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn level(&self) -> ErrorLevel {
        self.level
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: default_log_level(),
        }
    }
}

/// Stack trace capture settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TraceConfig {
    /// Maximum bytes kept from each captured trace.
    #[serde(default = "default_max_bytes")]
    max_bytes: usize,
}

impl TraceConfig {
    /// Creates a new [`TraceConfig`] keeping at most `max_bytes` of each trace.
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
        }
    }
}

fn default_log_level() -> ErrorLevel {
    ErrorLevel::Error
}

fn default_max_bytes() -> usize {
    DEFAULT_STACK_TRACE_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReportConfig::default();

        assert!(!config.logging().enabled());
        assert_eq!(config.logging().level(), ErrorLevel::Error);
        assert_eq!(config.trace().max_bytes(), DEFAULT_STACK_TRACE_LIMIT);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ReportConfig =
            serde_json::from_str(r#"{"logging": {"enabled": true}}"#).unwrap();

        assert!(config.logging().enabled());
        assert_eq!(config.logging().level(), ErrorLevel::Error);
        assert_eq!(config.trace().max_bytes(), DEFAULT_STACK_TRACE_LIMIT);
    }

    #[test]
    fn test_deserialize_full() {
        let config: ReportConfig = serde_json::from_str(
            r#"{"logging": {"enabled": true, "level": "WARN"}, "trace": {"max_bytes": 1024}}"#,
        )
        .unwrap();

        assert_eq!(config.logging().level(), ErrorLevel::Warn);
        assert_eq!(config.trace().max_bytes(), 1024);
    }

    #[test]
    fn test_deserialize_rejects_unknown_level() {
        let result =
            serde_json::from_str::<ReportConfig>(r#"{"logging": {"level": "LOUD"}}"#);
        assert!(result.is_err());
    }
}
