//! Declarative logger configuration
//!
//! A [`LoggerConfig`] describes everything a
//! [`LoggerBuilder`](crate::core::builder::LoggerBuilder) needs, so loggers
//! can be defined in JSON and materialized with
//! [`LoggerBuilder::from_config`](crate::core::builder::LoggerBuilder::from_config).

use crate::core::double_buffer::OverflowPolicy;
use crate::core::error::Result;
use crate::core::log_level::LogLevel;
use crate::core::logger::DeliveryMode;
use crate::format::DEFAULT_PATTERN;
use crate::sinks::SinkSpec;
use serde::{Deserialize, Serialize};

fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

fn default_flush_interval_ms() -> u64 {
    200
}

/// Full description of a logger.
///
/// ```
/// use logkit::config::LoggerConfig;
///
/// let config = LoggerConfig::from_json(
///     r#"{
///         "name": "svc",
///         "level": "Warn",
///         "mode": "async",
///         "sinks": [{"type": "file", "path": "svc.log"}]
///     }"#,
/// )
/// .unwrap();
/// assert_eq!(config.name, "svc");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub name: String,
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default = "default_pattern")]
    pub pattern: String,
    #[serde(default)]
    pub mode: DeliveryMode,
    #[serde(default = "default_flush_interval_ms")]
    pub flush_interval_ms: u64,
    /// Buffer bound; `None` keeps the buffer unbounded
    #[serde(default)]
    pub capacity: Option<usize>,
    /// Only consulted when `capacity` is set
    #[serde(default)]
    pub overflow: OverflowPolicy,
    pub sinks: Vec<SinkSpec>,
}

impl LoggerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
