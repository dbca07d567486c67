//! Fluent logger construction

use super::double_buffer::OverflowPolicy;
use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::logger::{DeliveryMode, Logger, DEFAULT_FLUSH_INTERVAL};
use super::registry::LoggerRegistry;
use crate::config::LoggerConfig;
use crate::format::{Formatter, DEFAULT_PATTERN};
use crate::sinks::{Sink, SinkFactory, SinkSpec};
use std::sync::Arc;
use std::time::Duration;

/// Fluent configuration of a [`Logger`].
///
/// `build()` is the single validation and construction boundary: it fails
/// when no sink is configured or a sink spec cannot be materialized
/// (pattern compilation never fails). `build()` returns a standalone
/// instance whose lifetime is the caller's responsibility;
/// `build_global()` additionally registers it in the process-wide
/// [`LoggerRegistry`], replacing (with a prior flush) any logger of the
/// same name.
///
/// # Example
///
/// ```
/// use logkit::prelude::*;
///
/// let logger = LoggerBuilder::new("svc")
///     .level(LogLevel::Debug)
///     .pattern("[%d][%p]%T%m%n")
///     .sink(Box::new(StdoutSink::plain()))
///     .build()
///     .unwrap();
/// logger.debug("configured");
/// ```
pub struct LoggerBuilder {
    name: String,
    level: LogLevel,
    pattern: String,
    sinks: Vec<Box<dyn Sink>>,
    specs: Vec<SinkSpec>,
    mode: DeliveryMode,
    flush_interval: Duration,
    capacity: Option<usize>,
    overflow: OverflowPolicy,
}

impl LoggerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: LogLevel::default(),
            pattern: DEFAULT_PATTERN.to_string(),
            sinks: Vec::new(),
            specs: Vec::new(),
            mode: DeliveryMode::Sync,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            capacity: None,
            overflow: OverflowPolicy::default(),
        }
    }

    /// Populate a builder from a configuration value.
    pub fn from_config(config: &LoggerConfig) -> Self {
        let mut builder = Self::new(&config.name)
            .level(config.level)
            .pattern(&config.pattern)
            .delivery(config.mode)
            .flush_interval(Duration::from_millis(config.flush_interval_ms));
        if let Some(capacity) = config.capacity {
            builder = builder.bounded(capacity, config.overflow);
        }
        for spec in &config.sinks {
            builder = builder.sink_spec(spec.clone());
        }
        builder
    }

    /// Set minimum level; records below it are dropped before any work.
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the format pattern (see [`crate::format`]).
    #[must_use = "builder methods return a new value"]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Add a ready-made sink.
    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, sink: Box<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Add a sink by spec; materialized (and validated) at build time.
    #[must_use = "builder methods return a new value"]
    pub fn sink_spec(mut self, spec: SinkSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Choose synchronous or asynchronous delivery.
    #[must_use = "builder methods return a new value"]
    pub fn delivery(mut self, mode: DeliveryMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for `delivery(DeliveryMode::Async)`.
    #[must_use = "builder methods return a new value"]
    pub fn async_delivery(self) -> Self {
        self.delivery(DeliveryMode::Async)
    }

    /// Upper bound on the looper's wait between drains (async only).
    #[must_use = "builder methods return a new value"]
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// Bound the buffer, with an explicit overflow policy (async only).
    ///
    /// The default buffer is unbounded; bounding it trades "never drop"
    /// for bounded memory, governed by `policy`.
    #[must_use = "builder methods return a new value"]
    pub fn bounded(mut self, capacity: usize, policy: OverflowPolicy) -> Self {
        self.capacity = Some(capacity);
        self.overflow = policy;
        self
    }

    /// Build a standalone logger.
    pub fn build(self) -> Result<Arc<Logger>> {
        let mut sinks = self.sinks;
        for spec in &self.specs {
            sinks.push(SinkFactory::create(spec)?);
        }
        if sinks.is_empty() {
            return Err(LoggerError::config(
                "LoggerBuilder",
                format!("logger '{}' has no sink configured", self.name),
            ));
        }

        let formatter = Formatter::compile(&self.pattern);
        let logger = match self.mode {
            DeliveryMode::Sync => Logger::new_sync(self.name, self.level, formatter, sinks),
            DeliveryMode::Async => Logger::new_async(
                self.name,
                self.level,
                formatter,
                sinks,
                self.flush_interval,
                self.capacity,
                self.overflow,
            )?,
        };
        Ok(Arc::new(logger))
    }

    /// Build and register into the process-wide registry.
    pub fn build_global(self) -> Result<Arc<Logger>> {
        let logger = self.build()?;
        LoggerRegistry::global().register(Arc::clone(&logger));
        Ok(logger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::StdoutSink;
    use tempfile::tempdir;

    #[test]
    fn test_build_requires_a_sink() {
        let result = LoggerBuilder::new("empty").build();
        assert!(matches!(
            result,
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_build_sync_logger() {
        let logger = LoggerBuilder::new("svc")
            .level(LogLevel::Debug)
            .sink(Box::new(StdoutSink::plain()))
            .build()
            .unwrap();
        assert_eq!(logger.name(), "svc");
        assert_eq!(logger.min_level(), LogLevel::Debug);
        assert!(!logger.is_async());
    }

    #[test]
    fn test_build_async_logger() {
        let logger = LoggerBuilder::new("svc")
            .async_delivery()
            .sink(Box::new(StdoutSink::plain()))
            .build()
            .unwrap();
        assert!(logger.is_async());
        logger.shutdown();
    }

    #[test]
    fn test_build_materializes_specs() {
        let dir = tempdir().unwrap();
        let logger = LoggerBuilder::new("svc")
            .sink_spec(SinkSpec::file(dir.path().join("a.log")))
            .build()
            .unwrap();
        logger.info("to file");
        assert!(dir.path().join("a.log").exists());
    }

    #[test]
    fn test_build_fails_on_bad_spec() {
        let dir = tempdir().unwrap();
        let result = LoggerBuilder::new("svc")
            .sink_spec(SinkSpec::rotating_file(dir.path().join("a.log"), 0))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_from_config() {
        let config = LoggerConfig::from_json(
            r#"{
                "name": "cfg",
                "level": "Debug",
                "mode": "async",
                "sinks": [{"type": "stdout", "colors": false}]
            }"#,
        )
        .unwrap();
        let logger = LoggerBuilder::from_config(&config).build().unwrap();
        assert_eq!(logger.name(), "cfg");
        assert_eq!(logger.min_level(), LogLevel::Debug);
        assert!(logger.is_async());
        logger.shutdown();
    }
}
