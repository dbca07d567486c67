//! # Logkit
//!
//! An embeddable logging engine with pattern formatting, multi-sink output
//! and double-buffered asynchronous delivery.
//!
//! ## Features
//!
//! - **Two delivery modes**: synchronous on the calling thread, or
//!   asynchronous through a double buffer drained by a background looper
//! - **Pattern formatter**: `%`-escaped field specifiers compiled once into
//!   an immutable item chain; malformed patterns degrade to passthrough
//! - **Multiple sinks**: console, plain file, size-rotating file with
//!   optional gzip compression of rotated files
//! - **Process-wide registry**: named loggers with a lazy default root and
//!   an explicit flush-and-join teardown
//!
//! ## Example
//!
//! ```
//! use logkit::prelude::*;
//!
//! let logger = LoggerBuilder::new("app")
//!     .level(LogLevel::Debug)
//!     .pattern("[%d{%H:%M:%S}][%p]%T%m%n")
//!     .sink(Box::new(StdoutSink::plain()))
//!     .build()
//!     .unwrap();
//!
//! logger.info("engine started");
//! logger.shutdown();
//! ```

pub mod config;
pub mod core;
pub mod format;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::config::LoggerConfig;
    pub use crate::core::{
        DeliveryMode, LogLevel, LogRecord, Logger, LoggerBuilder, LoggerError, LoggerRegistry,
        LooperState, OverflowPolicy, Result, DEFAULT_FLUSH_INTERVAL, ROOT_LOGGER,
    };
    pub use crate::format::{FormatItem, Formatter, DEFAULT_PATTERN};
    pub use crate::sinks::{
        FileSink, RotatingFileSink, Sink, SinkFactory, SinkSpec, StdoutSink,
    };
}

pub use crate::config::LoggerConfig;
pub use crate::core::{
    DeliveryMode, DoubleBuffer, LogLevel, LogRecord, Logger, LoggerBuilder, LoggerError,
    LoggerRegistry, LooperState, OverflowPolicy, Result, DEFAULT_FLUSH_INTERVAL, ROOT_LOGGER,
};
pub use crate::format::{FormatItem, Formatter, DEFAULT_PATTERN};
pub use crate::sinks::{FileSink, RotatingFileSink, Sink, SinkFactory, SinkSpec, StdoutSink};
