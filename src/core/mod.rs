//! Core logger types

pub mod builder;
pub mod double_buffer;
pub mod error;
pub mod log_level;
pub mod logger;
pub mod looper;
pub mod record;
pub mod registry;

pub use builder::LoggerBuilder;
pub use double_buffer::{DoubleBuffer, OverflowPolicy};
pub use error::{LoggerError, Result};
pub use log_level::LogLevel;
pub use logger::{DeliveryMode, Logger, DEFAULT_FLUSH_INTERVAL};
pub use looper::{AsyncLooper, LooperState};
pub use record::LogRecord;
pub use registry::{LoggerRegistry, ROOT_LOGGER};
