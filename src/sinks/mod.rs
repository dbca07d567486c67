//! Sink trait and destination implementations

pub mod factory;
pub mod file;
pub mod rotating;
pub mod stdout;

pub use factory::{SinkFactory, SinkSpec};
pub use file::FileSink;
pub use rotating::RotatingFileSink;
pub use stdout::StdoutSink;

use crate::core::{error::Result, log_level::LogLevel};

/// A write destination for formatted log lines.
///
/// A sink owns its destination handle exclusively; a given file path is
/// written by at most one sink instance. The record level accompanies the
/// rendered line so console sinks can color and route by severity.
pub trait Sink: Send {
    fn write(&mut self, level: LogLevel, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
