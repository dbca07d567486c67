//! Console sink implementation

use crate::core::{error::Result, log_level::LogLevel};
use crate::sinks::Sink;
use colored::Colorize;
use std::io::Write;

/// Sink writing to the process console.
///
/// Error and Fatal lines are routed to stderr, everything else to stdout.
pub struct StdoutSink {
    use_colors: bool,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Uncolored variant, for piped output or tests.
    pub fn plain() -> Self {
        Self::with_colors(false)
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for StdoutSink {
    fn write(&mut self, level: LogLevel, line: &str) -> Result<()> {
        let output = if self.use_colors {
            line.color(level.color_code()).to_string()
        } else {
            line.to_string()
        };

        match level {
            LogLevel::Error | LogLevel::Fatal => {
                std::io::stderr().lock().write_all(output.as_bytes())?;
            }
            _ => {
                std::io::stdout().lock().write_all(output.as_bytes())?;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        // Both streams, since writes go to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "stdout"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_flush_succeed() {
        let mut sink = StdoutSink::plain();
        sink.write(LogLevel::Info, "console line\n").unwrap();
        sink.write(LogLevel::Error, "error line\n").unwrap();
        sink.flush().unwrap();
    }

    #[test]
    fn test_name() {
        assert_eq!(StdoutSink::new().name(), "stdout");
    }
}
