//! Logging macros capturing the call site
//!
//! These wrap [`Logger::log`](crate::core::logger::Logger::log) with
//! `println!`-style formatting and automatic `file!()`/`line!()` capture.
//!
//! # Examples
//!
//! ```
//! use logkit::prelude::*;
//! use logkit::info;
//!
//! let logger = LoggerBuilder::new("svc")
//!     .sink(Box::new(StdoutSink::plain()))
//!     .build()
//!     .unwrap();
//!
//! let port = 8080;
//! info!(logger, "listening on port {}", port);
//! ```

/// Log at an explicit level with automatic formatting and location capture.
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, file!(), line!(), format!($($arg)+))
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::builder::LoggerBuilder;
    use crate::core::log_level::LogLevel;
    use crate::sinks::StdoutSink;

    fn logger() -> std::sync::Arc<crate::core::logger::Logger> {
        LoggerBuilder::new("macros")
            .level(LogLevel::Trace)
            .sink(Box::new(StdoutSink::plain()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_log_macro() {
        let logger = logger();
        log!(logger, LogLevel::Info, "plain message");
        log!(logger, LogLevel::Info, "formatted: {}", 42);
    }

    #[test]
    fn test_leveled_macros() {
        let logger = logger();
        trace!(logger, "trace {}", 1);
        debug!(logger, "debug {}", 2);
        info!(logger, "info {}", 3);
        warn!(logger, "warn {}", 4);
        error!(logger, "error {}", 5);
        fatal!(logger, "fatal {}", 6);
    }
}
