//! Log record structure

use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use std::cell::RefCell;

// Thread-local cache for the thread identity string to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Get cached thread ID, computing and caching it on first access
fn get_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| {
                let current = std::thread::current();
                match current.name() {
                    Some(name) => name.to_string(),
                    None => format!("{:?}", current.id()),
                }
            })
            .clone()
    })
}

/// A single captured log event.
///
/// Immutable once constructed; moved into the double buffer on push and
/// moved back out when the looper drains.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
    pub thread_id: String,
    pub file: String,
    pub line: u32,
    pub logger: String,
    pub message: String,
}

impl LogRecord {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// to prevent attackers from injecting fake log entries.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(
        logger: impl Into<String>,
        level: LogLevel,
        file: impl Into<String>,
        line: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            timestamp: Utc::now(),
            thread_id: get_thread_id(),
            file: file.into(),
            line,
            logger: logger.into(),
            message: Self::sanitize_message(&message.into()),
        }
    }
}
