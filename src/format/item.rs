//! Renderable fields of a compiled pattern

use crate::core::record::LogRecord;
use std::fmt::Write as _;

/// One renderable field within a compiled pattern.
///
/// The variant set is closed: a pattern compiles into exactly these items
/// and nothing else. Items are stateless after construction, so a compiled
/// chain can be rendered concurrently from any thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatItem {
    /// Literal text captured from the pattern
    Literal(String),
    /// `%m` - message text
    Message,
    /// `%p` - level (priority) name
    Level,
    /// `%d` - timestamp, rendered with a strftime pattern
    Time(String),
    /// `%f` - source file
    File,
    /// `%l` - source line
    Line,
    /// `%c` - logger name
    LoggerName,
    /// `%t` - thread identity
    ThreadId,
    /// `%T` - tab
    Tab,
    /// `%n` - newline
    Newline,
    /// Unrecognized `%x` sequence, passed through unchanged
    Other(String),
}

/// Default strftime pattern for `%d` without an explicit `{...}` sub-pattern.
pub const DEFAULT_TIME_PATTERN: &str = "%H:%M:%S";

impl FormatItem {
    pub fn render(&self, record: &LogRecord, out: &mut String) {
        match self {
            FormatItem::Literal(text) => out.push_str(text),
            FormatItem::Message => out.push_str(&record.message),
            FormatItem::Level => out.push_str(record.level.to_str()),
            FormatItem::Time(pattern) => {
                // chrono reports bad strftime specifiers through fmt::Error;
                // fall back to the raw pattern rather than failing the render
                if write!(out, "{}", record.timestamp.format(pattern)).is_err() {
                    out.push_str(pattern);
                }
            }
            FormatItem::File => out.push_str(&record.file),
            FormatItem::Line => {
                let _ = write!(out, "{}", record.line);
            }
            FormatItem::LoggerName => out.push_str(&record.logger),
            FormatItem::ThreadId => out.push_str(&record.thread_id),
            FormatItem::Tab => out.push('\t'),
            FormatItem::Newline => out.push('\n'),
            FormatItem::Other(raw) => out.push_str(raw),
        }
    }
}
