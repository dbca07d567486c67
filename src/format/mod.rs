//! Pattern compilation and record rendering
//!
//! A pattern string mixes literal text with `%`-escaped field specifiers:
//!
//! | Spec | Field            |
//! |------|------------------|
//! | `%d` | timestamp, optionally `%d{strftime}` |
//! | `%t` | thread identity  |
//! | `%p` | level (priority) |
//! | `%c` | logger name      |
//! | `%f` | source file      |
//! | `%l` | source line      |
//! | `%m` | message          |
//! | `%T` | tab              |
//! | `%n` | newline          |
//!
//! Any other `%x` sequence passes through as raw text; compilation never
//! fails.

pub mod item;

pub use item::{FormatItem, DEFAULT_TIME_PATTERN};

use crate::core::record::LogRecord;

/// Default pattern used when a builder is given none.
pub const DEFAULT_PATTERN: &str = "[%d{%H:%M:%S}][%c][%t][%p]%T%m%n";

/// A compiled pattern: an ordered, immutable chain of [`FormatItem`]s.
///
/// Rendering is deterministic and performs no I/O, so a formatter can be
/// shared behind an `Arc` and called from any thread.
#[derive(Debug, Clone)]
pub struct Formatter {
    pattern: String,
    items: Vec<FormatItem>,
}

impl Formatter {
    /// Compile a pattern string.
    ///
    /// Malformed input is never an error: unrecognized specifiers and a
    /// trailing `%` degrade to literal passthrough.
    pub fn compile(pattern: &str) -> Self {
        let mut items = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            let Some(spec) = chars.next() else {
                literal.push('%');
                break;
            };
            if !literal.is_empty() {
                items.push(FormatItem::Literal(std::mem::take(&mut literal)));
            }
            match spec {
                'd' => {
                    let mut time_pattern = String::new();
                    if chars.peek() == Some(&'{') {
                        chars.next();
                        // an unterminated '{' keeps whatever was collected
                        for sub in chars.by_ref() {
                            if sub == '}' {
                                break;
                            }
                            time_pattern.push(sub);
                        }
                    }
                    if time_pattern.is_empty() {
                        time_pattern.push_str(DEFAULT_TIME_PATTERN);
                    }
                    items.push(FormatItem::Time(time_pattern));
                }
                't' => items.push(FormatItem::ThreadId),
                'p' => items.push(FormatItem::Level),
                'c' => items.push(FormatItem::LoggerName),
                'f' => items.push(FormatItem::File),
                'l' => items.push(FormatItem::Line),
                'm' => items.push(FormatItem::Message),
                'T' => items.push(FormatItem::Tab),
                'n' => items.push(FormatItem::Newline),
                other => items.push(FormatItem::Other(format!("%{}", other))),
            }
        }
        if !literal.is_empty() {
            items.push(FormatItem::Literal(literal));
        }

        Self {
            pattern: pattern.to_string(),
            items,
        }
    }

    /// Render a record by applying each item in pattern order.
    pub fn render(&self, record: &LogRecord) -> String {
        let mut out = String::with_capacity(self.pattern.len() + record.message.len() + 32);
        for item in &self.items {
            item.render(record, &mut out);
        }
        out
    }

    /// The pattern this formatter was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The compiled item chain, in pattern order.
    pub fn items(&self) -> &[FormatItem] {
        &self.items
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::compile(DEFAULT_PATTERN)
    }
}
