//! Logger binding name, level, formatter and sinks

use super::double_buffer::{DoubleBuffer, OverflowPolicy};
use super::error::Result;
use super::log_level::LogLevel;
use super::looper::{AsyncLooper, LooperState};
use super::record::LogRecord;
use crate::format::Formatter;
use crate::sinks::Sink;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Default wait bound for the looper between drains.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(200);

/// How a logger delivers records to its sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Format and write on the calling thread
    #[default]
    Sync,
    /// Enqueue into a double buffer; a background looper formats and writes
    Async,
}

type SharedSinks = Arc<Mutex<Vec<Box<dyn Sink>>>>;

enum Delivery {
    Sync,
    Async {
        buffer: Arc<DoubleBuffer>,
        looper: AsyncLooper,
    },
}

/// A configured logger.
///
/// Name, threshold, formatter and sink set are fixed at construction; build
/// a new logger (and re-register it) to change them. Constructed through
/// [`LoggerBuilder`](crate::core::builder::LoggerBuilder).
///
/// After [`shutdown`](Self::shutdown), `log` calls become no-ops with a
/// one-time stderr diagnostic. Logging never propagates an error into the
/// caller: sink failures are isolated per sink and reported on stderr.
pub struct Logger {
    name: String,
    min_level: LogLevel,
    formatter: Arc<Formatter>,
    sinks: SharedSinks,
    delivery: Delivery,
    shut_down: AtomicBool,
    shutdown_warned: AtomicBool,
}

fn write_all_sinks(sinks: &mut [Box<dyn Sink>], level: LogLevel, line: &str) {
    for sink in sinks.iter_mut() {
        if let Err(e) = sink.write(level, line) {
            eprintln!("[logkit] sink '{}' write failed: {}", sink.name(), e);
        }
    }
}

fn flush_all_sinks(sinks: &mut [Box<dyn Sink>]) {
    for sink in sinks.iter_mut() {
        if let Err(e) = sink.flush() {
            eprintln!("[logkit] sink '{}' flush failed: {}", sink.name(), e);
        }
    }
}

impl Logger {
    pub(crate) fn new_sync(
        name: String,
        min_level: LogLevel,
        formatter: Formatter,
        sinks: Vec<Box<dyn Sink>>,
    ) -> Self {
        Self {
            name,
            min_level,
            formatter: Arc::new(formatter),
            sinks: Arc::new(Mutex::new(sinks)),
            delivery: Delivery::Sync,
            shut_down: AtomicBool::new(false),
            shutdown_warned: AtomicBool::new(false),
        }
    }

    pub(crate) fn new_async(
        name: String,
        min_level: LogLevel,
        formatter: Formatter,
        sinks: Vec<Box<dyn Sink>>,
        flush_interval: Duration,
        capacity: Option<usize>,
        policy: OverflowPolicy,
    ) -> Result<Self> {
        let formatter = Arc::new(formatter);
        let sinks: SharedSinks = Arc::new(Mutex::new(sinks));
        let buffer = Arc::new(DoubleBuffer::with_capacity(capacity, policy));

        let worker_formatter = Arc::clone(&formatter);
        let worker_sinks = Arc::clone(&sinks);
        let looper = AsyncLooper::spawn(
            Arc::clone(&buffer),
            flush_interval,
            Box::new(move |batch| {
                let mut sinks = worker_sinks.lock();
                for record in batch {
                    let line = worker_formatter.render(record);
                    write_all_sinks(&mut sinks, record.level, &line);
                }
                flush_all_sinks(&mut sinks);
            }),
        )?;

        Ok(Self {
            name,
            min_level,
            formatter,
            sinks,
            delivery: Delivery::Async { buffer, looper },
            shut_down: AtomicBool::new(false),
            shutdown_warned: AtomicBool::new(false),
        })
    }

    /// Log a message at `level`, attributing it to `file:line`.
    ///
    /// The threshold check happens before any record construction or
    /// formatting, so filtered-out calls cost a comparison and nothing else.
    pub fn log(&self, level: LogLevel, file: &str, line: u32, message: impl Into<String>) {
        if level < self.min_level {
            return;
        }
        if self.shut_down.load(Ordering::Acquire) {
            if !self.shutdown_warned.swap(true, Ordering::AcqRel) {
                eprintln!(
                    "[logkit] logger '{}' received a log call after shutdown; ignoring",
                    self.name
                );
            }
            return;
        }

        let record = LogRecord::new(&self.name, level, file, line, message);
        match &self.delivery {
            Delivery::Sync => {
                let rendered = self.formatter.render(&record);
                let mut sinks = self.sinks.lock();
                write_all_sinks(&mut sinks, record.level, &rendered);
                flush_all_sinks(&mut sinks);
            }
            Delivery::Async { buffer, .. } => buffer.push(record),
        }
    }

    #[track_caller]
    pub fn trace(&self, message: impl Into<String>) {
        let loc = std::panic::Location::caller();
        self.log(LogLevel::Trace, loc.file(), loc.line(), message);
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        let loc = std::panic::Location::caller();
        self.log(LogLevel::Debug, loc.file(), loc.line(), message);
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        let loc = std::panic::Location::caller();
        self.log(LogLevel::Info, loc.file(), loc.line(), message);
    }

    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        let loc = std::panic::Location::caller();
        self.log(LogLevel::Warn, loc.file(), loc.line(), message);
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        let loc = std::panic::Location::caller();
        self.log(LogLevel::Error, loc.file(), loc.line(), message);
    }

    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) {
        let loc = std::panic::Location::caller();
        self.log(LogLevel::Fatal, loc.file(), loc.line(), message);
    }

    /// Flush every sink.
    ///
    /// For an async logger this flushes what the looper has already
    /// delivered; use [`shutdown`](Self::shutdown) to drain the buffer.
    /// Every sink is attempted even when one fails; the first failure is
    /// returned after the loop completes.
    pub fn flush(&self) -> Result<()> {
        let mut sinks = self.sinks.lock();
        let mut first_err = None;
        for sink in sinks.iter_mut() {
            if let Err(e) = sink.flush() {
                eprintln!("[logkit] sink '{}' flush failed: {}", sink.name(), e);
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Stop delivery, flushing all pending records first.
    ///
    /// For an async logger, every record pushed before this call reaches
    /// the sinks before it returns. Idempotent; later `log` calls no-op.
    pub fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Delivery::Async { looper, .. } = &self.delivery {
            looper.stop();
        }
        if let Err(e) = self.flush() {
            eprintln!("[logkit] failed to flush during shutdown: {}", e);
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    #[must_use]
    pub fn is_async(&self) -> bool {
        matches!(self.delivery, Delivery::Async { .. })
    }

    /// Looper state, for async loggers.
    pub fn looper_state(&self) -> Option<LooperState> {
        match &self.delivery {
            Delivery::Async { looper, .. } => Some(looper.state()),
            Delivery::Sync => None,
        }
    }

    /// Records discarded by a bounded buffer's drop policies or by log
    /// calls racing with shutdown.
    pub fn dropped_count(&self) -> u64 {
        match &self.delivery {
            Delivery::Async { buffer, .. } => buffer.dropped_count(),
            Delivery::Sync => 0,
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Result as LogResult;
    use std::sync::atomic::AtomicUsize;

    /// Sink collecting lines into shared memory
    struct MemorySink {
        lines: Arc<Mutex<Vec<String>>>,
        writes: Arc<AtomicUsize>,
    }

    impl MemorySink {
        fn new() -> (Self, Arc<Mutex<Vec<String>>>, Arc<AtomicUsize>) {
            let lines = Arc::new(Mutex::new(Vec::new()));
            let writes = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    lines: Arc::clone(&lines),
                    writes: Arc::clone(&writes),
                },
                lines,
                writes,
            )
        }
    }

    impl Sink for MemorySink {
        fn write(&mut self, _level: LogLevel, line: &str) -> LogResult<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.lines.lock().push(line.to_string());
            Ok(())
        }

        fn flush(&mut self) -> LogResult<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "memory"
        }
    }

    /// Sink that always fails, for failure-isolation tests
    struct FailingSink;

    impl Sink for FailingSink {
        fn write(&mut self, _level: LogLevel, _line: &str) -> LogResult<()> {
            Err(crate::core::error::LoggerError::sink("failing", "always"))
        }

        fn flush(&mut self) -> LogResult<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    /// Sink whose flush always fails, counting attempts
    struct FailingFlushSink {
        flushes: Arc<AtomicUsize>,
    }

    impl Sink for FailingFlushSink {
        fn write(&mut self, _level: LogLevel, _line: &str) -> LogResult<()> {
            Ok(())
        }

        fn flush(&mut self) -> LogResult<()> {
            self.flushes.fetch_add(1, Ordering::SeqCst);
            Err(crate::core::error::LoggerError::sink("failing-flush", "always"))
        }

        fn name(&self) -> &str {
            "failing-flush"
        }
    }

    /// Sink counting successful flushes
    struct FlushCountingSink {
        flushes: Arc<AtomicUsize>,
    }

    impl Sink for FlushCountingSink {
        fn write(&mut self, _level: LogLevel, _line: &str) -> LogResult<()> {
            Ok(())
        }

        fn flush(&mut self) -> LogResult<()> {
            self.flushes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &str {
            "flush-counting"
        }
    }

    fn sync_logger(level: LogLevel) -> (Logger, Arc<Mutex<Vec<String>>>, Arc<AtomicUsize>) {
        let (sink, lines, writes) = MemorySink::new();
        let logger = Logger::new_sync(
            "test".into(),
            level,
            Formatter::compile("[%p] %m%n"),
            vec![Box::new(sink)],
        );
        (logger, lines, writes)
    }

    #[test]
    fn test_sync_logger_writes_on_caller_thread() {
        let (logger, lines, _) = sync_logger(LogLevel::Trace);
        logger.info("hello");
        assert_eq!(lines.lock().as_slice(), &["[INFO] hello\n".to_string()]);
    }

    #[test]
    fn test_level_filter_skips_all_work() {
        let (logger, _, writes) = sync_logger(LogLevel::Warn);
        logger.trace("a");
        logger.debug("b");
        logger.info("c");
        assert_eq!(writes.load(Ordering::SeqCst), 0);

        logger.error("d");
        assert_eq!(writes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failing_sink_does_not_block_others() {
        let (sink, lines, _) = MemorySink::new();
        let logger = Logger::new_sync(
            "test".into(),
            LogLevel::Trace,
            Formatter::compile("%m%n"),
            vec![Box::new(FailingSink), Box::new(sink)],
        );
        logger.info("still delivered");
        assert_eq!(lines.lock().len(), 1);
    }

    #[test]
    fn test_flush_attempts_every_sink_past_failures() {
        let failed = Arc::new(AtomicUsize::new(0));
        let succeeded = Arc::new(AtomicUsize::new(0));
        let logger = Logger::new_sync(
            "test".into(),
            LogLevel::Trace,
            Formatter::compile("%m%n"),
            vec![
                Box::new(FailingFlushSink {
                    flushes: Arc::clone(&failed),
                }),
                Box::new(FlushCountingSink {
                    flushes: Arc::clone(&succeeded),
                }),
            ],
        );

        // the first sink's failure surfaces, but the second is still flushed
        assert!(logger.flush().is_err());
        assert_eq!(failed.load(Ordering::SeqCst), 1);
        assert_eq!(succeeded.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_async_logger_flushes_on_shutdown() {
        let (sink, lines, _) = MemorySink::new();
        let logger = Logger::new_async(
            "test".into(),
            LogLevel::Trace,
            Formatter::compile("%m%n"),
            vec![Box::new(sink)],
            DEFAULT_FLUSH_INTERVAL,
            None,
            OverflowPolicy::Block,
        )
        .unwrap();

        for i in 0..200 {
            logger.info(format!("msg {}", i));
        }
        logger.shutdown();

        let lines = lines.lock();
        assert_eq!(lines.len(), 200);
        assert_eq!(lines[0], "msg 0\n");
        assert_eq!(lines[199], "msg 199\n");
    }

    #[test]
    fn test_post_shutdown_log_is_noop() {
        let (logger, lines, _) = sync_logger(LogLevel::Trace);
        logger.shutdown();
        logger.info("ignored");
        assert!(lines.lock().is_empty());
    }

    #[test]
    fn test_shutdown_idempotent() {
        let (logger, _, _) = sync_logger(LogLevel::Trace);
        logger.shutdown();
        logger.shutdown();
    }

    #[test]
    fn test_async_looper_state_visible() {
        let (sink, _, _) = MemorySink::new();
        let logger = Logger::new_async(
            "test".into(),
            LogLevel::Trace,
            Formatter::default(),
            vec![Box::new(sink)],
            DEFAULT_FLUSH_INTERVAL,
            None,
            OverflowPolicy::Block,
        )
        .unwrap();
        assert!(logger.is_async());
        logger.shutdown();
        assert_eq!(logger.looper_state(), Some(LooperState::Stopped));
    }
}
