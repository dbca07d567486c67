//! Process-wide logger registry

use super::error::Result;
use super::logger::Logger;
use crate::sinks::StdoutSink;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Name of the default logger created on first registry use.
pub const ROOT_LOGGER: &str = "root";

static GLOBAL: OnceLock<LoggerRegistry> = OnceLock::new();

/// Process-wide mapping from logger name to logger.
///
/// Created lazily on first use with a default `root` logger (sync, INFO,
/// console). Teardown is explicit: call [`shutdown_all`](Self::shutdown_all)
/// at a controlled shutdown point rather than relying on static destruction
/// order.
pub struct LoggerRegistry {
    loggers: RwLock<HashMap<String, Arc<Logger>>>,
    /// Registration order, for deterministic teardown
    order: Mutex<Vec<String>>,
}

impl LoggerRegistry {
    fn new() -> Self {
        Self {
            loggers: RwLock::new(HashMap::new()),
            order: Mutex::new(Vec::new()),
        }
    }

    /// The process-wide registry, initialized on first use.
    pub fn global() -> &'static LoggerRegistry {
        GLOBAL.get_or_init(LoggerRegistry::new)
    }

    /// The default logger: sync, INFO, console. Created on first use and
    /// re-created if a prior `shutdown_all` removed it.
    pub fn root() -> Arc<Logger> {
        let fallback = || {
            Arc::new(Logger::new_sync(
                ROOT_LOGGER.to_string(),
                crate::core::log_level::LogLevel::default(),
                crate::format::Formatter::default(),
                vec![Box::new(StdoutSink::new())],
            ))
        };
        Self::global()
            .get_or_create(ROOT_LOGGER, || Ok(fallback()))
            .unwrap_or_else(|_| fallback())
    }

    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        self.loggers.read().get(name).cloned()
    }

    /// Return the logger registered under `name`, building and registering
    /// it with `make` on first use.
    ///
    /// Thread-safe and idempotent: concurrent first callers race to the
    /// write lock and exactly one logger is ever created per name. `make`
    /// must not itself touch the registry.
    pub fn get_or_create<F>(&self, name: &str, make: F) -> Result<Arc<Logger>>
    where
        F: FnOnce() -> Result<Arc<Logger>>,
    {
        if let Some(logger) = self.loggers.read().get(name) {
            return Ok(Arc::clone(logger));
        }

        let mut loggers = self.loggers.write();
        // double check under the write lock
        if let Some(logger) = loggers.get(name) {
            return Ok(Arc::clone(logger));
        }
        let logger = make()?;
        loggers.insert(name.to_string(), Arc::clone(&logger));
        self.order.lock().push(name.to_string());
        Ok(logger)
    }

    /// Register `logger` under its own name, replacing any existing logger
    /// of that name after flushing and stopping it.
    pub fn register(&self, logger: Arc<Logger>) {
        let name = logger.name().to_string();
        let previous = {
            let mut loggers = self.loggers.write();
            loggers.insert(name.clone(), logger)
        };
        if let Some(previous) = previous {
            previous.shutdown();
        } else {
            self.order.lock().push(name);
        }
    }

    /// Flush and stop every registered logger in registration order, then
    /// clear the registry. Called once at process teardown.
    pub fn shutdown_all(&self) {
        let order = std::mem::take(&mut *self.order.lock());
        let mut loggers = self.loggers.write();
        for name in order {
            if let Some(logger) = loggers.remove(&name) {
                logger.shutdown();
            }
        }
        loggers.clear();
    }

    /// Number of registered loggers.
    pub fn len(&self) -> usize {
        self.loggers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::LoggerBuilder;
    use crate::core::log_level::LogLevel;
    use std::thread;

    fn make_logger(name: &str) -> Result<Arc<Logger>> {
        LoggerBuilder::new(name)
            .level(LogLevel::Debug)
            .sink(Box::new(StdoutSink::plain()))
            .build()
    }

    #[test]
    fn test_get_or_create_registers_once() {
        let registry = LoggerRegistry::new();
        let a = registry
            .get_or_create("svc", || make_logger("svc"))
            .unwrap();
        let b = registry
            .get_or_create("svc", || panic!("must not rebuild"))
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_concurrent_get_or_create_is_idempotent() {
        let registry = Arc::new(LoggerRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    registry
                        .get_or_create("svc", || make_logger("svc"))
                        .unwrap()
                })
            })
            .collect();

        let loggers: Vec<Arc<Logger>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for logger in &loggers[1..] {
            assert!(Arc::ptr_eq(&loggers[0], logger));
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_replaces_same_name() {
        let registry = LoggerRegistry::new();
        let first = make_logger("dup").unwrap();
        registry.register(Arc::clone(&first));

        let second = make_logger("dup").unwrap();
        registry.register(Arc::clone(&second));

        assert_eq!(registry.len(), 1);
        let current = registry.get("dup").unwrap();
        assert!(Arc::ptr_eq(&current, &second));
        // the replaced logger was shut down
        first.info("ignored");
    }

    #[test]
    fn test_shutdown_all_clears_registry() {
        let registry = LoggerRegistry::new();
        registry
            .get_or_create("a", || make_logger("a"))
            .unwrap();
        registry
            .get_or_create("b", || make_logger("b"))
            .unwrap();

        registry.shutdown_all();
        assert!(registry.is_empty());
        assert!(registry.get("a").is_none());
    }

    #[test]
    fn test_global_has_root() {
        let root = LoggerRegistry::root();
        assert_eq!(root.name(), ROOT_LOGGER);
    }
}
