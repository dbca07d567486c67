//! Background consumer thread for asynchronous delivery

use super::double_buffer::DoubleBuffer;
use super::error::{LoggerError, Result};
use super::record::LogRecord;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Lifecycle of the looper's worker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LooperState {
    /// Thread spawned, not yet in its wait loop
    Starting,
    /// Waiting for records or draining them
    Running,
    /// Shutdown requested; one final drain pending
    Stopping,
    /// Thread exited; no further records will be delivered
    Stopped,
}

/// Called with each drained batch; the looper clears and recycles the
/// storage afterwards.
pub type Dispatch = Box<dyn FnMut(&[LogRecord]) + Send>;

/// Dedicated worker draining a [`DoubleBuffer`] and dispatching records.
///
/// Wakes on the buffer's not-empty signal or after `flush_interval`,
/// whichever comes first, so delivery latency stays bounded even when
/// throughput is low.
pub struct AsyncLooper {
    state: Arc<(Mutex<LooperState>, Condvar)>,
    buffer: Arc<DoubleBuffer>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl AsyncLooper {
    pub fn spawn(
        buffer: Arc<DoubleBuffer>,
        flush_interval: Duration,
        mut dispatch: Dispatch,
    ) -> Result<Self> {
        let state = Arc::new((Mutex::new(LooperState::Starting), Condvar::new()));

        let worker_state = Arc::clone(&state);
        let worker_buffer = Arc::clone(&buffer);
        let handle = thread::Builder::new()
            .name("logkit-looper".into())
            .spawn(move || {
                {
                    let (lock, cvar) = &*worker_state;
                    let mut state = lock.lock();
                    // stop() may already have requested Stopping
                    if *state == LooperState::Starting {
                        *state = LooperState::Running;
                    }
                    cvar.notify_all();
                }

                loop {
                    if *worker_state.0.lock() == LooperState::Stopping {
                        break;
                    }
                    let batch = worker_buffer.swap_and_drain(flush_interval);
                    if !batch.is_empty() {
                        dispatch(&batch);
                        worker_buffer.recycle(batch);
                    }
                }

                // Final drain: everything pushed before shutdown is delivered
                let rest = worker_buffer.drain_now();
                if !rest.is_empty() {
                    dispatch(&rest);
                    worker_buffer.recycle(rest);
                }

                let (lock, cvar) = &*worker_state;
                *lock.lock() = LooperState::Stopped;
                cvar.notify_all();
            })
            .map_err(|e| {
                LoggerError::io_operation("spawn looper thread", "OS refused thread creation", e)
            })?;

        Ok(Self {
            state,
            buffer,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Request shutdown and wait for the final flush.
    ///
    /// Cooperative: the worker finishes its current dispatch cycle, drains
    /// the buffer one last time, and exits. Idempotent. A sink write that
    /// never returns will stall this call; sink writes are assumed to
    /// complete in bounded time.
    pub fn stop(&self) {
        {
            let (lock, _cvar) = &*self.state;
            let mut state = lock.lock();
            match *state {
                LooperState::Stopped => return,
                LooperState::Stopping => {}
                _ => *state = LooperState::Stopping,
            }
        }
        // wake the worker out of its condvar wait
        self.buffer.wake();

        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                eprintln!("[logkit] looper thread panicked during shutdown");
                let (lock, cvar) = &*self.state;
                *lock.lock() = LooperState::Stopped;
                cvar.notify_all();
            }
        }

        // No consumer remains: stop accepting pushes so a producer that
        // raced past the logger's shutdown check can never block on a full
        // buffer nobody will ever drain
        self.buffer.close();
    }

    pub fn state(&self) -> LooperState {
        *self.state.0.lock()
    }

    /// Block until the worker has entered its wait loop.
    pub fn wait_until_running(&self) {
        let (lock, cvar) = &*self.state;
        let mut state = lock.lock();
        while *state == LooperState::Starting {
            cvar.wait(&mut state);
        }
    }
}

impl Drop for AsyncLooper {
    fn drop(&mut self) {
        self.stop();
    }
}
