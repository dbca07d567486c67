//! Double-buffered producer/consumer hand-off
//!
//! Two growable record sequences swap producer/consumer roles under a single
//! mutex, keeping the critical section O(1): producers append to one
//! sequence while the looper processes the other out of lock.

use super::record::LogRecord;
use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// What `push` does when a bounded buffer is full.
///
/// The buffer is unbounded by default; bounding it is an explicit
/// configuration choice, and this policy is part of that choice, never
/// silent behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Block the producer until the looper drains
    #[default]
    Block,
    /// Discard the oldest pending record to make room
    DropOldest,
    /// Discard the record being pushed
    DropNewest,
}

struct Buffers {
    /// Sequence currently in the producer role
    producer: Vec<LogRecord>,
    /// The other sequence, idle between drains; its storage is reused
    spare: Vec<LogRecord>,
    /// Latched wake request; taken under the lock so a wake arriving just
    /// before the consumer's wait is never lost
    woken: bool,
    /// Set once the consumer is gone; pushes are discarded from then on
    closed: bool,
}

/// Two-sequence structure for lock-minimal producer/consumer hand-off.
///
/// Invariants: the producer-role sequence is only appended to by producers
/// under the lock; the drained sequence is owned by the caller of
/// [`swap_and_drain`](Self::swap_and_drain) until recycled; exactly one
/// sequence holds each role at any time.
pub struct DoubleBuffer {
    buffers: Mutex<Buffers>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: Option<usize>,
    policy: OverflowPolicy,
    dropped: AtomicU64,
}

impl DoubleBuffer {
    /// Unbounded buffer: `push` never blocks beyond the lock itself,
    /// trading worst-case memory growth for never dropping a record.
    pub fn unbounded() -> Self {
        Self::with_capacity(None, OverflowPolicy::Block)
    }

    /// Optionally bounded buffer with an explicit overflow policy.
    pub fn with_capacity(capacity: Option<usize>, policy: OverflowPolicy) -> Self {
        Self {
            buffers: Mutex::new(Buffers {
                producer: Vec::new(),
                spare: Vec::new(),
                woken: false,
                closed: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
            policy,
            dropped: AtomicU64::new(0),
        }
    }

    /// Append a record to the producer sequence.
    ///
    /// All pushes serialize through the buffer lock, which is what gives the
    /// engine a single global delivery order consistent with lock
    /// acquisition order.
    pub fn push(&self, record: LogRecord) {
        let mut buffers = self.buffers.lock();
        if buffers.closed {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return;
        }

        if let Some(capacity) = self.capacity {
            if buffers.producer.len() >= capacity {
                match self.policy {
                    OverflowPolicy::Block => {
                        while buffers.producer.len() >= capacity && !buffers.closed {
                            self.not_full.wait(&mut buffers);
                        }
                        if buffers.closed {
                            self.dropped.fetch_add(1, Ordering::Relaxed);
                            return;
                        }
                    }
                    OverflowPolicy::DropOldest => {
                        buffers.producer.remove(0);
                        self.dropped.fetch_add(1, Ordering::Relaxed);
                    }
                    OverflowPolicy::DropNewest => {
                        self.dropped.fetch_add(1, Ordering::Relaxed);
                        return;
                    }
                }
            }
        }

        let was_empty = buffers.producer.is_empty();
        buffers.producer.push(record);
        drop(buffers);
        if was_empty {
            self.not_empty.notify_one();
        }
    }

    /// Swap roles and return the accumulated records.
    ///
    /// Waits up to `timeout` for the not-empty signal; returning an empty
    /// vec after the timeout is normal under low throughput. The swap
    /// itself is an O(1) exchange of the two sequences.
    pub fn swap_and_drain(&self, timeout: Duration) -> Vec<LogRecord> {
        let mut buffers = self.buffers.lock();
        if buffers.producer.is_empty() && !buffers.woken {
            self.not_empty.wait_for(&mut buffers, timeout);
        }
        buffers.woken = false;
        self.take_producer(&mut buffers)
    }

    /// Swap roles without waiting. Used for the final flush on shutdown.
    pub fn drain_now(&self) -> Vec<LogRecord> {
        let mut buffers = self.buffers.lock();
        self.take_producer(&mut buffers)
    }

    fn take_producer(&self, buffers: &mut Buffers) -> Vec<LogRecord> {
        let spare = std::mem::take(&mut buffers.spare);
        let drained = std::mem::replace(&mut buffers.producer, spare);
        if !drained.is_empty() {
            self.not_full.notify_all();
        }
        drained
    }

    /// Return a drained sequence's storage for reuse as the next spare.
    pub fn recycle(&self, mut drained: Vec<LogRecord>) {
        drained.clear();
        let mut buffers = self.buffers.lock();
        // keep the larger allocation
        if drained.capacity() > buffers.spare.capacity() {
            buffers.spare = drained;
        }
    }

    /// Wake a consumer blocked on the not-empty condition (or about to be).
    pub fn wake(&self) {
        let mut buffers = self.buffers.lock();
        buffers.woken = true;
        drop(buffers);
        self.not_empty.notify_all();
    }

    /// Mark the buffer closed once its consumer is gone.
    ///
    /// Later pushes are discarded (and counted as dropped) instead of
    /// accumulating or blocking; a producer already blocked on the not-full
    /// condition is released and its record discarded. Records stranded
    /// after the consumer's final drain are discarded and counted too.
    /// Idempotent.
    pub fn close(&self) {
        let mut buffers = self.buffers.lock();
        if buffers.closed {
            return;
        }
        buffers.closed = true;
        let stranded = buffers.producer.len() as u64;
        buffers.producer.clear();
        if stranded > 0 {
            self.dropped.fetch_add(stranded, Ordering::Relaxed);
        }
        drop(buffers);
        self.not_full.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.buffers.lock().closed
    }

    pub fn len(&self) -> usize {
        self.buffers.lock().producer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records discarded by a bounded buffer's drop policies or by pushes
    /// arriving after [`close`](Self::close).
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
