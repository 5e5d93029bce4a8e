//! Bounded Blocking Queue
//!
//! This module implements a capacity-limited, thread-safe FIFO queue guarded
//! by a single mutex with two condition variables:
//!
//! 1. **`not_full`** - producers wait here while the buffer is at capacity
//! 2. **`not_empty`** - consumers wait here while the buffer is empty
//!
//! ## Design Philosophy
//!
//! The queue favors predictable blocking semantics over raw throughput:
//! - **One lock**: every buffer access happens under a single `Mutex`, so
//!   there is exactly one serialization point and FIFO order is the order in
//!   which `put` calls complete
//! - **Predicate re-check loops**: waiters re-test their condition after
//!   every wake, which makes spurious wakeups and lost-wakeup races harmless
//! - **Single notify**: a successful `put` wakes one waiting consumer and a
//!   successful `get` wakes one waiting producer; only `close` broadcasts
//! - **No sentinel values**: shutdown is a first-class `close` operation that
//!   releases all blocked threads, instead of a magic item of `T` threaded
//!   through the data stream
//!
//! ## Blocking Model
//!
//! ```text
//! Producer (put)                     Consumer (get)
//! --------------                     --------------
//! lock                               lock
//! while full: wait(not_full)         while empty && !closed: wait(not_empty)
//! push_back(item)                    item = pop_front()
//! notify_one(not_empty)              notify_one(not_full)
//! unlock                             unlock
//! ```
//!
//! Timed variants follow the same loops with a deadline; when the deadline
//! passes with the predicate still unsatisfied the call fails with a timeout
//! and the queue is left untouched. A timed-out `put` hands the item back to
//! the caller inside the error, so a retry loop never loses data.
//!
//! ## Example
//!
//! ```rust
//! use fluxq::BoundedBlockingQueue;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let queue = Arc::new(BoundedBlockingQueue::new(8)?);
//!
//! let producer = thread::spawn({
//!     let queue = Arc::clone(&queue);
//!     move || {
//!         for i in 0..100 {
//!             queue.put(i).unwrap();
//!         }
//!         queue.close();
//!     }
//! });
//!
//! let consumer = thread::spawn({
//!     let queue = Arc::clone(&queue);
//!     move || {
//!         let mut sum = 0;
//!         while let Ok(value) = queue.get() {
//!             sum += value;
//!         }
//!         sum
//!     }
//! });
//!
//! producer.join().unwrap();
//! assert_eq!(consumer.join().unwrap(), 4950);
//! # Ok::<(), fluxq::Error>(())
//! ```

use crate::metrics::{AtomicMetrics, MetricsCollector, QueueMetrics};
use crate::{Error, Result};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

/// Error returned by a blocking or timed `put`.
///
/// Both variants carry the rejected item so the caller can retry without
/// losing data.
pub enum PutError<T> {
    /// The wait deadline passed with the queue still full
    Timeout(T),
    /// The queue was closed; no further items will be accepted
    Closed(T),
}

impl<T> PutError<T> {
    /// Recover the item that could not be enqueued.
    pub fn into_inner(self) -> T {
        match self {
            PutError::Timeout(item) | PutError::Closed(item) => item,
        }
    }

    /// Returns `true` for the timeout variant.
    pub fn is_timeout(&self) -> bool {
        matches!(self, PutError::Timeout(_))
    }
}

impl<T> From<PutError<T>> for Error {
    fn from(err: PutError<T>) -> Error {
        match err {
            PutError::Timeout(_) => Error::Timeout,
            PutError::Closed(_) => Error::Closed,
        }
    }
}

// Manual Debug so the error is usable with `unwrap` even when T is not Debug.
impl<T> fmt::Debug for PutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PutError::Timeout(_) => f.write_str("PutError::Timeout(..)"),
            PutError::Closed(_) => f.write_str("PutError::Closed(..)"),
        }
    }
}

impl<T> fmt::Display for PutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PutError::Timeout(_) => f.write_str("Timed out waiting for queue space"),
            PutError::Closed(_) => f.write_str("Queue is closed"),
        }
    }
}

impl<T> std::error::Error for PutError<T> {}

/// Error returned by a non-blocking `try_put`.
pub enum TryPutError<T> {
    /// The queue was at capacity
    Full(T),
    /// The queue was closed
    Closed(T),
}

impl<T> TryPutError<T> {
    /// Recover the item that could not be enqueued.
    pub fn into_inner(self) -> T {
        match self {
            TryPutError::Full(item) | TryPutError::Closed(item) => item,
        }
    }

    /// Returns `true` for the full variant.
    pub fn is_full(&self) -> bool {
        matches!(self, TryPutError::Full(_))
    }
}

impl<T> fmt::Debug for TryPutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryPutError::Full(_) => f.write_str("TryPutError::Full(..)"),
            TryPutError::Closed(_) => f.write_str("TryPutError::Closed(..)"),
        }
    }
}

impl<T> fmt::Display for TryPutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryPutError::Full(_) => f.write_str("Queue is full"),
            TryPutError::Closed(_) => f.write_str("Queue is closed"),
        }
    }
}

impl<T> std::error::Error for TryPutError<T> {}

// Buffer and closed flag share one lock; neither is ever touched without it.
struct Inner<T> {
    buffer: VecDeque<T>,
    closed: bool,
}

/// A bounded, blocking, multi-producer multi-consumer FIFO queue.
///
/// The queue holds at most `capacity` items. `put` blocks while the queue is
/// full, `get` blocks while it is empty; both have timed and non-blocking
/// variants. Items come out in the exact order their `put` calls completed.
///
/// # Shutdown
///
/// [`close`](Self::close) flips a flag under the lock and wakes every blocked
/// thread. After close:
/// - every `put` fails with [`PutError::Closed`]
/// - `get` keeps draining buffered items in FIFO order, then fails with
///   [`Error::Closed`]
///
/// `close` is idempotent and safe to call from any thread.
///
/// # Size Snapshots
///
/// `len`, `is_empty`, and `is_full` take the lock and report a consistent
/// snapshot, but the answer can be stale by the time the caller looks at it.
/// They are for diagnostics and polling, never for synchronization — use the
/// blocking operations for that.
///
/// # Examples
///
/// ```rust
/// use fluxq::BoundedBlockingQueue;
/// use std::time::Duration;
///
/// let queue = BoundedBlockingQueue::new(2)?;
/// queue.put(1).unwrap();
/// queue.put(2).unwrap();
/// assert!(queue.is_full());
///
/// // Full queue: a timed put fails and returns the item.
/// let err = queue.put_timeout(3, Duration::from_millis(10)).unwrap_err();
/// assert_eq!(err.into_inner(), 3);
///
/// assert_eq!(queue.get()?, 1);
/// assert_eq!(queue.get()?, 2);
/// # Ok::<(), fluxq::Error>(())
/// ```
pub struct BoundedBlockingQueue<T> {
    inner: Mutex<Inner<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
    metrics: AtomicMetrics,
}

impl<T> BoundedBlockingQueue<T> {
    /// Create a new queue with the given capacity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity);
        }

        Ok(Self {
            inner: Mutex::new(Inner {
                buffer: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
            metrics: AtomicMetrics::default(),
        })
    }

    /// Add an item to the tail of the queue, blocking while the queue is
    /// full.
    ///
    /// # Errors
    ///
    /// Returns [`PutError::Closed`] with the item if the queue is closed.
    pub fn put(&self, item: T) -> core::result::Result<(), PutError<T>> {
        let mut inner = self.inner.lock();

        if inner.buffer.len() == self.capacity && !inner.closed {
            self.metrics.record_blocked_put();
            let blocked_at = Instant::now();
            while inner.buffer.len() == self.capacity && !inner.closed {
                self.not_full.wait(&mut inner);
            }
            self.metrics.record_block_time(blocked_at.elapsed());
        }

        if inner.closed {
            return Err(PutError::Closed(item));
        }

        inner.buffer.push_back(item);
        self.metrics.record_enqueue();
        // One new item satisfies at most one waiting consumer.
        self.not_empty.notify_one();
        Ok(())
    }

    /// Add an item to the tail of the queue, blocking for at most `timeout`.
    ///
    /// The queue is left unmodified on failure and the item is handed back
    /// inside the error.
    ///
    /// # Errors
    ///
    /// Returns [`PutError::Timeout`] if no space became available within
    /// `timeout`, or [`PutError::Closed`] if the queue is closed.
    pub fn put_timeout(
        &self,
        item: T,
        timeout: Duration,
    ) -> core::result::Result<(), PutError<T>> {
        let deadline = Instant::now() + timeout;
        let mut inner = self.inner.lock();

        if inner.buffer.len() == self.capacity && !inner.closed {
            self.metrics.record_blocked_put();
            let blocked_at = Instant::now();
            while inner.buffer.len() == self.capacity && !inner.closed {
                if self.not_full.wait_until(&mut inner, deadline).timed_out()
                    && inner.buffer.len() == self.capacity
                    && !inner.closed
                {
                    self.metrics.record_put_timeout();
                    return Err(PutError::Timeout(item));
                }
            }
            self.metrics.record_block_time(blocked_at.elapsed());
        }

        if inner.closed {
            return Err(PutError::Closed(item));
        }

        inner.buffer.push_back(item);
        self.metrics.record_enqueue();
        self.not_empty.notify_one();
        Ok(())
    }

    /// Add an item without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`TryPutError::Full`] if the queue is at capacity, or
    /// [`TryPutError::Closed`] if it is closed.
    pub fn try_put(&self, item: T) -> core::result::Result<(), TryPutError<T>> {
        let mut inner = self.inner.lock();

        if inner.closed {
            return Err(TryPutError::Closed(item));
        }
        if inner.buffer.len() == self.capacity {
            return Err(TryPutError::Full(item));
        }

        inner.buffer.push_back(item);
        self.metrics.record_enqueue();
        self.not_empty.notify_one();
        Ok(())
    }

    /// Remove and return the item at the head of the queue, blocking while
    /// the queue is empty.
    ///
    /// Buffered items remain retrievable after `close`; the error is only
    /// reported once the queue is both closed and drained.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] once the queue is closed and empty.
    pub fn get(&self) -> Result<T> {
        let mut inner = self.inner.lock();

        if inner.buffer.is_empty() && !inner.closed {
            self.metrics.record_blocked_get();
            let blocked_at = Instant::now();
            while inner.buffer.is_empty() && !inner.closed {
                self.not_empty.wait(&mut inner);
            }
            self.metrics.record_block_time(blocked_at.elapsed());
        }

        match inner.buffer.pop_front() {
            Some(item) => {
                self.metrics.record_dequeue();
                // One freed slot satisfies at most one waiting producer.
                self.not_full.notify_one();
                Ok(item)
            }
            None => Err(Error::Closed),
        }
    }

    /// Remove and return the head item, blocking for at most `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] if no item became available within
    /// `timeout`, or [`Error::Closed`] once the queue is closed and empty.
    pub fn get_timeout(&self, timeout: Duration) -> Result<T> {
        let deadline = Instant::now() + timeout;
        let mut inner = self.inner.lock();

        if inner.buffer.is_empty() && !inner.closed {
            self.metrics.record_blocked_get();
            let blocked_at = Instant::now();
            while inner.buffer.is_empty() && !inner.closed {
                if self.not_empty.wait_until(&mut inner, deadline).timed_out()
                    && inner.buffer.is_empty()
                    && !inner.closed
                {
                    self.metrics.record_get_timeout();
                    return Err(Error::Timeout);
                }
            }
            self.metrics.record_block_time(blocked_at.elapsed());
        }

        match inner.buffer.pop_front() {
            Some(item) => {
                self.metrics.record_dequeue();
                self.not_full.notify_one();
                Ok(item)
            }
            None => Err(Error::Closed),
        }
    }

    /// Remove and return the head item without blocking.
    ///
    /// Returns `None` if the queue is currently empty.
    pub fn try_get(&self) -> Option<T> {
        let mut inner = self.inner.lock();

        inner.buffer.pop_front().map(|item| {
            self.metrics.record_dequeue();
            self.not_full.notify_one();
            item
        })
    }

    /// Close the queue, waking every blocked producer and consumer.
    ///
    /// Subsequent `put` calls fail; `get` drains the remaining buffered
    /// items and then fails. Calling `close` more than once is a no-op.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        if inner.closed {
            return;
        }
        inner.closed = true;
        tracing::debug!(remaining = inner.buffer.len(), "queue closed");
        // Every waiter must observe the flag, not just one.
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    /// Returns `true` if the queue has been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    /// Current number of buffered items.
    ///
    /// Advisory only: the value may be stale immediately after return.
    pub fn len(&self) -> usize {
        self.inner.lock().buffer.len()
    }

    /// Returns `true` if the queue holds no items. Same staleness caveat as
    /// [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.inner.lock().buffer.is_empty()
    }

    /// Returns `true` if the queue is at capacity. Same staleness caveat as
    /// [`len`](Self::len).
    pub fn is_full(&self) -> bool {
        let inner = self.inner.lock();
        inner.buffer.len() == self.capacity
    }

    /// Maximum number of items the queue can hold. Never changes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T> MetricsCollector for BoundedBlockingQueue<T> {
    fn metrics(&self) -> QueueMetrics {
        self.metrics.snapshot()
    }

    fn reset_metrics(&self) {
        self.metrics.reset();
    }
}

impl<T> fmt::Debug for BoundedBlockingQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("BoundedBlockingQueue")
            .field("capacity", &self.capacity)
            .field("len", &inner.buffer.len())
            .field("closed", &inner.closed)
            .finish()
    }
}
