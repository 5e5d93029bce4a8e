//! # FluxQ
//!
//! A bounded, blocking, thread-safe FIFO queue for classic producer-consumer
//! pipelines.
//!
//! ## Features
//!
//! - **Bounded Blocking Queue**: Capacity-limited MPMC queue with blocking
//!   `put`/`get`, timeout variants, and non-blocking `try_` variants
//! - **Graceful Shutdown**: An explicit `close` that releases every blocked
//!   producer and consumer — no sentinel values in the data stream
//! - **Pipeline Helpers**: Thin producer/consumer worker wrappers for wiring
//!   a source, a queue, and a sink together
//!
//! ## Philosophy
//!
//! FluxQ focuses on providing:
//! - Simple, predictable blocking semantics built on one mutex/condvar pair
//! - Strict FIFO ordering with respect to completed insertions
//! - Recoverable timeouts that never lose the caller's item
//! - Ergonomic APIs that guide users toward correct shutdown handling
//!
//! ## Quick Start
//!
//! ```rust
//! use fluxq::BoundedBlockingQueue;
//!
//! let queue = BoundedBlockingQueue::new(100)?;
//! queue.put(42).unwrap();
//! assert_eq!(queue.get()?, 42);
//! # Ok::<(), fluxq::Error>(())
//! ```
//!
//! ## Thread Safety
//!
//! The queue is safe to share by reference (`Arc`) among any number of
//! producer and consumer threads. All buffer access happens under a single
//! internal lock; blocked waiters re-check their predicate in a loop on
//! every wake, so spurious wakeups are harmless.

#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod metrics;
pub mod pipeline;
pub mod queue;

pub use crate::queue::blocking::{PutError, TryPutError};
pub use crate::queue::BoundedBlockingQueue;

/// Error types for FluxQ operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Queue construction was attempted with a capacity of zero
    InvalidCapacity,
    /// A bounded wait elapsed before the operation could complete
    Timeout,
    /// The queue has been closed (and, for `get`, fully drained)
    Closed,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidCapacity => write!(f, "Capacity must be greater than 0"),
            Error::Timeout => write!(f, "Operation timed out"),
            Error::Closed => write!(f, "Queue is closed"),
        }
    }
}

impl std::error::Error for Error {}

/// Result type for FluxQ operations
pub type Result<T> = core::result::Result<T, Error>;
