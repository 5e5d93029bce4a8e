//! Queue implementations
//!
//! This module provides the crate's core data structure, a bounded blocking
//! FIFO queue for producer-consumer coordination.
//!
//! ## Available Queues
//!
//! - [`BoundedBlockingQueue`]: Capacity-limited, mutex/condvar based MPMC
//!   queue with blocking, timed, and non-blocking operations
//!
//! ## Semantics at a Glance
//!
//! | Operation | Full queue | Empty queue | Closed queue |
//! |-----------|------------|-------------|--------------|
//! | `put` | blocks | - | fails |
//! | `put_timeout` | blocks, then fails | - | fails |
//! | `try_put` | fails | - | fails |
//! | `get` | - | blocks | drains, then fails |
//! | `get_timeout` | - | blocks, then fails | drains, then fails |
//! | `try_get` | - | `None` | drains, then `None` |
//!
//! ## Examples
//!
//! ```rust
//! use fluxq::queue::BoundedBlockingQueue;
//! use std::time::Duration;
//!
//! let queue = BoundedBlockingQueue::new(16)?;
//! queue.put("job")?;
//! assert_eq!(queue.get_timeout(Duration::from_secs(1))?, "job");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod blocking;

// Re-export main types for convenience
pub use blocking::{BoundedBlockingQueue, PutError, TryPutError};


#[cfg(test)]
mod proptests;
