//! Producer-consumer pipeline helpers
//!
//! Thin wrappers for the classic pipeline shape: a read-once [`ItemSource`]
//! feeding N producer threads, a shared [`BoundedBlockingQueue`] in the
//! middle, and M consumer threads appending to an [`ItemSink`].
//!
//! The queue is the only coordination channel between producers and
//! consumers. Shutdown is driven by the queue's `close`, not by sentinel
//! values or stop flags: the [`Pipeline`] runner joins the producers, closes
//! the queue, and the consumers drain the remainder and exit on their own.
//!
//! ## Example
//!
//! ```rust
//! use fluxq::pipeline::Pipeline;
//!
//! let items: Vec<u32> = (0..100).collect();
//! let report = Pipeline::new(8).producers(2).consumers(3).run(items)?;
//!
//! assert_eq!(report.produced, 100);
//! assert_eq!(report.consumed, 100);
//! # Ok::<(), fluxq::Error>(())
//! ```

mod sink;
mod source;
mod worker;

pub use sink::ItemSink;
pub use source::ItemSource;
pub use worker::{spawn_consumer, spawn_producer, Pipeline, PipelineReport};
