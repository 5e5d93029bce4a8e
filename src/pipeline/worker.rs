//! Producer and consumer worker threads
//!
//! Workers coordinate through the queue alone. A producer drains its source
//! and exits; a consumer loops on `get` until the queue reports closed.
//! There are no stop flags and no sentinel items: the pipeline runner closes
//! the queue once every producer has finished, which releases all consumers
//! after the buffer drains.

use crate::pipeline::{ItemSink, ItemSource};
use crate::queue::BoundedBlockingQueue;
use crate::Result;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Spawn a producer thread that drains `source` into `queue`.
///
/// Returns a handle yielding the number of items produced. The producer
/// stops early, without error, if the queue is closed underneath it.
pub fn spawn_producer<T: Send + 'static>(
    name: String,
    source: Arc<ItemSource<T>>,
    queue: Arc<BoundedBlockingQueue<T>>,
) -> JoinHandle<usize> {
    thread::spawn(move || {
        let span = tracing::info_span!("producer", worker = %name);
        let _guard = span.enter();

        let mut produced = 0;
        while let Some(item) = source.next() {
            match queue.put(item) {
                Ok(()) => {
                    produced += 1;
                    tracing::trace!(produced, "item enqueued");
                }
                Err(_) => {
                    tracing::warn!(produced, "queue closed before source drained");
                    break;
                }
            }
        }

        tracing::info!(produced, "producer finished");
        produced
    })
}

/// Spawn a consumer thread that drains `queue` into `sink`.
///
/// Returns a handle yielding the number of items consumed. The consumer
/// exits once the queue is closed and empty.
pub fn spawn_consumer<T: Send + 'static>(
    name: String,
    queue: Arc<BoundedBlockingQueue<T>>,
    sink: Arc<ItemSink<T>>,
) -> JoinHandle<usize> {
    thread::spawn(move || {
        let span = tracing::info_span!("consumer", worker = %name);
        let _guard = span.enter();

        let mut consumed = 0;
        while let Ok(item) = queue.get() {
            sink.push(item);
            consumed += 1;
            tracing::trace!(consumed, "item consumed");
        }

        tracing::info!(consumed, "consumer finished");
        consumed
    })
}

/// Outcome of a [`Pipeline`] run.
#[derive(Debug)]
pub struct PipelineReport<T> {
    /// Total items enqueued by all producers
    pub produced: usize,
    /// Total items dequeued by all consumers
    pub consumed: usize,
    /// Everything the consumers delivered, in sink append order
    pub items: Vec<T>,
}

/// A producer-consumer pipeline over one bounded blocking queue.
///
/// Spawns the configured number of producers and consumers, joins the
/// producers, closes the queue, then joins the consumers once they have
/// drained the remainder.
///
/// # Examples
///
/// ```rust
/// use fluxq::pipeline::Pipeline;
///
/// let report = Pipeline::new(4).producers(2).consumers(2).run(vec![1, 2, 3])?;
/// assert_eq!(report.consumed, 3);
/// # Ok::<(), fluxq::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    capacity: usize,
    producers: usize,
    consumers: usize,
}

impl Pipeline {
    /// Create a pipeline whose queue holds at most `capacity` items.
    ///
    /// Defaults to one producer and one consumer; capacity is validated
    /// when [`run`](Self::run) constructs the queue.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            producers: 1,
            consumers: 1,
        }
    }

    /// Set the number of producer threads (minimum 1).
    pub fn producers(mut self, count: usize) -> Self {
        self.producers = count.max(1);
        self
    }

    /// Set the number of consumer threads (minimum 1).
    pub fn consumers(mut self, count: usize) -> Self {
        self.consumers = count.max(1);
        self
    }

    /// Run the pipeline to completion over `items`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`](crate::Error::InvalidCapacity) if
    /// the configured capacity is zero.
    pub fn run<T: Send + 'static>(&self, items: Vec<T>) -> Result<PipelineReport<T>> {
        let queue = Arc::new(BoundedBlockingQueue::new(self.capacity)?);
        let source = Arc::new(ItemSource::new(items));
        let sink = Arc::new(ItemSink::new());

        tracing::info!(
            capacity = self.capacity,
            producers = self.producers,
            consumers = self.consumers,
            items = source.len(),
            "pipeline started"
        );

        let producer_handles: Vec<_> = (0..self.producers)
            .map(|id| {
                spawn_producer(
                    format!("producer-{id}"),
                    Arc::clone(&source),
                    Arc::clone(&queue),
                )
            })
            .collect();

        let consumer_handles: Vec<_> = (0..self.consumers)
            .map(|id| {
                spawn_consumer(
                    format!("consumer-{id}"),
                    Arc::clone(&queue),
                    Arc::clone(&sink),
                )
            })
            .collect();

        let mut produced = 0;
        for handle in producer_handles {
            produced += handle.join().expect("producer thread panicked");
        }

        // Producers are done; closing lets the consumers drain and exit.
        queue.close();

        let mut consumed = 0;
        for handle in consumer_handles {
            consumed += handle.join().expect("consumer thread panicked");
        }

        tracing::info!(produced, consumed, "pipeline finished");

        let items = match Arc::try_unwrap(sink) {
            Ok(sink) => sink.into_items(),
            Err(_) => unreachable!("sink still shared after consumers joined"),
        };

        Ok(PipelineReport {
            produced,
            consumed,
            items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_single_producer_single_consumer_preserves_order() {
        let items: Vec<i32> = (0..200).collect();
        let report = Pipeline::new(5).run(items.clone()).unwrap();

        assert_eq!(report.produced, 200);
        assert_eq!(report.consumed, 200);
        // One producer and one consumer means FIFO end to end.
        assert_eq!(report.items, items);
    }

    #[test]
    fn test_multi_producer_multi_consumer_loses_nothing() {
        let items: Vec<u64> = (0..1000).collect();
        let report = Pipeline::new(8)
            .producers(3)
            .consumers(4)
            .run(items)
            .unwrap();

        assert_eq!(report.produced, 1000);
        assert_eq!(report.consumed, 1000);

        let mut delivered = report.items;
        delivered.sort_unstable();
        assert_eq!(delivered, (0..1000).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_input() {
        let report = Pipeline::new(4).run(Vec::<i32>::new()).unwrap();
        assert_eq!(report.produced, 0);
        assert_eq!(report.consumed, 0);
        assert!(report.items.is_empty());
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        assert_eq!(
            Pipeline::new(0).run(vec![1]).unwrap_err(),
            Error::InvalidCapacity
        );
    }

    #[test]
    fn test_tiny_queue_under_wide_pipeline() {
        // Capacity 1 forces constant blocking on both sides.
        let report = Pipeline::new(1)
            .producers(4)
            .consumers(4)
            .run((0..400).collect::<Vec<i32>>())
            .unwrap();

        assert_eq!(report.produced, 400);
        assert_eq!(report.consumed, 400);
    }
}
