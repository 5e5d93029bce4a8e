//! Queue Operation Metrics
//!
//! Standardized operation counters for the blocking queue. The counters give
//! insight into throughput, timeout pressure, and how often callers actually
//! had to block, without affecting the hot path: everything is a relaxed
//! atomic update, taken outside the queue's lock wherever possible.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// A point-in-time snapshot of queue operation metrics.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueueMetrics {
    /// Items successfully enqueued
    pub enqueued: u64,
    /// Items successfully dequeued
    pub dequeued: u64,
    /// `put` calls that failed with a timeout
    pub put_timeouts: u64,
    /// `get` calls that failed with a timeout
    pub get_timeouts: u64,
    /// `put` calls that had to block before completing or failing
    pub blocked_puts: u64,
    /// `get` calls that had to block before completing or failing
    pub blocked_gets: u64,
    /// Total time spent blocked across all operations, in nanoseconds
    pub total_block_time_ns: u64,
    /// Longest single blocked wait, in nanoseconds
    pub max_block_time_ns: u64,
}

impl QueueMetrics {
    /// Fraction of blocking operations that ended in a timeout, as a
    /// percentage. Zero when nothing has blocked yet.
    pub fn timeout_rate(&self) -> f64 {
        let blocked = self.blocked_puts + self.blocked_gets;
        if blocked == 0 {
            0.0
        } else {
            let timeouts = self.put_timeouts + self.get_timeouts;
            (timeouts as f64 / blocked as f64) * 100.0
        }
    }

    /// Average time an operation spent blocked.
    pub fn avg_block_time(&self) -> Duration {
        let blocked = self.blocked_puts + self.blocked_gets;
        if blocked == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(self.total_block_time_ns / blocked)
        }
    }

    /// Longest single blocked wait.
    pub fn max_block_time(&self) -> Duration {
        Duration::from_nanos(self.max_block_time_ns)
    }

    /// Items enqueued but not yet dequeued according to the counters.
    ///
    /// Advisory: counters are updated independently of each other, so this
    /// can briefly disagree with the queue's own `len`.
    pub fn in_flight(&self) -> u64 {
        self.enqueued.saturating_sub(self.dequeued)
    }
}

/// Internal atomic metrics collection.
#[derive(Debug, Default)]
pub struct AtomicMetrics {
    enqueued: AtomicU64,
    dequeued: AtomicU64,
    put_timeouts: AtomicU64,
    get_timeouts: AtomicU64,
    blocked_puts: AtomicU64,
    blocked_gets: AtomicU64,
    total_block_time_ns: AtomicU64,
    max_block_time_ns: AtomicU64,
}

impl AtomicMetrics {
    /// Record a successful enqueue.
    pub fn record_enqueue(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful dequeue.
    pub fn record_dequeue(&self) {
        self.dequeued.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a `put` that failed with a timeout.
    pub fn record_put_timeout(&self) {
        self.put_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a `get` that failed with a timeout.
    pub fn record_get_timeout(&self) {
        self.get_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a `put` that found the queue full and had to wait.
    pub fn record_blocked_put(&self) {
        self.blocked_puts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a `get` that found the queue empty and had to wait.
    pub fn record_blocked_get(&self) {
        self.blocked_gets.fetch_add(1, Ordering::Relaxed);
    }

    /// Record how long an operation spent blocked.
    pub fn record_block_time(&self, duration: Duration) {
        let duration_ns = duration.as_nanos() as u64;
        self.total_block_time_ns
            .fetch_add(duration_ns, Ordering::Relaxed);

        // Update the max if this wait was longer.
        let mut current_max = self.max_block_time_ns.load(Ordering::Relaxed);
        while duration_ns > current_max {
            match self.max_block_time_ns.compare_exchange_weak(
                current_max,
                duration_ns,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(x) => current_max = x,
            }
        }
    }

    /// Get a consistent-enough snapshot of the counters.
    pub fn snapshot(&self) -> QueueMetrics {
        QueueMetrics {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            dequeued: self.dequeued.load(Ordering::Relaxed),
            put_timeouts: self.put_timeouts.load(Ordering::Relaxed),
            get_timeouts: self.get_timeouts.load(Ordering::Relaxed),
            blocked_puts: self.blocked_puts.load(Ordering::Relaxed),
            blocked_gets: self.blocked_gets.load(Ordering::Relaxed),
            total_block_time_ns: self.total_block_time_ns.load(Ordering::Relaxed),
            max_block_time_ns: self.max_block_time_ns.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.enqueued.store(0, Ordering::Relaxed);
        self.dequeued.store(0, Ordering::Relaxed);
        self.put_timeouts.store(0, Ordering::Relaxed);
        self.get_timeouts.store(0, Ordering::Relaxed);
        self.blocked_puts.store(0, Ordering::Relaxed);
        self.blocked_gets.store(0, Ordering::Relaxed);
        self.total_block_time_ns.store(0, Ordering::Relaxed);
        self.max_block_time_ns.store(0, Ordering::Relaxed);
    }
}

/// Trait for queues that expose operation metrics.
pub trait MetricsCollector {
    /// Get a snapshot of the current metrics.
    fn metrics(&self) -> QueueMetrics;

    /// Reset all metrics to zero.
    fn reset_metrics(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = AtomicMetrics::default();
        metrics.record_enqueue();
        metrics.record_enqueue();
        metrics.record_dequeue();
        metrics.record_blocked_get();
        metrics.record_get_timeout();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.enqueued, 2);
        assert_eq!(snapshot.dequeued, 1);
        assert_eq!(snapshot.blocked_gets, 1);
        assert_eq!(snapshot.get_timeouts, 1);
        assert_eq!(snapshot.in_flight(), 1);
    }

    #[test]
    fn test_block_time_tracks_max() {
        let metrics = AtomicMetrics::default();
        metrics.record_blocked_put();
        metrics.record_block_time(Duration::from_millis(2));
        metrics.record_blocked_put();
        metrics.record_block_time(Duration::from_millis(5));
        metrics.record_blocked_put();
        metrics.record_block_time(Duration::from_millis(1));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.max_block_time(), Duration::from_millis(5));
        assert_eq!(
            snapshot.total_block_time_ns,
            Duration::from_millis(8).as_nanos() as u64
        );
    }

    #[test]
    fn test_timeout_rate() {
        let metrics = AtomicMetrics::default();
        assert_eq!(metrics.snapshot().timeout_rate(), 0.0);

        metrics.record_blocked_put();
        metrics.record_blocked_put();
        metrics.record_blocked_get();
        metrics.record_blocked_get();
        metrics.record_put_timeout();

        assert_eq!(metrics.snapshot().timeout_rate(), 25.0);
    }

    #[test]
    fn test_reset() {
        let metrics = AtomicMetrics::default();
        metrics.record_enqueue();
        metrics.record_block_time(Duration::from_millis(1));
        metrics.reset();
        assert_eq!(metrics.snapshot(), QueueMetrics::default());
    }
}
