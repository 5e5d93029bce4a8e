//! Property-based tests for the blocking queue using proptest
//!
//! These tests verify that the queue maintains its FIFO and capacity
//! invariants under arbitrary operation sequences and thread counts.

use crate::queue::BoundedBlockingQueue;
use crate::Error;
use proptest::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Property: FIFO ordering and capacity bounds in a single thread
mod sequential_properties {
    use super::*;

    proptest! {
        #[test]
        fn test_fifo_law(
            capacity in 1usize..64,
            values in prop::collection::vec(any::<i32>(), 1..64)
        ) {
            let queue = BoundedBlockingQueue::new(capacity).unwrap();
            let accepted: Vec<i32> = values
                .iter()
                .copied()
                .take(capacity)
                .collect();

            // put(x1)..put(xk) with k <= capacity never blocks
            for &value in &accepted {
                prop_assert!(queue.try_put(value).is_ok());
            }

            // k gets return x1..xk in that exact order
            for &expected in &accepted {
                prop_assert_eq!(queue.get_timeout(Duration::from_millis(10)), Ok(expected));
            }
            prop_assert!(queue.is_empty());
        }

        #[test]
        fn test_capacity_invariant(
            capacity in 1usize..50,
            values in prop::collection::vec(any::<i32>(), 1..100)
        ) {
            let queue = BoundedBlockingQueue::new(capacity).unwrap();
            let mut successful_puts = 0;

            for &value in &values {
                if queue.try_put(value).is_ok() {
                    successful_puts += 1;
                }
                prop_assert!(queue.len() <= capacity);
            }

            prop_assert_eq!(queue.len(), successful_puts.min(capacity));

            let mut drained = 0;
            while queue.try_get().is_some() {
                drained += 1;
            }
            prop_assert_eq!(drained, successful_puts);
        }

        #[test]
        fn test_len_tracks_operations(
            capacity in 1usize..50,
            operations in prop::collection::vec(prop::bool::weighted(0.7), 1..100)
        ) {
            let queue = BoundedBlockingQueue::new(capacity).unwrap();
            let mut expected_len = 0usize;
            let mut counter = 0;

            for &should_put in &operations {
                if should_put {
                    if queue.try_put(counter).is_ok() {
                        expected_len += 1;
                    }
                    counter += 1;
                } else if queue.try_get().is_some() {
                    expected_len -= 1;
                }

                // Single-threaded, so len is exact here
                prop_assert_eq!(queue.len(), expected_len);
                prop_assert!(expected_len <= capacity);
                prop_assert_eq!(queue.is_empty(), expected_len == 0);
                prop_assert_eq!(queue.is_full(), expected_len == capacity);
            }
        }

        #[test]
        fn test_round_trip_restores_empty(value in any::<i64>()) {
            let queue = BoundedBlockingQueue::new(1).unwrap();
            queue.put(value).unwrap();
            prop_assert_eq!(queue.get(), Ok(value));
            prop_assert_eq!(queue.len(), 0);
        }

        #[test]
        fn test_close_drains_in_order(
            values in prop::collection::vec(any::<i32>(), 1..32)
        ) {
            let queue = BoundedBlockingQueue::new(values.len()).unwrap();
            for &value in &values {
                queue.put(value).unwrap();
            }
            queue.close();

            for &expected in &values {
                prop_assert_eq!(queue.get(), Ok(expected));
            }
            prop_assert_eq!(queue.get(), Err(Error::Closed));
        }
    }
}

/// Property: concurrent transfers lose and duplicate nothing
mod concurrent_properties {
    use super::*;

    proptest! {
        // Thread spawning is expensive; keep the case count modest.
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn test_concurrent_transfer(
            num_producers in 1usize..4,
            num_consumers in 1usize..4,
            items_per_producer in 1usize..50,
            capacity in 1usize..16
        ) {
            let queue = Arc::new(BoundedBlockingQueue::<usize>::new(capacity).unwrap());
            let mut handles = vec![];

            for producer_id in 0..num_producers {
                let queue = Arc::clone(&queue);
                handles.push(thread::spawn(move || {
                    for i in 0..items_per_producer {
                        queue.put(producer_id * items_per_producer + i).unwrap();
                    }
                }));
            }

            let mut consumer_handles = vec![];
            for _ in 0..num_consumers {
                let queue = Arc::clone(&queue);
                consumer_handles.push(thread::spawn(move || {
                    let mut received = Vec::new();
                    while let Ok(value) = queue.get() {
                        received.push(value);
                    }
                    received
                }));
            }

            for handle in handles {
                handle.join().unwrap();
            }
            queue.close();

            let mut all_received = Vec::new();
            for handle in consumer_handles {
                all_received.extend(handle.join().unwrap());
            }

            let expected_total = num_producers * items_per_producer;
            prop_assert_eq!(all_received.len(), expected_total);

            // Every produced value shows up exactly once
            all_received.sort_unstable();
            for (i, &value) in all_received.iter().enumerate() {
                prop_assert_eq!(value, i);
            }
        }
    }
}
