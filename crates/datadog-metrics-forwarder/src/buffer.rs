// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Shared FIFO of data points awaiting delivery.
//!
//! Exactly one lock guards the queue; both mutating operations are single
//! critical sections, so a batch can never contain a point that a concurrent
//! append is still writing, and no point is handed out twice. Length is only
//! reported from inside the lock, never as a separate check.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use crate::point::DataPoint;

/// Mutex-guarded FIFO buffer. Points are appended at the tail and removed
/// as a prefix, preserving arrival order for partial retries.
#[derive(Debug, Default)]
pub struct PointBuffer {
    inner: Mutex<VecDeque<DataPoint>>,
}

impl PointBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a point at the tail.
    pub fn push(&self, point: DataPoint) {
        self.lock().push_back(point);
    }

    /// Atomically removes up to `max` points from the head.
    ///
    /// Returns the batch and the depth remaining after removal, both
    /// observed under the same lock acquisition.
    pub fn take_batch(&self, max: usize) -> (Vec<DataPoint>, usize) {
        let mut queue = self.lock();
        let take = max.min(queue.len());
        let batch = queue.drain(..take).collect();
        (batch, queue.len())
    }

    /// Number of points currently buffered.
    pub fn depth(&self) -> usize {
        self.lock().len()
    }

    /// Returns spare capacity to the allocator.
    pub fn reclaim(&self) {
        self.lock().shrink_to_fit();
    }

    #[allow(clippy::expect_used)]
    fn lock(&self) -> MutexGuard<'_, VecDeque<DataPoint>> {
        self.inner.lock().expect("lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn numbered_point(n: u32) -> DataPoint {
        DataPoint::with_timestamp(format!("test.metric.{n}"), json!(n), n as i64, HashMap::new())
    }

    fn number(point: &DataPoint) -> u32 {
        point.value.as_u64().expect("numeric value") as u32
    }

    #[test]
    fn test_take_batch_empty() {
        let buffer = PointBuffer::new();
        let (batch, remaining) = buffer.take_batch(50);
        assert!(batch.is_empty());
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_take_batch_caps_at_max() {
        let buffer = PointBuffer::new();
        for n in 0..120 {
            buffer.push(numbered_point(n));
        }

        let (batch, remaining) = buffer.take_batch(50);
        assert_eq!(batch.len(), 50);
        assert_eq!(remaining, 70);
        assert_eq!(buffer.depth(), 70);
    }

    #[test]
    fn test_take_batch_returns_all_when_fewer_than_max() {
        let buffer = PointBuffer::new();
        for n in 0..3 {
            buffer.push(numbered_point(n));
        }

        let (batch, remaining) = buffer.take_batch(50);
        assert_eq!(batch.len(), 3);
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_fifo_order_across_batches() {
        let buffer = PointBuffer::new();
        for n in 0..10 {
            buffer.push(numbered_point(n));
        }

        let mut drained = Vec::new();
        loop {
            let (batch, _) = buffer.take_batch(4);
            if batch.is_empty() {
                break;
            }
            drained.extend(batch);
        }

        let order: Vec<u32> = drained.iter().map(number).collect();
        assert_eq!(order, (0..10).collect::<Vec<u32>>());
    }

    #[test]
    fn test_reclaim_keeps_contents() {
        let buffer = PointBuffer::new();
        for n in 0..500 {
            buffer.push(numbered_point(n));
        }
        buffer.take_batch(450);
        buffer.reclaim();

        assert_eq!(buffer.depth(), 50);
        let (batch, _) = buffer.take_batch(1);
        assert_eq!(number(&batch[0]), 450);
    }

    #[test]
    fn test_concurrent_push_and_take_loses_nothing() {
        const PRODUCERS: u32 = 4;
        const PER_PRODUCER: u32 = 250;

        let buffer = Arc::new(PointBuffer::new());

        let consumer = {
            let buffer = Arc::clone(&buffer);
            std::thread::spawn(move || {
                let total = (PRODUCERS * PER_PRODUCER) as usize;
                let mut seen = Vec::with_capacity(total);
                while seen.len() < total {
                    let (batch, _) = buffer.take_batch(16);
                    if batch.is_empty() {
                        std::thread::yield_now();
                        continue;
                    }
                    seen.extend(batch);
                }
                seen
            })
        };

        let producers: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let buffer = Arc::clone(&buffer);
                std::thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        buffer.push(numbered_point(p * PER_PRODUCER + i));
                    }
                })
            })
            .collect();

        for handle in producers {
            handle.join().expect("producer panicked");
        }
        let seen = consumer.join().expect("consumer panicked");

        // every point delivered exactly once
        let mut ids: Vec<u32> = seen.iter().map(number).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..PRODUCERS * PER_PRODUCER).collect::<Vec<u32>>());
        assert_eq!(buffer.depth(), 0);
    }

    proptest! {
        #[test]
        fn prop_batches_concatenate_to_input(
            values in proptest::collection::vec(any::<u32>(), 0..200),
            max in 1usize..64,
        ) {
            let buffer = PointBuffer::new();
            for value in &values {
                buffer.push(numbered_point(*value));
            }

            let mut drained = Vec::new();
            loop {
                let (batch, _) = buffer.take_batch(max);
                prop_assert!(batch.len() <= max);
                if batch.is_empty() {
                    break;
                }
                drained.extend(batch);
            }

            let order: Vec<u32> = drained.iter().map(number).collect();
            prop_assert_eq!(order, values);
        }
    }
}
