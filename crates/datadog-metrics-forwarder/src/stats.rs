// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::{AtomicU64, Ordering};

/// Delivery counters, shared between the queue tasks and the embedding
/// process.
///
/// Passed to the queue at construction rather than living in process-global
/// state, so multiple queues can be observed independently and tests can
/// assert on exact counts.
#[derive(Debug, Default)]
pub struct QueueStats {
    sent: AtomicU64,
    dropped: AtomicU64,
}

impl QueueStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points successfully delivered to the intake endpoint.
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    /// Points shed at ingestion because of memory pressure.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn incr_sent(&self, count: u64) {
        self.sent.fetch_add(count, Ordering::Relaxed);
    }

    pub fn incr_dropped(&self, count: u64) {
        self.dropped.fetch_add(count, Ordering::Relaxed);
    }
}
