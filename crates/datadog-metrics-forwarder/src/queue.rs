// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Queue wiring: admission control plus the three background tasks.
//!
//! [`DeliveryQueue::start`] spawns the memory monitor, the ingestion task,
//! and the send loop, then returns an already-running queue. There is no
//! shutdown path; the tasks live until the process exits, and anything still
//! buffered at that point is lost.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use crate::buffer::PointBuffer;
use crate::config::QueueConfig;
use crate::errors::Creation;
use crate::flusher::{Flusher, FlusherConfig};
use crate::intake::IntakeApi;
use crate::memory::{MemoryMonitor, MemorySample, ProcessMemoryReader};
use crate::point::DataPoint;
use crate::stats::QueueStats;

/// Drains the inbound channel into the shared buffer, shedding points while
/// the last memory sample is over the ceiling.
struct Ingestor {
    rx: mpsc::UnboundedReceiver<DataPoint>,
    buffer: Arc<PointBuffer>,
    sample: MemorySample,
    memory_ceiling_bytes: u64,
    stats: Arc<QueueStats>,
}

impl Ingestor {
    async fn run(mut self) {
        while let Some(point) = self.rx.recv().await {
            self.admit(point);
        }
        debug!("inbound channel closed, ingestion stopped");
    }

    fn admit(&self, point: DataPoint) {
        // Best-effort shedding: the sample may be up to one monitor
        // interval stale.
        if self.sample.bytes() > self.memory_ceiling_bytes {
            self.stats.incr_dropped(1);
            return;
        }
        self.buffer.push(point);
    }
}

/// An active delivery queue.
///
/// Producers write [`DataPoint`]s into the inbound channel handed to
/// [`DeliveryQueue::start`]; the channel never applies backpressure, so
/// overload shows up as shed points in the stats rather than slower
/// producers.
pub struct DeliveryQueue {
    buffer: Arc<PointBuffer>,
    sample: MemorySample,
    stats: Arc<QueueStats>,
}

impl DeliveryQueue {
    /// Validates the configuration and starts the background tasks.
    ///
    /// Takes both halves of the inbound channel: the receiver becomes the
    /// ingestion task's input, and the sender carries failed points back for
    /// re-ingestion. Producers keep their own clones of the sender.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        config: QueueConfig,
        stats: Arc<QueueStats>,
        inbound_tx: mpsc::UnboundedSender<DataPoint>,
        inbound_rx: mpsc::UnboundedReceiver<DataPoint>,
    ) -> Result<Self, Creation> {
        config.validate()?;
        let endpoint = config.endpoint()?;
        let intake = IntakeApi::new(endpoint, config.request_timeout)?;
        let reader = ProcessMemoryReader::new().map_err(Creation::MemoryReader)?;

        let buffer = Arc::new(PointBuffer::new());
        let sample = MemorySample::new();

        let monitor = MemoryMonitor::new(
            Box::new(reader),
            sample.clone(),
            Arc::clone(&buffer),
            config.monitor_interval,
            config.memory_ceiling_bytes,
        );
        tokio::spawn(monitor.run());

        let ingestor = Ingestor {
            rx: inbound_rx,
            buffer: Arc::clone(&buffer),
            sample: sample.clone(),
            memory_ceiling_bytes: config.memory_ceiling_bytes,
            stats: Arc::clone(&stats),
        };
        tokio::spawn(ingestor.run());

        let flusher = Flusher::new(FlusherConfig {
            buffer: Arc::clone(&buffer),
            intake,
            inbound: inbound_tx,
            stats: Arc::clone(&stats),
            batch_size: config.batch_size,
            stale_after: config.stale_after,
            failure_backoff: config.failure_backoff,
            idle_poll: config.idle_poll,
        });
        tokio::spawn(flusher.run());

        debug!("delivery queue started toward {}", config.destination_url);
        Ok(Self {
            buffer,
            sample,
            stats,
        })
    }

    /// Number of points currently awaiting delivery.
    pub fn queued(&self) -> usize {
        self.buffer.depth()
    }

    /// Handle to the monitor's last memory sample.
    pub fn memory_sample(&self) -> &MemorySample {
        &self.sample
    }

    /// The counter sink this queue reports into.
    pub fn stats(&self) -> &Arc<QueueStats> {
        &self.stats
    }
}
