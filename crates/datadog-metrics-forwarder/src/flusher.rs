// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{error, info};

use crate::buffer::PointBuffer;
use crate::intake::IntakeApi;
use crate::point::DataPoint;
use crate::stats::QueueStats;
use crate::util::now_unix;

/// Why a batch could not be delivered.
#[derive(Debug)]
pub enum ShippingError {
    /// The batch could not be serialized. Retrying cannot succeed.
    Payload(String),
    /// The request failed in transit, before a usable response arrived.
    Destination(Option<StatusCode>, String),
}

/// The sole consumer of the shared buffer.
///
/// Repeatedly removes a batch-sized prefix, ships it, and on failure feeds
/// still-fresh points back into the inbound channel while dropping points
/// older than the staleness window. At most one send is in flight at a time.
pub struct Flusher {
    buffer: Arc<PointBuffer>,
    intake: IntakeApi,
    inbound: mpsc::UnboundedSender<DataPoint>,
    stats: Arc<QueueStats>,
    batch_size: usize,
    stale_after: Duration,
    failure_backoff: Duration,
    idle_poll: Duration,
}

pub struct FlusherConfig {
    pub buffer: Arc<PointBuffer>,
    pub intake: IntakeApi,
    pub inbound: mpsc::UnboundedSender<DataPoint>,
    pub stats: Arc<QueueStats>,
    pub batch_size: usize,
    pub stale_after: Duration,
    pub failure_backoff: Duration,
    pub idle_poll: Duration,
}

impl Flusher {
    pub fn new(config: FlusherConfig) -> Self {
        Flusher {
            buffer: config.buffer,
            intake: config.intake,
            inbound: config.inbound,
            stats: config.stats,
            batch_size: config.batch_size,
            stale_after: config.stale_after,
            failure_backoff: config.failure_backoff,
            idle_poll: config.idle_poll,
        }
    }

    /// Runs for the lifetime of the queue.
    pub async fn run(self) {
        loop {
            let (batch, remaining) = self.buffer.take_batch(self.batch_size);
            if batch.is_empty() {
                sleep(self.idle_poll).await;
                continue;
            }
            info!("sending: {}, remaining: {}", batch.len(), remaining);
            if !self.send_batch(batch).await {
                sleep(self.failure_backoff).await;
            }
        }
    }

    /// Ships one batch. Returns false when the caller should back off
    /// before the next attempt.
    async fn send_batch(&self, batch: Vec<DataPoint>) -> bool {
        let size = batch.len();
        match self.intake.ship_points(&batch).await {
            Ok(response) if response.status() == StatusCode::NO_CONTENT => {
                self.stats.incr_sent(size as u64);
                info!("sent {}", size);
                true
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                if body.is_empty() {
                    error!("intake returned {}", status);
                } else {
                    error!("intake returned {}: {}", status, body);
                }
                self.restore_batch(batch);
                false
            }
            Err(ShippingError::Payload(msg)) => {
                // bad encoding will never succeed, give up on the batch
                error!("failed to serialize batch of {}: {}", size, msg);
                true
            }
            Err(ShippingError::Destination(status, msg)) => {
                match status {
                    Some(status) => error!("failed to reach intake ({}): {}", status, msg),
                    None => error!("failed to reach intake: {}", msg),
                }
                self.restore_batch(batch);
                false
            }
        }
    }

    /// Feeds fresh points back into the inbound channel and drops points
    /// older than the staleness window.
    fn restore_batch(&self, batch: Vec<DataPoint>) {
        let cutoff = now_unix() - self.stale_after.as_secs() as i64;
        let mut old = 0;
        let mut restored = 0;
        for point in batch {
            if point.timestamp < cutoff {
                old += 1;
                continue;
            }
            if let Err(e) = self.inbound.send(point) {
                error!("failed to restore point for retry: {}", e);
                continue;
            }
            restored += 1;
        }
        if old > 0 {
            info!("removed {} old records", old);
        }
        info!("restored {}, sleeping {:?}", restored, self.failure_backoff);
    }
}
