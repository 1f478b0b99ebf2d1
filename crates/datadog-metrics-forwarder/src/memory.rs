// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Process memory monitoring.
//!
//! A background task samples the resident set on a fixed cadence and
//! publishes the last value through [`MemorySample`]. The ingestion side
//! reads that sample without any lock; a reading up to one interval stale is
//! acceptable for coarse admission control, so both sides treat it as a
//! plain numeric snapshot (relaxed atomic load/store).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::{debug, warn};

use crate::buffer::PointBuffer;

/// Last sampled resident size, shared across tasks without synchronization
/// beyond the atomic cell itself.
#[derive(Clone, Debug, Default)]
pub struct MemorySample {
    bytes: Arc<AtomicU64>,
}

impl MemorySample {
    pub fn new() -> Self {
        Self::default()
    }

    /// Possibly-stale resident size in bytes.
    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }

    pub fn record(&self, bytes: u64) {
        self.bytes.store(bytes, Ordering::Relaxed);
    }
}

/// Source of resident-set readings for the current process.
pub trait MemoryStatsReader: Send {
    /// Resident size in bytes, or `None` when the platform gives no answer.
    fn read(&mut self) -> Option<u64>;
}

/// Reads the current process's resident set through `sysinfo`.
pub struct ProcessMemoryReader {
    system: System,
    pid: Pid,
}

impl ProcessMemoryReader {
    pub fn new() -> Result<Self, String> {
        let pid = sysinfo::get_current_pid().map_err(|e| e.to_string())?;
        Ok(Self {
            system: System::new(),
            pid,
        })
    }
}

impl MemoryStatsReader for ProcessMemoryReader {
    fn read(&mut self) -> Option<u64> {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[self.pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        self.system.process(self.pid).map(|process| process.memory())
    }
}

/// Background task that keeps [`MemorySample`] fresh and reacts to the
/// process exceeding its memory ceiling.
pub struct MemoryMonitor {
    reader: Box<dyn MemoryStatsReader>,
    sample: MemorySample,
    buffer: Arc<PointBuffer>,
    interval: Duration,
    ceiling_bytes: u64,
}

impl MemoryMonitor {
    pub fn new(
        reader: Box<dyn MemoryStatsReader>,
        sample: MemorySample,
        buffer: Arc<PointBuffer>,
        interval: Duration,
        ceiling_bytes: u64,
    ) -> Self {
        Self {
            reader,
            sample,
            buffer,
            interval,
            ceiling_bytes,
        }
    }

    /// Runs for the lifetime of the queue.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            self.observe();
        }
    }

    fn observe(&mut self) {
        let Some(resident) = self.reader.read() else {
            debug!("could not read process memory, keeping previous sample");
            return;
        };
        self.sample.record(resident);
        if resident > self.ceiling_bytes {
            warn!(
                "resident memory {} over ceiling {}, releasing spare buffer capacity",
                resident, self.ceiling_bytes
            );
            self.buffer.reclaim();
        }
    }
}
