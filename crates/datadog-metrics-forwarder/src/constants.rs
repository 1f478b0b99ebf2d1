// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Maximum number of points shipped in one request.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Resident-set ceiling above which incoming points are shed.
pub const DEFAULT_MEMORY_CEILING_BYTES: u64 = 100 * 1024 * 1024;

/// Cadence at which the memory monitor refreshes its sample.
pub const DEFAULT_MONITOR_INTERVAL_SECS: u64 = 60;

/// Age beyond which an undelivered point is dropped instead of retried.
pub const DEFAULT_STALE_AFTER_SECS: u64 = 30 * 60;

/// Pause after a failed send before the next attempt.
pub const DEFAULT_FAILURE_BACKOFF_SECS: u64 = 5;

/// Pause between buffer checks while there is nothing to send.
pub const DEFAULT_IDLE_POLL_SECS: u64 = 1;

/// Per-request timeout on the intake HTTP client.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
