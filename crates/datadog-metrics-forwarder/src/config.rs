// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use reqwest::Url;
use std::time::Duration;

use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_FAILURE_BACKOFF_SECS, DEFAULT_IDLE_POLL_SECS,
    DEFAULT_MEMORY_CEILING_BYTES, DEFAULT_MONITOR_INTERVAL_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_STALE_AFTER_SECS,
};
use crate::errors::Creation;

/// Configuration for a delivery queue
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Full URL of the intake route batches are POSTed to
    pub destination_url: String,
    /// Maximum number of points shipped in one request
    pub batch_size: usize,
    /// Resident-set ceiling above which incoming points are shed
    pub memory_ceiling_bytes: u64,
    /// How often the memory monitor refreshes its sample
    pub monitor_interval: Duration,
    /// Age beyond which an undelivered point is dropped instead of retried
    pub stale_after: Duration,
    /// Pause after a failed send before the next attempt
    pub failure_backoff: Duration,
    /// Pause between buffer checks while there is nothing to send
    pub idle_poll: Duration,
    /// Per-request timeout on the intake HTTP client
    pub request_timeout: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            destination_url: String::new(),
            batch_size: DEFAULT_BATCH_SIZE,
            memory_ceiling_bytes: DEFAULT_MEMORY_CEILING_BYTES,
            monitor_interval: Duration::from_secs(DEFAULT_MONITOR_INTERVAL_SECS),
            stale_after: Duration::from_secs(DEFAULT_STALE_AFTER_SECS),
            failure_backoff: Duration::from_secs(DEFAULT_FAILURE_BACKOFF_SECS),
            idle_poll: Duration::from_secs(DEFAULT_IDLE_POLL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl QueueConfig {
    /// Default tunables with the given destination
    pub fn new(destination_url: impl Into<String>) -> Self {
        Self {
            destination_url: destination_url.into(),
            ..Self::default()
        }
    }

    /// Parses and checks the destination URL
    pub fn endpoint(&self) -> Result<Url, Creation> {
        if self.destination_url.trim().is_empty() {
            return Err(Creation::InvalidConfig(
                "destination URL cannot be empty".to_string(),
            ));
        }
        let url = Url::parse(&self.destination_url).map_err(|e| {
            Creation::InvalidConfig(format!(
                "invalid destination URL '{}': {}",
                self.destination_url, e
            ))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Creation::InvalidConfig(format!(
                "destination URL scheme must be http or https, got '{}'",
                url.scheme()
            )));
        }
        Ok(url)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), Creation> {
        self.endpoint()?;
        if self.batch_size == 0 {
            return Err(Creation::InvalidConfig(
                "batch size must be greater than 0".to_string(),
            ));
        }
        if self.stale_after.is_zero() {
            return Err(Creation::InvalidConfig(
                "staleness window must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
