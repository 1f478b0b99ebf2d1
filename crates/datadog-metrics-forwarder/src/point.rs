// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The unit of delivery: one timestamped telemetry sample.
//!
//! A data point is immutable once created and opaque to the queue itself.
//! Only the serialization layer interprets its `value`; everything else
//! handles points positionally (buffer order) or by age (`timestamp`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::util::now_unix;

/// One telemetry sample destined for the remote store.
///
/// Wire form is a flat JSON object; a batch is shipped as a JSON array of
/// these objects:
///
/// ```json
/// {"metric": "sys.cpu.user", "timestamp": 1700000000, "value": 42.5, "tags": {"host": "web01"}}
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Metric name.
    pub metric: String,
    /// Creation time, whole seconds since the Unix epoch.
    pub timestamp: i64,
    /// Free-form payload, interpreted only by the intake endpoint.
    pub value: Value,
    /// Key/value dimensions attached by the producer.
    pub tags: HashMap<String, String>,
}

impl DataPoint {
    /// Creates a point stamped with the current wall clock.
    pub fn new(
        metric: impl Into<String>,
        value: impl Into<Value>,
        tags: HashMap<String, String>,
    ) -> Self {
        Self::with_timestamp(metric, value, now_unix(), tags)
    }

    /// Creates a point with an explicit creation time.
    pub fn with_timestamp(
        metric: impl Into<String>,
        value: impl Into<Value>,
        timestamp: i64,
        tags: HashMap<String, String>,
    ) -> Self {
        Self {
            metric: metric.into(),
            timestamp,
            value: value.into(),
            tags,
        }
    }
}
