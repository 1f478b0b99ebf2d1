// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Current wall-clock time as whole seconds since the Unix epoch.
///
/// Returns 0 if the system clock reads before the epoch.
pub fn now_unix() -> i64 {
    std::time::UNIX_EPOCH
        .elapsed()
        .map_or(0, |elapsed| elapsed.as_secs() as i64)
}
