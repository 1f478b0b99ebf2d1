// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Errors that can occur while constructing a delivery queue
#[derive(Debug, thiserror::Error)]
pub enum Creation {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("failed to locate current process for memory sampling: {0}")]
    MemoryReader(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = Creation::InvalidConfig("batch size must be greater than 0".to_string());
        assert_eq!(
            error.to_string(),
            "invalid configuration: batch size must be greater than 0"
        );
    }

    #[test]
    fn test_error_debug() {
        let error = Creation::MemoryReader("unsupported platform".to_string());
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("MemoryReader"));
    }
}
