//! HTTP Client Factory
//!
//! Provides a factory function for building reqwest clients with explicit
//! timeouts.

use std::time::Duration;

use super::types::{LlmError, LlmResult};

/// Connect timeout applied to every client
const CONNECT_TIMEOUT_SECS: u64 = 15;

/// Build a `reqwest::Client` whose every request is bounded by `timeout`.
pub fn build_http_client(timeout: Duration) -> LlmResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS).min(timeout))
        .user_agent(concat!("agent-stack/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| LlmError::Unsupported {
            message: format!("failed to build HTTP client: {}", e),
        })
}
