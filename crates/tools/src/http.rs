//! Shared HTTP plumbing for the adapters.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::{ToolError, ToolResult};

/// Default per-call timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const CONNECT_TIMEOUT_SECS: u64 = 15;

/// Longest slice of an error body carried into an error message
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Build a `reqwest::Client` bounded by `timeout`.
pub fn build_http_client(timeout: Duration) -> ToolResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS).min(timeout))
        .user_agent(concat!("agent-stack/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ToolError::invalid_config("http", format!("failed to build HTTP client: {}", e)))
}

/// Send a request and decode a JSON body, mapping non-2xx to `ToolError::Provider`.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    tool: &str,
) -> ToolResult<T> {
    let response = request.send().await.map_err(|e| ToolError::network(tool, e))?;
    let status = response.status();
    let body = response.text().await.map_err(|e| ToolError::network(tool, e))?;

    if !status.is_success() {
        tracing::warn!("[Tools] {} returned HTTP {}", tool, status.as_u16());
        return Err(ToolError::Provider {
            tool: tool.to_string(),
            status: Some(status.as_u16()),
            message: truncate(body.trim(), MAX_ERROR_BODY_CHARS),
        });
    }

    serde_json::from_str(&body).map_err(|e| ToolError::parse(tool, e.to_string()))
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
