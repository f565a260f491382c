//! LLM Backend Trait
//!
//! Defines the common interface for all LLM backends.

use async_trait::async_trait;

use super::types::{GenerationRequest, LlmError, LlmResult};

/// Longest slice of an error body carried into an error message
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Trait that all LLM backends implement.
///
/// One call, one complete text answer. Streaming and tool calling are not
/// part of the stack execution path.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Returns the provider name for identification.
    fn name(&self) -> &'static str;

    /// Returns the model this backend sends requests to.
    fn model(&self) -> &str;

    /// Send the request and return the generated text.
    async fn generate(&self, request: &GenerationRequest) -> LlmResult<String>;
}

/// Helper function to create an error for missing API key
pub fn missing_api_key_error(provider: &str) -> LlmError {
    LlmError::MissingCredential {
        provider: provider.to_string(),
    }
}

/// Helper function to map a non-2xx status onto an error
pub fn parse_http_error(status: u16, body: &str, provider: &str) -> LlmError {
    let detail = truncate(body.trim(), MAX_ERROR_BODY_CHARS);
    let message = match status {
        401 => "Invalid API key".to_string(),
        403 => "Access denied".to_string(),
        404 => format!("Model or endpoint not found: {}", detail),
        429 => format!("Rate limited: {}", detail),
        _ => detail,
    };
    LlmError::Provider {
        provider: provider.to_string(),
        status,
        message,
    }
}

/// Helper function to wrap a transport error
pub fn network_error(provider: &str, err: reqwest::Error) -> LlmError {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else {
        // Strip the URL so query-string credentials never reach error text.
        err.without_url().to_string()
    };
    LlmError::Network {
        provider: provider.to_string(),
        message,
    }
}

/// Helper function to build a parse error
pub fn parse_error(provider: &str, message: impl Into<String>) -> LlmError {
    LlmError::Parse {
        provider: provider.to_string(),
        message: message.into(),
    }
}

/// POST a JSON body and return the response text, mapping failures.
pub(crate) async fn post_json(
    request: reqwest::RequestBuilder,
    body: &serde_json::Value,
    provider: &str,
) -> LlmResult<String> {
    let response = request
        .header("Content-Type", "application/json")
        .json(body)
        .send()
        .await
        .map_err(|e| network_error(provider, e))?;

    let status = response.status().as_u16();
    let body_text = response
        .text()
        .await
        .map_err(|e| network_error(provider, e))?;

    if !(200..300).contains(&status) {
        tracing::warn!("[LLM] {} returned HTTP {}", provider, status);
        return Err(parse_http_error(status, &body_text, provider));
    }
    Ok(body_text)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
