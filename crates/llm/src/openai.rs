//! OpenAI Backend
//!
//! Implementation of the LlmBackend trait for OpenAI's chat completions API
//! and compatible endpoints.

use async_trait::async_trait;
use serde::Deserialize;

use super::provider::{parse_error, post_json, LlmBackend};
use super::types::{GenerationRequest, LlmResult, ProviderConfig};
use crate::http_client::build_http_client;

/// Default OpenAI API base
const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

const PROVIDER_NAME: &str = "openai";

/// OpenAI backend
pub struct OpenAiBackend {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OpenAiBackend {
    /// Create a new OpenAI backend with the given configuration
    pub fn new(config: ProviderConfig) -> LlmResult<Self> {
        let client = build_http_client(config.timeout)?;
        Ok(Self { config, client })
    }

    /// Get the chat completions endpoint
    fn endpoint(&self) -> String {
        let base = self.config.base_url.as_deref().unwrap_or(OPENAI_API_BASE);
        format!("{}/chat/completions", base.trim_end_matches('/'))
    }

    /// Build the request body for the API
    fn build_request_body(&self, request: &GenerationRequest) -> serde_json::Value {
        let messages: Vec<serde_json::Value> = request
            .messages()
            .iter()
            .map(|turn| {
                serde_json::json!({
                    "role": turn.role.as_str(),
                    "content": turn.content,
                })
            })
            .collect();

        serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": request.params.temperature,
            "max_tokens": request.params.max_tokens,
        })
    }
}

/// Pull the answer text out of a chat completions response body.
fn parse_response(body: &str) -> LlmResult<String> {
    let response: OpenAiResponse = serde_json::from_str(body)
        .map_err(|e| parse_error(PROVIDER_NAME, format!("Failed to parse response: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| parse_error(PROVIDER_NAME, "response contained no message content"))
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, request: &GenerationRequest) -> LlmResult<String> {
        let body = self.build_request_body(request);
        tracing::debug!(
            "[OpenAI] POST chat/completions model={} messages={}",
            self.config.model,
            request.turns.len() + 1
        );

        let http_request = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.config.api_key.expose());
        let body_text = post_json(http_request, &body, PROVIDER_NAME).await?;

        parse_response(&body_text)
    }
}

/// OpenAI API response format
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
