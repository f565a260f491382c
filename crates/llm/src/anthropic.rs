//! Anthropic Backend
//!
//! Implementation of the LlmBackend trait for Anthropic's messages API.
//! The system prompt goes in its own field and only user/assistant turns
//! are sent as messages.

use async_trait::async_trait;
use serde::Deserialize;

use super::provider::{parse_error, post_json, LlmBackend};
use super::types::{GenerationRequest, LlmResult, ProviderConfig};
use crate::http_client::build_http_client;

/// Default Anthropic API base
const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";

/// API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

const PROVIDER_NAME: &str = "anthropic";

/// Anthropic backend
pub struct AnthropicBackend {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl AnthropicBackend {
    pub fn new(config: ProviderConfig) -> LlmResult<Self> {
        let client = build_http_client(config.timeout)?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        let base = self.config.base_url.as_deref().unwrap_or(ANTHROPIC_API_BASE);
        format!("{}/messages", base.trim_end_matches('/'))
    }

    fn build_request_body(&self, request: &GenerationRequest) -> serde_json::Value {
        let messages: Vec<serde_json::Value> = request
            .dialogue_turns()
            .map(|turn| {
                serde_json::json!({
                    "role": turn.role.as_str(),
                    "content": turn.content,
                })
            })
            .collect();

        serde_json::json!({
            "model": self.config.model,
            "system": request.system,
            "messages": messages,
            "temperature": request.params.temperature,
            "max_tokens": request.params.max_tokens,
        })
    }
}

/// Return the first text block of a messages API response.
fn parse_response(body: &str) -> LlmResult<String> {
    let response: ClaudeResponse = serde_json::from_str(body)
        .map_err(|e| parse_error(PROVIDER_NAME, format!("Failed to parse response: {}", e)))?;

    response
        .content
        .into_iter()
        .find_map(|block| match block {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::Other => None,
        })
        .ok_or_else(|| parse_error(PROVIDER_NAME, "response contained no text block"))
}

#[async_trait]
impl LlmBackend for AnthropicBackend {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, request: &GenerationRequest) -> LlmResult<String> {
        let body = self.build_request_body(request);
        tracing::debug!("[Anthropic] POST messages model={}", self.config.model);

        let http_request = self
            .client
            .post(self.endpoint())
            .header("x-api-key", self.config.api_key.expose())
            .header("anthropic-version", ANTHROPIC_VERSION);
        let body_text = post_json(http_request, &body, PROVIDER_NAME).await?;

        parse_response(&body_text)
    }
}

/// Anthropic API response format
#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GenerationParams;
    use agent_stack_core::{ConversationTurn, ProviderKind, Secret};

    fn test_backend() -> AnthropicBackend {
        let config = ProviderConfig::new(
            ProviderKind::Anthropic,
            Secret::new("ant-key"),
            "claude-3-opus-20240229",
        );
        AnthropicBackend::new(config).unwrap()
    }

    #[test]
    fn test_request_body_keeps_system_separate() {
        let backend = test_backend();
        let request = GenerationRequest::new(
            "You are terse.",
            vec![
                ConversationTurn::system("stale rules"),
                ConversationTurn::user("hi"),
                ConversationTurn::assistant("hello"),
                ConversationTurn::user("bye"),
            ],
            GenerationParams::default(),
        );

        let body = backend.build_request_body(&request);
        assert_eq!(body["system"], "You are terse.");
        assert_eq!(body["model"], "claude-3-opus-20240229");
        assert_eq!(body["max_tokens"], 1000);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert!(messages.iter().all(|m| m["role"] != "system"));
        assert_eq!(messages[2]["content"], "bye");
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(test_backend().endpoint(), "https://api.anthropic.com/v1/messages");
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{"id": "msg_1", "type": "message", "role": "assistant",
            "content": [{"type": "text", "text": "Hi there."}],
            "stop_reason": "end_turn"}"#;
        assert_eq!(parse_response(body).unwrap(), "Hi there.");
    }

    #[test]
    fn test_parse_response_skips_non_text_blocks() {
        let body = r#"{"content": [{"type": "thinking", "thinking": "hmm"},
                                   {"type": "text", "text": "Answer"}]}"#;
        assert_eq!(parse_response(body).unwrap(), "Answer");
        assert!(parse_response(r#"{"content": []}"#).is_err());
    }
}
