//! HuggingFace Backend
//!
//! Text-generation through the HuggingFace inference API. The conversation
//! is flattened into a single `User:` / `Assistant:` transcript.

use async_trait::async_trait;
use serde_json::Value;

use agent_stack_core::TurnRole;

use super::provider::{parse_error, post_json, LlmBackend};
use super::types::{GenerationRequest, LlmResult, ProviderConfig};
use crate::http_client::build_http_client;

/// Default inference API base; the model id is appended as a path.
const HUGGINGFACE_API_BASE: &str = "https://api-inference.huggingface.co/models";

const PROVIDER_NAME: &str = "huggingface";

/// HuggingFace inference backend
pub struct HuggingFaceBackend {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl HuggingFaceBackend {
    pub fn new(config: ProviderConfig) -> LlmResult<Self> {
        let client = build_http_client(config.timeout)?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        let base = self
            .config
            .base_url
            .as_deref()
            .unwrap_or(HUGGINGFACE_API_BASE);
        format!("{}/{}", base.trim_end_matches('/'), self.config.model)
    }

    fn build_request_body(&self, request: &GenerationRequest) -> Value {
        serde_json::json!({
            "inputs": build_transcript(request),
            "parameters": {
                "max_new_tokens": request.params.max_tokens,
                "temperature": request.params.temperature,
                "return_full_text": false,
            }
        })
    }
}

/// `"{system}\n\nUser: ..\nAssistant: ..\n...User: {input}\nAssistant: "`
fn build_transcript(request: &GenerationRequest) -> String {
    let mut prompt = format!("{}\n\n", request.system);
    for turn in request.dialogue_turns() {
        let speaker = match turn.role {
            TurnRole::User => "User",
            TurnRole::Assistant => "Assistant",
            TurnRole::System => continue,
        };
        prompt.push_str(speaker);
        prompt.push_str(": ");
        prompt.push_str(&turn.content);
        prompt.push('\n');
    }
    prompt.push_str("Assistant: ");
    prompt
}

/// Accepts `[{"generated_text": ..}]`, `["text"]` and `{"generated_text": ..}`.
fn parse_response(body: &str) -> LlmResult<String> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| parse_error(PROVIDER_NAME, format!("Failed to parse response: {}", e)))?;

    let first = match &value {
        Value::Array(items) => items
            .first()
            .ok_or_else(|| parse_error(PROVIDER_NAME, "empty response list"))?,
        other => other,
    };

    match first {
        Value::String(text) => Ok(text.clone()),
        Value::Object(map) => match map.get("generated_text") {
            Some(Value::String(text)) => Ok(text.clone()),
            _ => match map.get("error").and_then(Value::as_str) {
                Some(error) => Err(parse_error(PROVIDER_NAME, error)),
                None => Err(parse_error(PROVIDER_NAME, "response has no generated_text")),
            },
        },
        _ => Err(parse_error(PROVIDER_NAME, "unexpected response shape")),
    }
}

#[async_trait]
impl LlmBackend for HuggingFaceBackend {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, request: &GenerationRequest) -> LlmResult<String> {
        let body = self.build_request_body(request);
        tracing::debug!("[HuggingFace] POST model={}", self.config.model);

        let http_request = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.config.api_key.expose());
        let body_text = post_json(http_request, &body, PROVIDER_NAME).await?;

        parse_response(&body_text)
    }
}
