//! LLM Types
//!
//! Request, configuration and error types shared by the backend clients.

use std::time::Duration;

use agent_stack_core::{ConversationTurn, ProviderKind, Secret, StackError, TurnRole};
use thiserror::Error;

/// Default per-call timeout for provider requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default model per provider when the stack does not name one
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-opus-20240229";
pub const DEFAULT_HUGGINGFACE_MODEL: &str = "meta-llama/Llama-3-8b-chat-hf";

/// Sampling parameters for one generation call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: agent_stack_core::DEFAULT_TEMPERATURE,
            max_tokens: agent_stack_core::DEFAULT_MAX_TOKENS,
        }
    }
}

/// A chat-style generation request.
///
/// `turns` holds prior history followed by the current user message.
/// The system prompt travels separately so each backend can place it the
/// way its API expects.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system: String,
    pub turns: Vec<ConversationTurn>,
    pub params: GenerationParams,
}

impl GenerationRequest {
    pub fn new(system: impl Into<String>, turns: Vec<ConversationTurn>, params: GenerationParams) -> Self {
        Self {
            system: system.into(),
            turns,
            params,
        }
    }

    /// The full message list with the system prompt first.
    pub fn messages(&self) -> Vec<ConversationTurn> {
        let mut messages = Vec::with_capacity(self.turns.len() + 1);
        messages.push(ConversationTurn::system(self.system.clone()));
        messages.extend(self.turns.iter().cloned());
        messages
    }

    /// Turns restricted to user/assistant roles.
    pub fn dialogue_turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter().filter(|t| t.role != TurnRole::System)
    }
}

/// Resolved settings for one backend instance.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider: ProviderKind,
    pub api_key: Secret,
    pub model: String,
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn new(provider: ProviderKind, api_key: Secret, model: impl Into<String>) -> Self {
        Self {
            provider,
            api_key,
            model: model.into(),
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Application-supplied fallbacks used when a stack's LLM node leaves a
/// credential or endpoint unset.
#[derive(Debug, Clone)]
pub struct ProviderDefaults {
    pub openai_api_key: Option<Secret>,
    pub anthropic_api_key: Option<Secret>,
    pub huggingface_api_key: Option<Secret>,
    pub openai_base_url: Option<String>,
    pub anthropic_base_url: Option<String>,
    pub huggingface_base_url: Option<String>,
    pub timeout: Duration,
}

impl Default for ProviderDefaults {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            huggingface_api_key: None,
            openai_base_url: None,
            anthropic_base_url: None,
            huggingface_base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ProviderDefaults {
    pub fn api_key_for(&self, provider: &ProviderKind) -> Option<&Secret> {
        match provider {
            ProviderKind::OpenAi => self.openai_api_key.as_ref(),
            ProviderKind::Anthropic => self.anthropic_api_key.as_ref(),
            ProviderKind::HuggingFace => self.huggingface_api_key.as_ref(),
            ProviderKind::Unsupported(_) => None,
        }
    }

    pub fn base_url_for(&self, provider: &ProviderKind) -> Option<&String> {
        match provider {
            ProviderKind::OpenAi => self.openai_base_url.as_ref(),
            ProviderKind::Anthropic => self.anthropic_base_url.as_ref(),
            ProviderKind::HuggingFace => self.huggingface_base_url.as_ref(),
            ProviderKind::Unsupported(_) => None,
        }
    }
}

/// Errors from LLM backends
#[derive(Error, Debug)]
pub enum LlmError {
    /// No credential on the node and no application default
    #[error("API key not configured for {provider}")]
    MissingCredential { provider: String },

    /// Provider tag the registry does not know, or an unusable setting
    #[error("Unsupported LLM configuration: {message}")]
    Unsupported { message: String },

    /// Non-2xx answer from the provider
    #[error("{provider} returned HTTP {status}: {message}")]
    Provider {
        provider: String,
        status: u16,
        message: String,
    },

    /// Connection failure or timeout
    #[error("Network error calling {provider}: {message}")]
    Network { provider: String, message: String },

    /// 2xx answer whose body did not have the expected shape
    #[error("Failed to parse {provider} response: {message}")]
    Parse { provider: String, message: String },
}

/// Result type alias for LLM operations
pub type LlmResult<T> = Result<T, LlmError>;

impl From<LlmError> for StackError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingCredential { .. } | LlmError::Unsupported { .. } => {
                StackError::configuration(err.to_string())
            }
            LlmError::Provider {
                provider,
                status,
                message,
            } => StackError::provider(provider, Some(status), message),
            LlmError::Network { provider, message } | LlmError::Parse { provider, message } => {
                StackError::provider(provider, None, message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_put_system_first() {
        let request = GenerationRequest::new(
            "Be brief.",
            vec![ConversationTurn::user("hi")],
            GenerationParams::default(),
        );
        let messages = request.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ConversationTurn::system("Be brief."));
        assert_eq!(messages[1], ConversationTurn::user("hi"));
    }

    #[test]
    fn test_dialogue_turns_skip_system() {
        let request = GenerationRequest::new(
            "sys",
            vec![
                ConversationTurn::system("earlier rules"),
                ConversationTurn::user("q"),
            ],
            GenerationParams::default(),
        );
        let turns: Vec<_> = request.dialogue_turns().collect();
        assert_eq!(turns, vec![&ConversationTurn::user("q")]);
    }

    #[test]
    fn test_error_mapping() {
        let err: StackError = LlmError::MissingCredential {
            provider: "openai".to_string(),
        }
        .into();
        assert!(matches!(err, StackError::Configuration(_)));

        let err: StackError = LlmError::Provider {
            provider: "anthropic".to_string(),
            status: 529,
            message: "overloaded".to_string(),
        }
        .into();
        assert!(matches!(err, StackError::Provider { status: Some(529), .. }));

        let err: StackError = LlmError::Parse {
            provider: "huggingface".to_string(),
            message: "no text".to_string(),
        }
        .into();
        assert!(matches!(err, StackError::Provider { status: None, .. }));
    }

    #[test]
    fn test_defaults_lookup() {
        let defaults = ProviderDefaults {
            anthropic_api_key: Some(Secret::new("ak")),
            ..Default::default()
        };
        assert!(defaults.api_key_for(&ProviderKind::Anthropic).is_some());
        assert!(defaults.api_key_for(&ProviderKind::OpenAi).is_none());
        assert_eq!(defaults.timeout, Duration::from_secs(60));
    }
}
