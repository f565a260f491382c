//! Backend Registry
//!
//! Static mapping from a resolved provider kind to its backend client.

use agent_stack_core::{resolve_credential, LlmSpec, ProviderKind};

use super::anthropic::AnthropicBackend;
use super::huggingface::HuggingFaceBackend;
use super::openai::OpenAiBackend;
use super::provider::{missing_api_key_error, LlmBackend};
use super::types::{
    LlmError, LlmResult, ProviderConfig, ProviderDefaults, DEFAULT_ANTHROPIC_MODEL,
    DEFAULT_HUGGINGFACE_MODEL, DEFAULT_OPENAI_MODEL,
};

/// Build the backend for an LLM spec.
///
/// Fails without any network traffic when the provider is unsupported, no
/// credential can be resolved, or the base URL does not parse.
pub fn build_backend(spec: &LlmSpec, defaults: &ProviderDefaults) -> LlmResult<Box<dyn LlmBackend>> {
    if let ProviderKind::Unsupported(tag) = &spec.provider {
        return Err(unsupported_provider(tag));
    }
    let provider_name = spec.provider.to_string();

    let api_key = resolve_credential(spec.credential.as_ref(), defaults.api_key_for(&spec.provider))
        .ok_or_else(|| missing_api_key_error(&provider_name))?;

    let base_url = spec
        .base_url
        .clone()
        .or_else(|| defaults.base_url_for(&spec.provider).cloned());
    if let Some(url) = &base_url {
        url::Url::parse(url).map_err(|e| LlmError::Unsupported {
            message: format!("invalid base URL for {}: {}", provider_name, e),
        })?;
    }

    let model = resolve_model(spec);
    tracing::debug!("[LLM] building {} backend for model {}", provider_name, model);

    let config = ProviderConfig::new(spec.provider.clone(), api_key, model)
        .with_base_url(base_url)
        .with_timeout(defaults.timeout);

    let backend: Box<dyn LlmBackend> = match &spec.provider {
        ProviderKind::OpenAi => Box::new(OpenAiBackend::new(config)?),
        ProviderKind::Anthropic => Box::new(AnthropicBackend::new(config)?),
        ProviderKind::HuggingFace => Box::new(HuggingFaceBackend::new(config)?),
        ProviderKind::Unsupported(tag) => return Err(unsupported_provider(tag)),
    };
    Ok(backend)
}

fn unsupported_provider(tag: &str) -> LlmError {
    LlmError::Unsupported {
        message: format!("unsupported LLM provider '{}'", tag),
    }
}

/// Model name for a spec. HuggingFace prefers the repository id.
pub fn resolve_model(spec: &LlmSpec) -> String {
    let default = match spec.provider {
        ProviderKind::OpenAi => DEFAULT_OPENAI_MODEL,
        ProviderKind::Anthropic => DEFAULT_ANTHROPIC_MODEL,
        ProviderKind::HuggingFace => {
            return spec
                .model_id
                .clone()
                .or_else(|| spec.model.clone())
                .unwrap_or_else(|| DEFAULT_HUGGINGFACE_MODEL.to_string());
        }
        ProviderKind::Unsupported(_) => "",
    };
    spec.model.clone().unwrap_or_else(|| default.to_string())
}
