//! Registry Integration Tests
//!
//! Runs the dispatcher over the real backend and tool registries. Nothing
//! here reaches the internet: failures happen at construction time or
//! against a closed local port.

use std::sync::Arc;
use std::time::Duration;

use agent_stack::{Dispatcher, RegistryTools};
use agent_stack_core::{AgentSpec, LlmSpec, Secret, StackConfig, StackError, ToolSpec};
use agent_stack_llm::ProviderDefaults;
use agent_stack_tools::ToolDefaults;

use crate::support::ScriptedBackends;

fn conversational(llm: LlmSpec) -> StackConfig {
    StackConfig {
        llm: Some(llm),
        agent: Some(AgentSpec::new("conversational-agent")),
        tools: Vec::new(),
    }
}

#[tokio::test]
async fn test_missing_credentials_fail_before_network() {
    let dispatcher = Dispatcher::new(ProviderDefaults::default(), ToolDefaults::default());
    for tag in ["openai-gpt-4", "anthropic-claude", "huggingface-llama"] {
        let err = dispatcher
            .process("hello", &[], &conversational(LlmSpec::new(tag)))
            .await
            .unwrap_err();
        assert!(matches!(err, StackError::Configuration(_)), "{}: {}", tag, err);
    }
}

#[tokio::test]
async fn test_unreachable_backend_is_provider_error_without_credential() {
    let defaults = ProviderDefaults {
        openai_api_key: Some(Secret::new("sk-default-secret")),
        openai_base_url: Some("http://127.0.0.1:9/v1".to_string()),
        timeout: Duration::from_secs(5),
        ..Default::default()
    };
    let dispatcher = Dispatcher::new(defaults, ToolDefaults::default());

    let err = dispatcher
        .process("hello", &[], &conversational(LlmSpec::new("openai-gpt-4")))
        .await
        .unwrap_err();
    assert!(matches!(err, StackError::Provider { .. }), "{}", err);
    assert_eq!(err.status_code(), 500);
    assert!(!err.to_string().contains("sk-default-secret"));
}

#[tokio::test]
async fn test_uncredentialed_tools_are_skipped() {
    let backends = ScriptedBackends::new("done");
    let dispatcher = Dispatcher::with_factories(
        backends.clone(),
        Arc::new(RegistryTools::new(ToolDefaults::default())),
    );

    let mut weather = ToolSpec::new("weather-tool");
    weather.name = Some("Local weather".to_string());
    let mut gmail = ToolSpec::new("gmail");
    gmail.read_only = Some(true);

    let config = StackConfig {
        llm: Some(LlmSpec::new("openai-gpt-4")),
        agent: Some(AgentSpec::new("generic")),
        tools: vec![weather, gmail, ToolSpec::new("calculator")],
    };

    let result = dispatcher.process("weather in Oslo", &[], &config).await.unwrap();
    assert_eq!(result.response, "done");
    assert!(result.trace.contains("Tool Local weather: skipped (missing credential)"));
    assert!(result.trace.contains("Tool gmail: skipped (missing credential)"));
    assert!(result.trace.contains("Tool calculator: skipped (unsupported tool type)"));

    let prompt = &backends.requests()[0].turns[0].content;
    assert!(prompt.starts_with("User's request: weather in Oslo"));
}
