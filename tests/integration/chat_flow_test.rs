//! Chat Flow Integration Tests
//!
//! Saves stacks and sessions into a temporary `JsonDirStore`, then answers
//! chat requests through `ChatService` with scripted backends and tools.

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use agent_stack::{ChatRequest, ChatService, Dispatcher, TEMP_WORKFLOW_ID};
use agent_stack_core::{JsonDirStore, NodeGraph, RawTurn, StackError};

use crate::support::{CannedSearch, ScriptedBackends};

fn research_graph() -> NodeGraph {
    serde_json::from_value(json!({
        "nodes": [
            {"id": "n1", "type": "llmNode",
             "data": {"id": "openai-gpt-4", "model": "gpt-4o", "apiKey": "sk-stack-secret"}},
            {"id": "n2", "type": "agentNode",
             "data": {"id": "research-agent", "systemPrompt": "Cite your sources."}},
            {"id": "n3", "type": "toolNode", "data": {"id": "duckduckgo-search"}},
            {"id": "n4", "type": "toolNode", "data": {"id": "GitHubTool", "githubToken": "ghp_secret"}},
            {"id": "n5", "type": "toolNode", "data": {"id": "web-archive", "name": "Archive"}}
        ],
        "edges": [{"source": "n1", "target": "n2"}]
    }))
    .unwrap()
}

fn conversational_graph() -> NodeGraph {
    serde_json::from_value(json!({
        "nodes": [
            {"id": "n1", "type": "llmNode", "data": {"id": "anthropic-claude", "temperature": 0.1}},
            {"id": "n2", "type": "agentNode", "data": {"id": "conversational-agent"}}
        ],
        "edges": []
    }))
    .unwrap()
}

struct Harness {
    _dir: TempDir,
    store: Arc<JsonDirStore>,
    backends: Arc<ScriptedBackends>,
}

impl Harness {
    async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(JsonDirStore::new(dir.path()));
        store.save_stack("research", &research_graph()).await.unwrap();
        store.save_stack("chat", &conversational_graph()).await.unwrap();
        store
            .save_history(
                "session-1",
                &[
                    RawTurn::new("user", "I'm planning a trip to Lisbon"),
                    RawTurn::new("assistant", "Sounds great!"),
                    RawTurn::new("tool", "internal"),
                ],
            )
            .await
            .unwrap();
        Self {
            _dir: dir,
            store,
            backends: ScriptedBackends::new("scripted answer"),
        }
    }

    fn service(&self, failing: &[&str]) -> ChatService {
        let dispatcher = Dispatcher::with_factories(
            self.backends.clone(),
            Arc::new(CannedSearch {
                failing: failing.iter().map(|s| s.to_string()).collect(),
            }),
        );
        ChatService::new(dispatcher, self.store.clone()).with_histories(self.store.clone())
    }
}

#[tokio::test]
async fn test_research_stack_end_to_end() {
    let harness = Harness::new().await;
    let service = harness.service(&["GitHubTool"]);

    let response = service
        .handle(&ChatRequest::new("rust web frameworks").with_stack("research"))
        .await
        .unwrap();
    assert_eq!(response.response, "scripted answer");

    let trace = response.trace.unwrap();
    let lines: Vec<&str> = trace.lines().collect();
    assert_eq!(lines[0], "Processing message with stack configuration:");
    assert_eq!(lines[1], "- Found 1 LLM nodes");
    assert_eq!(lines[2], "- Found 1 agent nodes");
    assert_eq!(lines[3], "- Found 3 tool nodes");
    assert!(trace.contains("Generating response using scripted gpt-4o"));
    assert!(trace.contains("Tool GitHubTool: failed (HTTP 503)"));
    assert!(trace.contains("2 of 3 tools contributed search results; using 5 results"));
    assert!(!trace.contains("sk-stack-secret"));
    assert!(!trace.contains("ghp_secret"));

    let requests = harness.backends.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].system, "Cite your sources.");
    let prompt = &requests[0].turns[0].content;
    assert!(prompt.contains("1. rust web frameworks on duckduckgo-search: first"));
    assert!(prompt.contains("4. rust web frameworks on Archive: first"));
    assert!(prompt.contains("5. rust web frameworks again: second"));
    assert!(!prompt.contains("6."));
}

#[tokio::test]
async fn test_session_history_flows_into_conversation() {
    let harness = Harness::new().await;
    let service = harness.service(&[]);

    service
        .handle(&ChatRequest::new("What should I see there?").with_stack("chat").with_session("session-1"))
        .await
        .unwrap();

    let request = &harness.backends.requests()[0];
    let messages = request.messages();
    let roles: Vec<&str> = messages.iter().map(|m| m.role.as_str()).collect();
    assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
    assert_eq!(messages[3].content, "What should I see there?");
    assert!((request.params.temperature - 0.1).abs() < f32::EPSILON);
}

#[tokio::test]
async fn test_temp_workflow_needs_no_saved_stack() {
    let harness = Harness::new().await;
    let service = harness.service(&[]);

    let response = service
        .handle(&ChatRequest::new("hello").with_stack(TEMP_WORKFLOW_ID))
        .await
        .unwrap();
    assert!(response.trace.unwrap().contains("Using agent: conversational-agent (conversational)"));
    assert_eq!(harness.backends.requests()[0].turns.len(), 1);
}

#[tokio::test]
async fn test_missing_stack_and_bad_ids() {
    let harness = Harness::new().await;
    let service = harness.service(&[]);

    let err = service
        .handle(&ChatRequest::new("hi").with_stack("nope"))
        .await
        .unwrap_err();
    assert!(matches!(err, StackError::NotFound(_)));

    let err = service
        .handle(&ChatRequest::new("hi").with_stack("../etc/passwd"))
        .await
        .unwrap_err();
    assert!(matches!(err, StackError::Validation(_)));
    assert!(harness.backends.requests().is_empty());
}
