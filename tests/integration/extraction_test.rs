//! Config Extractor Integration Tests
//!
//! Feeds builder-shaped JSON (as stored by the persistence layer) through
//! `NodeGraph::from_json` and `extract_graph`.

use agent_stack_core::{
    extract_graph, AgentKind, NodeGraph, ProviderKind, StackError, ToolKind, DEFAULT_SYSTEM_PROMPT,
};

const BUILDER_NODES: &str = r#"[
  {"id": "llm-1", "type": "llmNode", "position": {"x": 10, "y": 20},
   "data": {"id": "huggingface-llama", "modelId": "mistralai/Mistral-7B-Instruct-v0.2",
            "huggingFaceToken": "hf_live_token", "temperature": 0.2, "maxTokens": 512}},
  {"id": "llm-2", "type": "llmNode", "data": {"id": "openai-gpt-4"}},
  {"id": "agent-1", "type": "agentNode",
   "data": {"id": "research-agent", "systemPrompt": "You are a meticulous researcher.",
            "role": "Analyst", "goal": "Summarize sources", "verbose": true}},
  {"id": "tool-1", "type": "toolNode", "data": {"id": "duckduckgo-search", "maxResults": 3}},
  {"id": "tool-2", "type": "toolNode", "data": {"toolType": "GitHubTool", "githubToken": "ghp_x"}},
  {"id": "tool-3", "type": "toolNode", "data": {"id": "gmail-reader", "gmailCredentials": "{}"}},
  {"id": "tool-4", "type": "toolNode", "data": {"id": "calculator"}},
  {"id": "note", "type": "stickyNote", "data": {"text": "ignored"}}
]"#;

const BUILDER_EDGES: &str = r#"[
  {"id": "e1", "source": "llm-1", "target": "agent-1", "sourceHandle": "out", "targetHandle": "llm"},
  {"id": "e2", "source": "tool-1", "target": "agent-1"}
]"#;

#[test]
fn test_full_builder_graph() {
    let graph = NodeGraph::from_json(BUILDER_NODES, BUILDER_EDGES).unwrap();
    assert_eq!(graph.edges.len(), 2);

    let stack = extract_graph(&graph).unwrap();

    let llm = stack.llm.expect("llm");
    assert_eq!(llm.provider, ProviderKind::HuggingFace);
    assert_eq!(llm.model_id.as_deref(), Some("mistralai/Mistral-7B-Instruct-v0.2"));
    assert_eq!(llm.credential.as_ref().unwrap().expose(), "hf_live_token");
    assert_eq!(llm.max_tokens, 512);

    let agent = stack.agent.expect("agent");
    assert_eq!(agent.kind, AgentKind::Research);
    assert_eq!(agent.system_prompt, "You are a meticulous researcher.");
    assert!(agent.verbose);
    assert!(!agent.memory);
    assert_eq!(agent.role.as_deref(), Some("Analyst"));

    let kinds: Vec<ToolKind> = stack.tools.iter().map(|t| t.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            ToolKind::DuckDuckGo,
            ToolKind::GitHub,
            ToolKind::Gmail,
            ToolKind::Unsupported("calculator".to_string())
        ]
    );
    assert_eq!(stack.tools[0].max_results, Some(3));
    assert_eq!(stack.tools[2].read_only, Some(true));
    assert!(stack.tools[3].credential.is_none());
}

#[test]
fn test_extracted_stack_debug_hides_credentials() {
    let graph = NodeGraph::from_json(BUILDER_NODES, BUILDER_EDGES).unwrap();
    let stack = extract_graph(&graph).unwrap();
    let rendered = format!("{:?}", stack);
    assert!(!rendered.contains("hf_live_token"));
    assert!(!rendered.contains("ghp_x"));
}

#[test]
fn test_agent_defaults_when_data_is_sparse() {
    let graph = NodeGraph::from_json(
        r#"[{"id": "a", "type": "agentNode", "data": {}}]"#,
        "[]",
    )
    .unwrap();
    let stack = extract_graph(&graph).unwrap();
    assert!(stack.llm.is_none());
    let agent = stack.agent.unwrap();
    assert_eq!(agent.kind, AgentKind::Conversational);
    assert_eq!(agent.system_prompt, DEFAULT_SYSTEM_PROMPT);
}

#[test]
fn test_malformed_graphs_are_validation_errors() {
    let cases = [
        r#"[{"id": "l", "type": "llmNode", "data": {"temperature": "hot"}}]"#,
        r#"[{"id": "l", "type": "llmNode", "data": {"maxTokens": -3}}]"#,
        r#"[{"id": "l", "type": "llmNode", "data": {"temperature": 3.5}}]"#,
        r#"[{"id": "t", "type": "toolNode", "data": {"name": "no type"}}]"#,
        r#"[{"id": "a", "type": "agentNode", "data": "not an object"}]"#,
        r#"{"nodes": "wrong shape"}"#,
    ];
    for nodes in cases {
        let result = NodeGraph::from_json(nodes, "[]").and_then(|g| extract_graph(&g));
        assert!(
            matches!(result, Err(StackError::Validation(_))),
            "expected validation error for {}",
            nodes
        );
    }
}
