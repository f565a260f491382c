//! Test doubles shared by the integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use agent_stack::{BackendFactory, ToolFactory};
use agent_stack_core::{LlmSpec, StackResult, ToolKind, ToolSpec};
use agent_stack_llm::{GenerationRequest, LlmBackend, LlmResult};
use agent_stack_tools::{SearchHit, StackTool, ToolError, ToolResult};

/// Backend factory whose backends record every request and answer with a
/// fixed reply.
pub struct ScriptedBackends {
    pub requests: Arc<Mutex<Vec<GenerationRequest>>>,
    reply: String,
}

impl ScriptedBackends {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            reply: reply.to_string(),
        })
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl BackendFactory for ScriptedBackends {
    fn backend(&self, spec: &LlmSpec) -> StackResult<Box<dyn LlmBackend>> {
        Ok(Box::new(ScriptedBackend {
            model: spec.model.clone().unwrap_or_else(|| "scripted".to_string()),
            requests: self.requests.clone(),
            reply: self.reply.clone(),
        }))
    }
}

struct ScriptedBackend {
    model: String,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
    reply: String,
}

#[async_trait]
impl LlmBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> LlmResult<String> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.reply.clone())
    }
}

/// Tool factory that answers searches with canned hits per tool tag.
/// A tag listed in `failing` returns an upstream error instead.
pub struct CannedSearch {
    pub failing: Vec<String>,
}

impl ToolFactory for CannedSearch {
    fn tool(&self, spec: &ToolSpec) -> Result<Box<dyn StackTool>, ToolError> {
        Ok(Box::new(CannedTool {
            name: spec.display_name().to_string(),
            fails: self.failing.contains(&spec.tool_tag),
        }))
    }
}

struct CannedTool {
    name: String,
    fails: bool,
}

#[async_trait]
impl StackTool for CannedTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ToolKind {
        ToolKind::Unsupported("canned".to_string())
    }

    fn supports_search(&self) -> bool {
        true
    }

    async fn search(&self, query: &str) -> ToolResult<Vec<SearchHit>> {
        if self.fails {
            return Err(ToolError::Provider {
                tool: self.name.clone(),
                status: Some(503),
                message: "unavailable".to_string(),
            });
        }
        Ok(vec![
            SearchHit::new(format!("{} on {}", query, self.name), "https://example.com/a", "first"),
            SearchHit::new(format!("{} again", query), "https://example.com/b", "second"),
            SearchHit::new("More", "https://example.com/c", "third"),
        ])
    }
}
