//! Tool Trait
//!
//! Uniform capability wrapper around external lookups. A tool advertises
//! which of the two capabilities it offers; the dispatcher only calls what
//! is advertised.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use agent_stack_core::ToolKind;

use crate::error::{ToolError, ToolResult};

/// A single search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: Option<String>,
    pub link: Option<String>,
    pub snippet: Option<String>,
}

impl SearchHit {
    pub fn new(title: impl Into<String>, link: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            link: Some(link.into()),
            snippet: Some(snippet.into()),
        }
    }

    /// `"{title}: {snippet}"` with placeholders for missing parts.
    pub fn summary(&self) -> String {
        format!(
            "{}: {}",
            non_empty(self.title.as_deref()).unwrap_or("No title"),
            non_empty(self.snippet.as_deref()).unwrap_or("No snippet")
        )
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Trait implemented by every tool adapter.
#[async_trait]
pub trait StackTool: Send + Sync {
    /// Display name used in traces
    fn name(&self) -> &str;

    /// Registry kind of this adapter
    fn kind(&self) -> ToolKind;

    /// Whether [`StackTool::search`] is implemented
    fn supports_search(&self) -> bool {
        false
    }

    /// Whether [`StackTool::process`] is implemented
    fn supports_process(&self) -> bool {
        false
    }

    /// Look up `query` and return structured hits.
    async fn search(&self, _query: &str) -> ToolResult<Vec<SearchHit>> {
        Err(ToolError::Capability {
            tool: self.name().to_string(),
            capability: "search",
        })
    }

    /// Produce a text contribution for the prompt, or `None` when there is
    /// nothing to add.
    async fn process(&self, _text: &str) -> ToolResult<Option<String>> {
        Err(ToolError::Capability {
            tool: self.name().to_string(),
            capability: "process",
        })
    }
}
