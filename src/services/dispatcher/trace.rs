//! Execution Trace
//!
//! Human-readable record of the decisions made while answering one
//! request. Returned to the client as debugging output, so nothing that
//! reaches it may carry a credential.

use serde::Serialize;

use agent_stack_tools::ToolError;

/// Ordered trace lines for one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExecutionTrace {
    lines: Vec<String>,
}

impl ExecutionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::debug!("[Trace] {}", line);
        self.lines.push(line);
    }

    /// Insert lines ahead of everything recorded so far.
    pub fn prepend<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut head: Vec<String> = lines.into_iter().map(Into::into).collect();
        head.append(&mut self.lines);
        self.lines = head;
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}

impl std::fmt::Display for ExecutionTrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// Short failure label for a tool error.
///
/// Upstream error bodies are left out: some APIs echo request parameters,
/// and query-string keys must not reach the trace.
pub fn failure_reason(err: &ToolError) -> String {
    match err {
        ToolError::MissingCredential { .. } => "missing credential".to_string(),
        ToolError::Unsupported { .. } => "unsupported tool type".to_string(),
        ToolError::Capability { capability, .. } => format!("no {} capability", capability),
        ToolError::Provider {
            status: Some(status),
            ..
        } => format!("HTTP {}", status),
        ToolError::Provider { status: None, .. } => "upstream error".to_string(),
        ToolError::Network { .. } => "network error".to_string(),
        ToolError::Parse { .. } => "unreadable response".to_string(),
        ToolError::InvalidConfig { .. } => "invalid configuration".to_string(),
    }
}
