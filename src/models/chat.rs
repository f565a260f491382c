//! Chat Boundary Types
//!
//! Shapes exchanged with whatever transport fronts the chat service.

use serde::{Deserialize, Serialize};

use agent_stack_core::{RawTurn, StackError};

/// One chat request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Saved stack to run; absent or `temp-workflow` means the default stack
    #[serde(default, alias = "stackId", skip_serializing_if = "Option::is_none")]
    pub stack_id: Option<String>,
    /// Session whose stored history is used when `history` is absent
    #[serde(default, alias = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub message: String,
    /// Prior turns sent by the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<RawTurn>>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_stack(mut self, stack_id: impl Into<String>) -> Self {
        self.stack_id = Some(stack_id.into());
        self
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_history(mut self, history: Vec<RawTurn>) -> Self {
        self.history = Some(history);
        self
    }
}

/// Answer to a chat request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    /// Newline-joined execution trace ("thinking")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_id: Option<String>,
}

/// Error payload with the HTTP status a transport should use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
}

impl From<&StackError> for ErrorResponse {
    fn from(err: &StackError) -> Self {
        Self {
            error: err.to_string(),
            status: err.status_code(),
        }
    }
}
