//! Core Error Types
//!
//! Defines the error taxonomy shared across the agent-stack workspace.
//! The LLM and tools crates define their own narrower error enums and
//! convert into `StackError` at the dispatcher boundary.

use thiserror::Error;

/// Error type for stack extraction and dispatch.
#[derive(Error, Debug)]
pub enum StackError {
    /// Missing credential, unsupported provider/agent, or empty stack.
    /// Always fatal to the request.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Non-2xx or malformed response from an LLM or tool backend
    #[error("Provider error ({source_name}{}): {message}", fmt_status(.status))]
    Provider {
        source_name: String,
        status: Option<u16>,
        message: String,
    },

    /// Malformed graph data
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing stack or session
    #[error("Not found: {0}")]
    NotFound(String),

    /// The caller abandoned the request
    #[error("Request cancelled")]
    Cancelled,

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

fn fmt_status(status: &Option<u16>) -> String {
    status.map(|s| format!(", status {}", s)).unwrap_or_default()
}

/// Result type alias for stack errors
pub type StackResult<T> = Result<T, StackError>;

impl StackError {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a provider error
    pub fn provider(source_name: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Provider {
            source_name: source_name.into(),
            status,
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status the surrounding API layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            StackError::NotFound(_) => 404,
            StackError::Validation(_) | StackError::Configuration(_) => 400,
            StackError::Serialization(_) => 400,
            StackError::Provider { .. }
            | StackError::Cancelled
            | StackError::Io(_)
            | StackError::Internal(_) => 500,
        }
    }
}

/// Convert StackError to a string for API error payloads
impl From<StackError> for String {
    fn from(err: StackError) -> String {
        err.to_string()
    }
}
