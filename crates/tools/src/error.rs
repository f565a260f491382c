//! Tool Errors

use agent_stack_core::StackError;
use thiserror::Error;

/// Errors from tool adapters
#[derive(Error, Debug)]
pub enum ToolError {
    /// The adapter needs a credential that neither the node nor the
    /// application supplied
    #[error("{tool} requires a credential that is not configured")]
    MissingCredential { tool: String },

    /// Tag with no adapter in the registry
    #[error("Unsupported tool type '{tag}'")]
    Unsupported { tag: String },

    /// The adapter does not offer the requested capability
    #[error("{tool} does not support {capability}")]
    Capability { tool: String, capability: &'static str },

    /// Non-2xx answer from the upstream API
    #[error("{tool} API error{}: {message}", fmt_status(.status))]
    Provider {
        tool: String,
        status: Option<u16>,
        message: String,
    },

    /// Connection failure or timeout
    #[error("{tool} request failed: {message}")]
    Network { tool: String, message: String },

    /// Unexpected response body
    #[error("Failed to parse {tool} response: {message}")]
    Parse { tool: String, message: String },

    /// Malformed credential or setting
    #[error("Invalid {tool} configuration: {message}")]
    InvalidConfig { tool: String, message: String },
}

fn fmt_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

/// Result type alias for tool operations
pub type ToolResult<T> = Result<T, ToolError>;

impl ToolError {
    pub fn missing_credential(tool: impl Into<String>) -> Self {
        Self::MissingCredential { tool: tool.into() }
    }

    pub fn parse(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn invalid_config(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Transport failure. The URL is dropped so query-string keys stay out
    /// of error text.
    pub fn network(tool: impl Into<String>, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else {
            err.without_url().to_string()
        };
        Self::Network {
            tool: tool.into(),
            message,
        }
    }
}

impl From<ToolError> for StackError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::MissingCredential { .. }
            | ToolError::Unsupported { .. }
            | ToolError::Capability { .. }
            | ToolError::InvalidConfig { .. } => StackError::configuration(err.to_string()),
            ToolError::Provider {
                tool,
                status,
                message,
            } => StackError::provider(tool, status, message),
            ToolError::Network { tool, message } | ToolError::Parse { tool, message } => {
                StackError::provider(tool, None, message)
            }
        }
    }
}
