//! Session/History Formatter
//!
//! Normalizes stored or client-supplied chat history into typed turns.

use serde::{Deserialize, Serialize};

/// Role of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
    System,
}

impl TurnRole {
    /// Parse a role tag. Matching is exact, like the stored history format.
    pub fn parse(role: &str) -> Option<Self> {
        match role {
            "user" => Some(TurnRole::User),
            "assistant" => Some(TurnRole::Assistant),
            "system" => Some(TurnRole::System),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
            TurnRole::System => "system",
        }
    }
}

/// A single normalized turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ConversationTurn {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(TurnRole::System, content)
    }
}

/// A history entry as it arrives from a client or the session store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTurn {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl RawTurn {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            content: Some(content.into()),
        }
    }
}

/// Keep user/assistant/system entries in order and drop everything else.
///
/// A missing role counts as `user`; a missing content as empty text.
pub fn format_history(raw: &[RawTurn]) -> Vec<ConversationTurn> {
    raw.iter()
        .filter_map(|entry| {
            let role_tag = entry.role.as_deref().unwrap_or("user");
            match TurnRole::parse(role_tag) {
                Some(role) => Some(ConversationTurn::new(
                    role,
                    entry.content.clone().unwrap_or_default(),
                )),
                None => {
                    tracing::debug!("[History] dropping turn with role '{}'", role_tag);
                    None
                }
            }
        })
        .collect()
}
