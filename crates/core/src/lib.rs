//! Agent Stack Core
//!
//! Graph model, configuration extraction and shared types for the
//! agent-stack workspace. This crate makes no network calls and reads no
//! environment variables.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`StackError`, `StackResult`)
//! - `graph` - Builder node/edge graph (`Node`, `Edge`, `NodeGraph`)
//! - `registry` - Static provider/agent/tool tag resolution
//! - `stack` - Normalized stack configuration (`StackConfig` and its specs)
//! - `extract` - Config Extractor
//! - `history` - Session/History Formatter
//! - `secret` - Redacting credential wrapper
//! - `store` - Persistence collaborator traits and the JSON directory store

pub mod error;
pub mod extract;
pub mod graph;
pub mod history;
pub mod registry;
pub mod secret;
pub mod stack;
pub mod store;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{StackError, StackResult};

// ── Graph Model ────────────────────────────────────────────────────────
pub use graph::{Edge, Node, NodeGraph, AGENT_NODE, LLM_NODE, TOOL_NODE};

// ── Registry ───────────────────────────────────────────────────────────
pub use registry::{AgentKind, ProviderKind, ToolKind};

// ── Stack Configuration ────────────────────────────────────────────────
pub use stack::{
    AgentSpec, LlmSpec, StackConfig, ToolSpec, DEFAULT_MAX_RESULTS, DEFAULT_MAX_TOKENS,
    DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE,
};

// ── Config Extractor ───────────────────────────────────────────────────
pub use extract::{extract, extract_graph};

// ── History ────────────────────────────────────────────────────────────
pub use history::{format_history, ConversationTurn, RawTurn, TurnRole};

// ── Credentials ────────────────────────────────────────────────────────
pub use secret::{resolve_credential, Secret};

// ── Persistence Collaborators ──────────────────────────────────────────
pub use store::{HistorySource, JsonDirStore, StackSource, StoredStack};
