//! Agent Stack
//!
//! Runs chat requests through a user-assembled stack: an LLM, an agent
//! persona and optional tools, described as a builder node graph.
//! It includes:
//! - The agent dispatcher and its execution trace
//! - The chat service that resolves stacks and session history
//! - Application configuration and logging setup
//!
//! Extraction, backends and tools live in the `agent-stack-core`,
//! `agent-stack-llm` and `agent-stack-tools` workspace crates.

pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

// ── Dispatcher ─────────────────────────────────────────────────────────
pub use services::dispatcher::{
    BackendFactory, Dispatcher, ExecutionResult, ExecutionTrace, RegistryBackends, RegistryTools,
    ToolFactory,
};

// ── Chat Service ───────────────────────────────────────────────────────
pub use services::chat::{ChatService, TEMP_WORKFLOW_ID};

// ── Models ─────────────────────────────────────────────────────────────
pub use models::chat::{ChatRequest, ChatResponse, ErrorResponse};
pub use models::settings::{AppConfig, LogFormat};

// ── Configuration ──────────────────────────────────────────────────────
pub use storage::config::load_config;
