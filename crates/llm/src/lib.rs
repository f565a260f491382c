//! Agent Stack LLM
//!
//! Provides a unified interface for text generation across providers:
//! - OpenAI (and OpenAI-compatible endpoints)
//! - Anthropic Claude
//! - HuggingFace inference API
//!
//! Also includes the HTTP client factory and the static backend registry.

pub mod anthropic;
pub mod http_client;
pub mod huggingface;
pub mod openai;
pub mod provider;
pub mod registry;
pub mod types;

// Re-export main types
pub use anthropic::AnthropicBackend;
pub use http_client::build_http_client;
pub use huggingface::HuggingFaceBackend;
pub use openai::OpenAiBackend;
pub use provider::LlmBackend;
pub use registry::{build_backend, resolve_model};
pub use types::*;
