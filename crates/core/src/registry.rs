//! Static Registry
//!
//! Maps the free-form type tags stored on builder nodes onto the fixed set
//! of providers, agent strategies and tools this workspace implements.
//! Anything that does not match resolves to an explicit `Unsupported` /
//! `Unknown` variant so the decision is made once, at extraction time.

use serde::{Deserialize, Serialize};

/// Supported LLM backends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "tag")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    HuggingFace,
    Unsupported(String),
}

impl ProviderKind {
    /// Resolve a provider tag by case-insensitive substring match.
    ///
    /// `openai-gpt-4` → OpenAi, `anthropic-claude` → Anthropic,
    /// `huggingface-llama` / `hf-mistral` → HuggingFace.
    pub fn resolve(tag: &str) -> Self {
        let lower = tag.to_lowercase();
        if lower.contains("openai") {
            ProviderKind::OpenAi
        } else if lower.contains("anthropic") {
            ProviderKind::Anthropic
        } else if lower.contains("huggingface") || lower.contains("hf-") {
            ProviderKind::HuggingFace
        } else {
            ProviderKind::Unsupported(tag.to_string())
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, ProviderKind::Unsupported(_))
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::OpenAi => write!(f, "openai"),
            ProviderKind::Anthropic => write!(f, "anthropic"),
            ProviderKind::HuggingFace => write!(f, "huggingface"),
            ProviderKind::Unsupported(tag) => write!(f, "unsupported({})", tag),
        }
    }
}

/// Agent behavior strategies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "tag")]
pub enum AgentKind {
    Conversational,
    Research,
    Coding,
    Generic,
    /// Any other tag; dispatched like `Generic`
    Unknown(String),
}

impl AgentKind {
    /// Resolve an agent tag such as `research-agent` or `Coding`.
    pub fn resolve(tag: &str) -> Self {
        let lower = tag.trim().to_lowercase();
        let base = lower
            .strip_suffix("-agent")
            .or_else(|| lower.strip_suffix("_agent"))
            .unwrap_or(&lower);
        match base {
            "conversational" => AgentKind::Conversational,
            "research" => AgentKind::Research,
            "coding" => AgentKind::Coding,
            "generic" => AgentKind::Generic,
            _ => AgentKind::Unknown(tag.to_string()),
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentKind::Conversational => write!(f, "conversational"),
            AgentKind::Research => write!(f, "research"),
            AgentKind::Coding => write!(f, "coding"),
            AgentKind::Generic => write!(f, "generic"),
            AgentKind::Unknown(tag) => write!(f, "unknown({})", tag),
        }
    }
}

/// Supported tool adapters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "tag")]
pub enum ToolKind {
    DuckDuckGo,
    GitHub,
    Gmail,
    Weather,
    Unsupported(String),
}

/// Substring → tool table. Order matters: the first match wins.
const TOOL_TABLE: &[(&str, ToolKindTag)] = &[
    ("duckduckgo", ToolKindTag::DuckDuckGo),
    ("github", ToolKindTag::GitHub),
    ("gmail", ToolKindTag::Gmail),
    ("weather", ToolKindTag::Weather),
];

#[derive(Clone, Copy)]
enum ToolKindTag {
    DuckDuckGo,
    GitHub,
    Gmail,
    Weather,
}

impl ToolKind {
    /// Resolve a tool tag by case-insensitive substring match against the table.
    pub fn resolve(tag: &str) -> Self {
        let lower = tag.to_lowercase();
        TOOL_TABLE
            .iter()
            .find(|(needle, _)| lower.contains(needle))
            .map(|(_, kind)| match kind {
                ToolKindTag::DuckDuckGo => ToolKind::DuckDuckGo,
                ToolKindTag::GitHub => ToolKind::GitHub,
                ToolKindTag::Gmail => ToolKind::Gmail,
                ToolKindTag::Weather => ToolKind::Weather,
            })
            .unwrap_or_else(|| ToolKind::Unsupported(tag.to_string()))
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, ToolKind::Unsupported(_))
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolKind::DuckDuckGo => write!(f, "duckduckgo"),
            ToolKind::GitHub => write!(f, "github"),
            ToolKind::Gmail => write!(f, "gmail"),
            ToolKind::Weather => write!(f, "weather"),
            ToolKind::Unsupported(tag) => write!(f, "unsupported({})", tag),
        }
    }
}
