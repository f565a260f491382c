//! Stack Configuration Types
//!
//! The normalized `{llm, agent, tools}` record the extractor builds from a
//! node graph. Built fresh for every request and never persisted.

use serde::Serialize;

use crate::registry::{AgentKind, ProviderKind, ToolKind};
use crate::secret::Secret;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Default output token budget
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
/// Default agent persona
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
/// Default DuckDuckGo result cap
pub const DEFAULT_MAX_RESULTS: u32 = 5;
/// Provider tag used when an LLM node carries none
pub const DEFAULT_PROVIDER_TAG: &str = "openai-gpt-4";
/// Agent tag used when an agent node carries none
pub const DEFAULT_AGENT_TAG: &str = "conversational-agent";

/// LLM selection taken from the first `llmNode`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LlmSpec {
    /// Raw tag from the node, e.g. `openai-gpt-4`
    pub provider_tag: String,
    /// Registry resolution of `provider_tag`
    pub provider: ProviderKind,
    pub model: Option<String>,
    /// HuggingFace repository id
    pub model_id: Option<String>,
    pub credential: Option<Secret>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub base_url: Option<String>,
}

impl LlmSpec {
    pub fn new(provider_tag: impl Into<String>) -> Self {
        let provider_tag = provider_tag.into();
        Self {
            provider: ProviderKind::resolve(&provider_tag),
            provider_tag,
            model: None,
            model_id: None,
            credential: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            base_url: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Agent persona taken from the first `agentNode`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSpec {
    /// Raw tag from the node, e.g. `research-agent`
    pub agent_tag: String,
    pub kind: AgentKind,
    pub system_prompt: String,
    pub verbose: bool,
    pub memory: bool,
    /// Free-text role shown in the builder ("Financial analyst")
    pub role: Option<String>,
    pub goal: Option<String>,
}

impl AgentSpec {
    pub fn new(agent_tag: impl Into<String>) -> Self {
        let agent_tag = agent_tag.into();
        Self {
            kind: AgentKind::resolve(&agent_tag),
            agent_tag,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            verbose: false,
            memory: false,
            role: None,
            goal: None,
        }
    }

    /// The agent used when a stack has an LLM but no agent node.
    pub fn default_conversational() -> Self {
        Self::new(DEFAULT_AGENT_TAG)
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }
}

/// One configured tool, in graph order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    /// Raw tag from the node, e.g. `GitHubTool`
    pub tool_tag: String,
    pub kind: ToolKind,
    pub name: Option<String>,
    pub description: Option<String>,
    /// DuckDuckGo result cap
    pub max_results: Option<u32>,
    /// GitHub token, Gmail credentials JSON or weather API key
    pub credential: Option<Secret>,
    /// Gmail access mode
    pub read_only: Option<bool>,
}

impl ToolSpec {
    pub fn new(tool_tag: impl Into<String>) -> Self {
        let tool_tag = tool_tag.into();
        Self {
            kind: ToolKind::resolve(&tool_tag),
            tool_tag,
            name: None,
            description: None,
            max_results: None,
            credential: None,
            read_only: None,
        }
    }

    /// Name for traces: the user's label if set, else the tag.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.tool_tag)
    }
}

/// The normalized stack configuration.
///
/// `llm` and `agent` are `None` when the graph had no matching node; the
/// dispatcher decides whether that is an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StackConfig {
    pub llm: Option<LlmSpec>,
    pub agent: Option<AgentSpec>,
    pub tools: Vec<ToolSpec>,
}

impl StackConfig {
    /// The built-in stack used for unsaved builder sessions:
    /// OpenAI `gpt-4`, conversational agent, no tools.
    pub fn default_stack() -> Self {
        Self {
            llm: Some(LlmSpec::new(DEFAULT_PROVIDER_TAG).with_model("gpt-4")),
            agent: Some(AgentSpec::default_conversational()),
            tools: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.llm.is_none() && self.agent.is_none()
    }
}
