//! Agent Dispatcher
//!
//! Turns a [`StackConfig`] plus one user message into a response. The agent
//! kind picks the strategy:
//!
//! - conversational: system prompt + history + message, one LLM call
//! - research: concurrent searches across tools, results embedded in a
//!   research prompt, answered without history
//! - coding: coding template around the message, answered with history
//! - generic / unknown: every process-capable tool contributes text ahead
//!   of the message, answered with history
//!
//! Backends and tools are built through factory traits so tests can
//! substitute doubles.

pub mod prompts;
pub mod trace;

use std::sync::Arc;

use futures_util::future::join_all;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use agent_stack_core::{
    AgentKind, AgentSpec, ConversationTurn, LlmSpec, StackConfig, StackError, StackResult, ToolSpec,
};
use agent_stack_llm::{
    build_backend, GenerationParams, GenerationRequest, LlmBackend, ProviderDefaults,
};
use agent_stack_tools::{build_tool, SearchHit, StackTool, ToolDefaults, ToolError};

pub use trace::{failure_reason, ExecutionTrace};

/// The answer and the decisions that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    pub response: String,
    pub trace: ExecutionTrace,
}

/// Builds an LLM backend for a spec.
pub trait BackendFactory: Send + Sync {
    fn backend(&self, spec: &LlmSpec) -> StackResult<Box<dyn LlmBackend>>;
}

/// Builds a tool adapter for a spec.
pub trait ToolFactory: Send + Sync {
    fn tool(&self, spec: &ToolSpec) -> Result<Box<dyn StackTool>, ToolError>;
}

/// Backend factory over the static registry
pub struct RegistryBackends {
    defaults: ProviderDefaults,
}

impl RegistryBackends {
    pub fn new(defaults: ProviderDefaults) -> Self {
        Self { defaults }
    }
}

impl BackendFactory for RegistryBackends {
    fn backend(&self, spec: &LlmSpec) -> StackResult<Box<dyn LlmBackend>> {
        build_backend(spec, &self.defaults).map_err(StackError::from)
    }
}

/// Tool factory over the static registry
pub struct RegistryTools {
    defaults: ToolDefaults,
}

impl RegistryTools {
    pub fn new(defaults: ToolDefaults) -> Self {
        Self { defaults }
    }
}

impl ToolFactory for RegistryTools {
    fn tool(&self, spec: &ToolSpec) -> Result<Box<dyn StackTool>, ToolError> {
        build_tool(spec, &self.defaults)
    }
}

/// Agent dispatcher
#[derive(Clone)]
pub struct Dispatcher {
    backends: Arc<dyn BackendFactory>,
    tools: Arc<dyn ToolFactory>,
}

impl Dispatcher {
    /// Dispatcher over the static registries with application defaults.
    pub fn new(provider_defaults: ProviderDefaults, tool_defaults: ToolDefaults) -> Self {
        Self::with_factories(
            Arc::new(RegistryBackends::new(provider_defaults)),
            Arc::new(RegistryTools::new(tool_defaults)),
        )
    }

    pub fn with_factories(backends: Arc<dyn BackendFactory>, tools: Arc<dyn ToolFactory>) -> Self {
        Self { backends, tools }
    }

    /// Answer `input` with the given stack.
    ///
    /// Configuration problems (no LLM, unsupported provider, missing
    /// credential) fail before any network call. A failing tool in the
    /// research or generic strategy is recorded in the trace and skipped.
    pub async fn process(
        &self,
        input: &str,
        history: &[ConversationTurn],
        stack: &StackConfig,
    ) -> StackResult<ExecutionResult> {
        let mut trace = ExecutionTrace::new();
        trace.push(format!(
            "Stack: {} LLM, {} agent, {} tool(s)",
            usize::from(stack.llm.is_some()),
            usize::from(stack.agent.is_some()),
            stack.tools.len()
        ));

        let llm = match (&stack.llm, &stack.agent) {
            (None, None) => {
                return Err(StackError::configuration(
                    "stack has no LLM and no agent configured",
                ));
            }
            (None, Some(_)) => {
                return Err(StackError::configuration("stack has an agent but no LLM configured"));
            }
            (Some(llm), _) => llm,
        };

        let default_agent;
        let agent = match &stack.agent {
            Some(agent) => agent,
            None => {
                trace.push("No agent configured, using default conversational agent");
                default_agent = AgentSpec::default_conversational();
                &default_agent
            }
        };

        let backend = self.backends.backend(llm)?;
        trace.push(format!(
            "Generating response using {} {}",
            backend.name(),
            backend.model()
        ));
        record_agent(&mut trace, agent);

        let params = GenerationParams {
            temperature: llm.temperature,
            max_tokens: llm.max_tokens,
        };
        let run = Run {
            backend: backend.as_ref(),
            system_prompt: &agent.system_prompt,
            params,
        };

        let response = match &agent.kind {
            AgentKind::Conversational => {
                trace.push("Strategy: conversational");
                run.chat(input, history).await?
            }
            AgentKind::Research => {
                trace.push("Strategy: research");
                let hits = self.gather_search_results(input, &stack.tools, &mut trace).await;
                let prompt = prompts::research_prompt(&prompts::search_context(&hits), input);
                run.chat(&prompt, &[]).await?
            }
            AgentKind::Coding => {
                trace.push("Strategy: coding");
                run.chat(&prompts::coding_prompt(input), history).await?
            }
            AgentKind::Generic | AgentKind::Unknown(_) => {
                trace.push(format!("Strategy: generic (agent type {})", agent.agent_tag));
                let outputs = self.gather_tool_outputs(input, &stack.tools, &mut trace).await;
                let prompt = prompts::generic_prompt(&prompts::tool_context(&outputs), input);
                run.chat(&prompt, history).await?
            }
        };

        Ok(ExecutionResult { response, trace })
    }

    /// [`Dispatcher::process`], abandoned as soon as `cancel` fires.
    ///
    /// Outstanding backend and tool calls are dropped with the request future.
    pub async fn process_with_cancel(
        &self,
        input: &str,
        history: &[ConversationTurn],
        stack: &StackConfig,
        cancel: &CancellationToken,
    ) -> StackResult<ExecutionResult> {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("[Dispatcher] request cancelled");
                Err(StackError::Cancelled)
            }
            result = self.process(input, history, stack) => result,
        }
    }

    /// Build the adapters for a tool-using strategy. Tools that cannot be
    /// built are reported and left out.
    fn build_tools(&self, specs: &[ToolSpec], trace: &mut ExecutionTrace) -> Vec<Box<dyn StackTool>> {
        specs
            .iter()
            .filter_map(|spec| match self.tools.tool(spec) {
                Ok(tool) => Some(tool),
                Err(err) => {
                    tracing::warn!("[Dispatcher] skipping tool {}: {}", spec.display_name(), err);
                    trace.push(format!(
                        "Tool {}: skipped ({})",
                        spec.display_name(),
                        failure_reason(&err)
                    ));
                    None
                }
            })
            .collect()
    }

    async fn gather_search_results(
        &self,
        query: &str,
        specs: &[ToolSpec],
        trace: &mut ExecutionTrace,
    ) -> Vec<SearchHit> {
        let tools = self.build_tools(specs, trace);
        let searchers: Vec<&dyn StackTool> = tools
            .iter()
            .map(|t| t.as_ref())
            .filter(|t| t.supports_search())
            .collect();

        let outcomes = join_all(searchers.iter().map(|tool| tool.search(query))).await;

        let mut hits = Vec::new();
        let mut contributing = 0;
        for (tool, outcome) in searchers.iter().zip(outcomes) {
            match outcome {
                Ok(found) if found.is_empty() => {
                    trace.push(format!("Tool {}: no results", tool.name()));
                }
                Ok(found) => {
                    contributing += 1;
                    trace.push(format!("Tool {}: contributed {} results", tool.name(), found.len()));
                    hits.extend(found);
                }
                Err(err) => {
                    tracing::warn!("[Dispatcher] search with {} failed: {}", tool.name(), err);
                    trace.push(format!("Tool {}: failed ({})", tool.name(), failure_reason(&err)));
                }
            }
        }

        hits.truncate(prompts::MAX_RESEARCH_RESULTS);
        // Configured tools that were skipped or cannot search count as non-contributors.
        trace.push(format!(
            "{} of {} tools contributed search results; using {} results",
            contributing,
            specs.len(),
            hits.len()
        ));
        hits
    }

    async fn gather_tool_outputs(
        &self,
        text: &str,
        specs: &[ToolSpec],
        trace: &mut ExecutionTrace,
    ) -> Vec<String> {
        let tools = self.build_tools(specs, trace);
        let processors: Vec<&dyn StackTool> = tools
            .iter()
            .map(|t| t.as_ref())
            .filter(|t| t.supports_process())
            .collect();

        let outcomes = join_all(processors.iter().map(|tool| tool.process(text))).await;

        let mut outputs = Vec::new();
        for (tool, outcome) in processors.iter().zip(outcomes) {
            match outcome {
                Ok(Some(output)) if !output.trim().is_empty() => {
                    trace.push(format!("Tool {}: contributed output", tool.name()));
                    outputs.push(output);
                }
                Ok(_) => trace.push(format!("Tool {}: no output", tool.name())),
                Err(err) => {
                    tracing::error!("[Dispatcher] error using tool {}: {}", tool.name(), err);
                    trace.push(format!("Tool {}: failed ({})", tool.name(), failure_reason(&err)));
                }
            }
        }
        outputs
    }
}

fn record_agent(trace: &mut ExecutionTrace, agent: &AgentSpec) {
    trace.push(format!("Using agent: {} ({})", agent.agent_tag, agent.kind));
    if let Some(role) = &agent.role {
        trace.push(format!("Agent role: {}", role));
    }
    if let Some(goal) = &agent.goal {
        trace.push(format!("Agent goal: {}", goal));
    }
}

/// One backend bound to the agent's system prompt and sampling params.
struct Run<'a> {
    backend: &'a dyn LlmBackend,
    system_prompt: &'a str,
    params: GenerationParams,
}

impl Run<'_> {
    /// system + history + user message, one call, text returned verbatim.
    async fn chat(&self, input: &str, history: &[ConversationTurn]) -> StackResult<String> {
        let mut turns = history.to_vec();
        turns.push(ConversationTurn::user(input));
        let request = GenerationRequest::new(self.system_prompt, turns, self.params);
        Ok(self.backend.generate(&request).await?)
    }
}
