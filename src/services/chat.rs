//! Chat Service
//!
//! Glue between a chat request and the dispatcher: loads the saved stack
//! (or the built-in default), extracts its configuration, picks the history
//! to use and shapes the response.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use agent_stack_core::{
    extract_graph, format_history, ConversationTurn, HistorySource, StackConfig, StackError,
    StackResult, StackSource, AGENT_NODE, LLM_NODE, TOOL_NODE,
};

use super::dispatcher::Dispatcher;
use crate::models::chat::{ChatRequest, ChatResponse};

/// Stack id the builder uses for an unsaved canvas
pub const TEMP_WORKFLOW_ID: &str = "temp-workflow";

/// A resolved stack plus the node counts reported in the trace
struct ResolvedStack {
    config: StackConfig,
    llm_nodes: usize,
    agent_nodes: usize,
    tool_nodes: usize,
}

impl ResolvedStack {
    fn builtin() -> Self {
        let config = StackConfig::default_stack();
        Self {
            llm_nodes: usize::from(config.llm.is_some()),
            agent_nodes: usize::from(config.agent.is_some()),
            tool_nodes: config.tools.len(),
            config,
        }
    }
}

/// Chat request handler
pub struct ChatService {
    dispatcher: Dispatcher,
    stacks: Arc<dyn StackSource>,
    histories: Option<Arc<dyn HistorySource>>,
    include_trace: bool,
}

impl ChatService {
    pub fn new(dispatcher: Dispatcher, stacks: Arc<dyn StackSource>) -> Self {
        Self {
            dispatcher,
            stacks,
            histories: None,
            include_trace: true,
        }
    }

    /// Session store consulted when a request carries no history.
    pub fn with_histories(mut self, histories: Arc<dyn HistorySource>) -> Self {
        self.histories = Some(histories);
        self
    }

    pub fn with_trace(mut self, include_trace: bool) -> Self {
        self.include_trace = include_trace;
        self
    }

    pub async fn handle(&self, request: &ChatRequest) -> StackResult<ChatResponse> {
        self.handle_with_cancel(request, &CancellationToken::new()).await
    }

    /// Answer one chat request, abandoning it when `cancel` fires.
    pub async fn handle_with_cancel(
        &self,
        request: &ChatRequest,
        cancel: &CancellationToken,
    ) -> StackResult<ChatResponse> {
        let request_id = Uuid::new_v4();
        if request.message.trim().is_empty() {
            return Err(StackError::validation("message is required"));
        }
        tracing::info!(
            "[Chat] request {} stack={} session={}",
            request_id,
            request.stack_id.as_deref().unwrap_or(TEMP_WORKFLOW_ID),
            request.session_id.as_deref().unwrap_or("-")
        );

        let stack = self.resolve_stack(request.stack_id.as_deref()).await?;
        let history = self.resolve_history(request).await?;

        let mut result = self
            .dispatcher
            .process_with_cancel(&request.message, &history, &stack.config, cancel)
            .await
            .map_err(|err| {
                tracing::error!("[Chat] request {} failed: {}", request_id, err);
                err
            })?;

        result.trace.prepend([
            "Processing message with stack configuration:".to_string(),
            format!("- Found {} LLM nodes", stack.llm_nodes),
            format!("- Found {} agent nodes", stack.agent_nodes),
            format!("- Found {} tool nodes", stack.tool_nodes),
        ]);
        tracing::info!("[Chat] request {} answered", request_id);

        Ok(ChatResponse {
            response: result.response,
            trace: self.include_trace.then(|| result.trace.to_string()),
            stack_id: request.stack_id.clone(),
        })
    }

    async fn resolve_stack(&self, stack_id: Option<&str>) -> StackResult<ResolvedStack> {
        let stack_id = match stack_id.map(str::trim) {
            None | Some("") | Some(TEMP_WORKFLOW_ID) => {
                tracing::debug!("[Chat] using built-in default stack");
                return Ok(ResolvedStack::builtin());
            }
            Some(id) => id,
        };

        let stored = self.stacks.load_stack(stack_id).await?;
        let graph = stored.graph()?;
        Ok(ResolvedStack {
            config: extract_graph(&graph)?,
            llm_nodes: graph.count_of(LLM_NODE),
            agent_nodes: graph.count_of(AGENT_NODE),
            tool_nodes: graph.count_of(TOOL_NODE),
        })
    }

    /// Client-sent history wins; otherwise the session's stored turns.
    /// A session with nothing stored yet has no history.
    async fn resolve_history(&self, request: &ChatRequest) -> StackResult<Vec<ConversationTurn>> {
        if let Some(raw) = &request.history {
            return Ok(format_history(raw));
        }
        let (Some(session_id), Some(histories)) = (&request.session_id, &self.histories) else {
            return Ok(Vec::new());
        };
        match histories.load_history(session_id).await {
            Ok(raw) => Ok(format_history(&raw)),
            Err(StackError::NotFound(_)) => {
                tracing::debug!("[Chat] session {} has no stored history", session_id);
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }
}
