//! Config Extractor
//!
//! Turns a builder graph into a [`StackConfig`]. The first `llmNode` and the
//! first `agentNode` win; every `toolNode` becomes a [`ToolSpec`] in graph
//! order. Edges are accepted but not consulted: tools are not routed to a
//! particular agent.

use serde_json::{Map, Value};

use crate::error::{StackError, StackResult};
use crate::graph::{json_type_name, Edge, Node, NodeGraph, AGENT_NODE, LLM_NODE, TOOL_NODE};
use crate::registry::ToolKind;
use crate::secret::Secret;
use crate::stack::{
    AgentSpec, LlmSpec, StackConfig, ToolSpec, DEFAULT_AGENT_TAG, DEFAULT_MAX_RESULTS,
    DEFAULT_PROVIDER_TAG,
};

/// Extract the stack configuration from a node graph.
///
/// Pure: reads the nodes, never mutates them, performs no I/O.
pub fn extract(nodes: &[Node], _edges: &[Edge]) -> StackResult<StackConfig> {
    let llm = nodes
        .iter()
        .find(|n| n.node_type == LLM_NODE)
        .map(extract_llm)
        .transpose()?;

    let agent = nodes
        .iter()
        .find(|n| n.node_type == AGENT_NODE)
        .map(extract_agent)
        .transpose()?;

    let tools = nodes
        .iter()
        .filter(|n| n.node_type == TOOL_NODE)
        .map(extract_tool)
        .collect::<StackResult<Vec<_>>>()?;

    tracing::debug!(
        "[Extract] llm={:?} agent={:?} tools={}",
        llm.as_ref().map(|l| l.provider.to_string()),
        agent.as_ref().map(|a| a.kind.to_string()),
        tools.len()
    );

    Ok(StackConfig { llm, agent, tools })
}

/// Convenience wrapper over [`extract`] for a whole graph.
pub fn extract_graph(graph: &NodeGraph) -> StackResult<StackConfig> {
    extract(&graph.nodes, &graph.edges)
}

fn extract_llm(node: &Node) -> StackResult<LlmSpec> {
    let data = node.data_map()?;
    let fields = Fields::new(node, &data);

    let tag = fields
        .string(&["id", "provider"])?
        .unwrap_or_else(|| DEFAULT_PROVIDER_TAG.to_string());
    let mut spec = LlmSpec::new(tag);

    spec.model = fields.string(&["model"])?;
    spec.model_id = fields.string(&["modelId", "model_id"])?;
    spec.base_url = fields.string(&["baseUrl", "base_url"])?;
    spec.credential = fields
        .secret(&["apiKey", "api_key"])?
        .or(fields.secret(&["huggingFaceToken", "huggingface_token"])?);

    if let Some(temperature) = fields.number(&["temperature"])? {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(StackError::validation(format!(
                "node '{}': temperature {} is outside 0.0..=2.0",
                node.id, temperature
            )));
        }
        spec.temperature = temperature as f32;
    }

    if let Some(max_tokens) = fields.positive_int(&["maxTokens", "max_tokens"])? {
        spec.max_tokens = max_tokens;
    }

    Ok(spec)
}

fn extract_agent(node: &Node) -> StackResult<AgentSpec> {
    let data = node.data_map()?;
    let fields = Fields::new(node, &data);

    let tag = fields
        .string(&["id", "type"])?
        .unwrap_or_else(|| DEFAULT_AGENT_TAG.to_string());
    let mut spec = AgentSpec::new(tag);

    if let Some(prompt) = fields.string(&["systemPrompt", "system_prompt"])? {
        spec.system_prompt = prompt;
    }
    spec.verbose = fields.boolean(&["verbose"])?.unwrap_or(false);
    spec.memory = fields.boolean(&["memory"])?.unwrap_or(false);
    spec.role = fields.string(&["role"])?;
    spec.goal = fields.string(&["goal"])?;

    Ok(spec)
}

fn extract_tool(node: &Node) -> StackResult<ToolSpec> {
    let data = node.data_map()?;
    let fields = Fields::new(node, &data);

    let tag = fields.string(&["id", "toolType", "tool_type"])?.ok_or_else(|| {
        StackError::validation(format!("tool node '{}' has no tool type", node.id))
    })?;
    let mut spec = ToolSpec::new(tag);
    spec.name = fields.string(&["name"])?;
    spec.description = fields.string(&["description"])?;

    match spec.kind {
        ToolKind::DuckDuckGo => {
            spec.max_results = Some(
                fields
                    .positive_int(&["maxResults", "max_results"])?
                    .unwrap_or(DEFAULT_MAX_RESULTS),
            );
        }
        ToolKind::GitHub => {
            spec.credential = fields.secret(&["githubToken", "github_token"])?;
        }
        ToolKind::Gmail => {
            spec.credential = fields.secret(&["gmailCredentials", "gmail_credentials"])?;
            spec.read_only = Some(fields.boolean(&["readOnly", "read_only"])?.unwrap_or(true));
        }
        ToolKind::Weather => {
            spec.credential = fields.secret(&["weatherApiKey", "weather_api_key", "apiKey"])?;
        }
        ToolKind::Unsupported(_) => {}
    }

    Ok(spec)
}

/// Typed accessors over a node's data map.
///
/// Each accessor takes a list of accepted keys (builder camelCase first)
/// and returns the first present, non-null value. A value of the wrong
/// JSON type is a validation error rather than a silent default.
struct Fields<'a> {
    node_id: &'a str,
    data: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    fn new(node: &'a Node, data: &'a Map<String, Value>) -> Self {
        Self {
            node_id: &node.id,
            data,
        }
    }

    fn lookup<'k>(&self, keys: &[&'k str]) -> Option<(&'k str, &'a Value)> {
        keys.iter().find_map(|key| {
            self.data
                .get(*key)
                .filter(|v| !v.is_null())
                .map(|v| (*key, v))
        })
    }

    fn invalid(&self, key: &str, expected: &str, value: &Value) -> StackError {
        StackError::validation(format!(
            "node '{}': field '{}' should be {}, got {}",
            self.node_id,
            key,
            expected,
            json_type_name(value)
        ))
    }

    /// Non-empty string value.
    fn string(&self, keys: &[&str]) -> StackResult<Option<String>> {
        match self.lookup(keys) {
            None => Ok(None),
            Some((_, Value::String(s))) if s.trim().is_empty() => Ok(None),
            Some((_, Value::String(s))) => Ok(Some(s.clone())),
            Some((key, other)) => Err(self.invalid(key, "a string", other)),
        }
    }

    fn secret(&self, keys: &[&str]) -> StackResult<Option<Secret>> {
        let Some((key, value)) = self.lookup(keys) else {
            return Ok(None);
        };
        match value {
            Value::String(s) => Ok(Secret::from_non_empty(Some(s))),
            // Gmail credentials may be stored as an object rather than JSON text.
            Value::Object(_) => Ok(Some(Secret::new(value.to_string()))),
            other => Err(self.invalid(key, "a string", other)),
        }
    }

    /// Number, also accepting numeric strings from form inputs.
    fn number(&self, keys: &[&str]) -> StackResult<Option<f64>> {
        let Some((key, value)) = self.lookup(keys) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| self.invalid(key, "a number", value))
    }

    fn positive_int(&self, keys: &[&str]) -> StackResult<Option<u32>> {
        let Some((key, value)) = self.lookup(keys) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        match parsed {
            Some(n) if n > 0 && n <= u32::MAX as u64 => Ok(Some(n as u32)),
            _ => Err(self.invalid(key, "a positive integer", value)),
        }
    }

    fn boolean(&self, keys: &[&str]) -> StackResult<Option<bool>> {
        match self.lookup(keys) {
            None => Ok(None),
            Some((_, Value::Bool(b))) => Ok(Some(*b)),
            Some((key, other)) => Err(self.invalid(key, "a boolean", other)),
        }
    }
}
