//! Stack Graph Types
//!
//! The node/edge graph produced by the visual stack builder.
//! Nodes carry a type tag (`llmNode`, `agentNode`, `toolNode`) and a
//! free-form data map; edges connect node ids.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{StackError, StackResult};

/// Node type tag for the language model node
pub const LLM_NODE: &str = "llmNode";
/// Node type tag for the agent persona node
pub const AGENT_NODE: &str = "agentNode";
/// Node type tag for tool nodes
pub const TOOL_NODE: &str = "toolNode";

/// A node in a stack graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node identifier assigned by the builder
    pub id: String,
    /// Type tag, e.g. `llmNode`
    #[serde(rename = "type", default)]
    pub node_type: String,
    /// Free-form settings entered in the builder
    #[serde(default)]
    pub data: Value,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            data,
        }
    }

    /// The node's data as an object map.
    ///
    /// A missing (`null`) data field is treated as an empty map; any other
    /// non-object value is malformed.
    pub fn data_map(&self) -> StackResult<Map<String, Value>> {
        match &self.data {
            Value::Object(map) => Ok(map.clone()),
            Value::Null => Ok(Map::new()),
            other => Err(StackError::validation(format!(
                "node '{}' has non-object data: {}",
                self.id,
                json_type_name(other)
            ))),
        }
    }
}

/// An edge connecting two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

/// A full stack graph as stored by the persistence layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeGraph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl NodeGraph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// Parse the serialized node and edge lists the stack store keeps.
    pub fn from_json(nodes_json: &str, edges_json: &str) -> StackResult<Self> {
        let nodes: Vec<Node> = serde_json::from_str(nodes_json)
            .map_err(|e| StackError::validation(format!("invalid nodes JSON: {}", e)))?;
        let edges: Vec<Edge> = if edges_json.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(edges_json)
                .map_err(|e| StackError::validation(format!("invalid edges JSON: {}", e)))?
        };
        Ok(Self { nodes, edges })
    }

    /// Count nodes carrying the given type tag.
    pub fn count_of(&self, node_type: &str) -> usize {
        self.nodes.iter().filter(|n| n.node_type == node_type).count()
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_builder_graph() {
        let nodes = r#"[
            {"id": "1", "type": "llmNode", "position": {"x": 10, "y": 20},
             "data": {"id": "openai-gpt-4", "model": "gpt-4"}},
            {"id": "2", "type": "agentNode", "data": {"id": "research-agent"}}
        ]"#;
        let edges = r#"[{"id": "e1-2", "source": "1", "target": "2", "sourceHandle": "out"}]"#;

        let graph = NodeGraph::from_json(nodes, edges).unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].node_type, LLM_NODE);
        assert_eq!(graph.edges[0].source_handle.as_deref(), Some("out"));
        assert_eq!(graph.count_of(AGENT_NODE), 1);
    }

    #[test]
    fn test_empty_edges_text_is_allowed() {
        let graph = NodeGraph::from_json("[]", "").unwrap();
        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_invalid_nodes_json_is_validation_error() {
        let err = NodeGraph::from_json("{not json", "[]").unwrap_err();
        assert!(matches!(err, StackError::Validation(_)));
    }

    #[test]
    fn test_data_map_null_and_non_object() {
        let node = Node::new("n", TOOL_NODE, Value::Null);
        assert!(node.data_map().unwrap().is_empty());

        let node = Node::new("n", TOOL_NODE, json!([1, 2]));
        let err = node.data_map().unwrap_err();
        assert!(err.to_string().contains("array"));
    }
}
