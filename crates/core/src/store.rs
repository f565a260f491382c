//! Persistence Collaborators
//!
//! The dispatcher never touches storage directly. Saved stacks and chat
//! sessions are read through [`StackSource`] and [`HistorySource`];
//! [`JsonDirStore`] is a file-backed implementation of both.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{StackError, StackResult};
use crate::graph::NodeGraph;
use crate::history::RawTurn;

/// A saved stack in its stored form: serialized node and edge lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredStack {
    pub id: String,
    pub nodes_json: String,
    pub edges_json: String,
}

impl StoredStack {
    /// Parse the stored text into a graph.
    pub fn graph(&self) -> StackResult<NodeGraph> {
        NodeGraph::from_json(&self.nodes_json, &self.edges_json)
    }
}

/// Loads saved stacks by id.
#[async_trait]
pub trait StackSource: Send + Sync {
    /// Returns `StackError::NotFound` when no stack has this id.
    async fn load_stack(&self, stack_id: &str) -> StackResult<StoredStack>;
}

/// Loads the prior turns of a chat session.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Returns `StackError::NotFound` when the session does not exist.
    async fn load_history(&self, session_id: &str) -> StackResult<Vec<RawTurn>>;
}

/// On-disk layout of a stack file.
///
/// `nodes`/`edges` may be JSON arrays or the serialized text a database
/// column would hold.
#[derive(Debug, Deserialize)]
struct StackFile {
    #[serde(default)]
    nodes: Value,
    #[serde(default)]
    edges: Value,
}

/// Directory-backed store.
///
/// ```text
/// <root>/stacks/<stack_id>.json      {"nodes": [...], "edges": [...]}
/// <root>/sessions/<session_id>.json  [{"role": "user", "content": "..."}]
/// ```
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn stack_path(&self, stack_id: &str) -> StackResult<PathBuf> {
        validate_id("stack", stack_id)?;
        Ok(self.root.join("stacks").join(format!("{}.json", stack_id)))
    }

    fn session_path(&self, session_id: &str) -> StackResult<PathBuf> {
        validate_id("session", session_id)?;
        Ok(self.root.join("sessions").join(format!("{}.json", session_id)))
    }

    /// Write a graph as a stack file, creating directories as needed.
    pub async fn save_stack(&self, stack_id: &str, graph: &NodeGraph) -> StackResult<()> {
        let path = self.stack_path(stack_id)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(graph)?;
        tokio::fs::write(&path, content).await?;
        tracing::debug!("[Store] saved stack '{}' to {}", stack_id, path.display());
        Ok(())
    }

    /// Write a session's turns, creating directories as needed.
    pub async fn save_history(&self, session_id: &str, turns: &[RawTurn]) -> StackResult<()> {
        let path = self.session_path(session_id)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(turns)?;
        tokio::fs::write(&path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl StackSource for JsonDirStore {
    async fn load_stack(&self, stack_id: &str) -> StackResult<StoredStack> {
        let path = self.stack_path(stack_id)?;
        let content = read_or_not_found(&path, || format!("stack '{}'", stack_id)).await?;
        let file: StackFile = serde_json::from_str(&content).map_err(|e| {
            StackError::validation(format!("stack '{}' is not valid JSON: {}", stack_id, e))
        })?;

        Ok(StoredStack {
            id: stack_id.to_string(),
            nodes_json: as_json_text(file.nodes, "[]"),
            edges_json: as_json_text(file.edges, "[]"),
        })
    }
}

#[async_trait]
impl HistorySource for JsonDirStore {
    async fn load_history(&self, session_id: &str) -> StackResult<Vec<RawTurn>> {
        let path = self.session_path(session_id)?;
        let content = read_or_not_found(&path, || format!("session '{}'", session_id)).await?;
        serde_json::from_str(&content).map_err(|e| {
            StackError::validation(format!("session '{}' is not valid JSON: {}", session_id, e))
        })
    }
}

/// Ids become file names, so anything that could leave the directory is rejected.
fn validate_id(kind: &str, id: &str) -> StackResult<()> {
    let bad = id.is_empty()
        || id.contains(['/', '\\'])
        || id.contains("..")
        || id.chars().any(char::is_control);
    if bad {
        return Err(StackError::validation(format!("invalid {} id '{}'", kind, id)));
    }
    Ok(())
}

async fn read_or_not_found(path: &Path, what: impl FnOnce() -> String) -> StackResult<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StackError::not_found(what())),
        Err(e) => Err(e.into()),
    }
}

fn as_json_text(value: Value, empty: &str) -> String {
    match value {
        Value::Null => empty.to_string(),
        Value::String(text) => text,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_stack_roundtrip_through_directory() {
        let dir = TempDir::new().unwrap();
        let store = JsonDirStore::new(dir.path());
        let graph = NodeGraph::new(
            vec![Node::new("1", "llmNode", json!({"id": "openai-gpt-4"}))],
            vec![],
        );
        store.save_stack("42", &graph).await.unwrap();

        let stored = store.load_stack("42").await.unwrap();
        assert_eq!(stored.id, "42");
        assert_eq!(stored.graph().unwrap(), graph);
    }

    #[tokio::test]
    async fn test_stack_file_with_text_columns() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("stacks")).unwrap();
        std::fs::write(
            dir.path().join("stacks/7.json"),
            r#"{"nodes": "[{\"id\":\"a\",\"type\":\"agentNode\",\"data\":{}}]", "edges": ""}"#,
        )
        .unwrap();

        let stored = JsonDirStore::new(dir.path()).load_stack("7").await.unwrap();
        let graph = stored.graph().unwrap();
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
    }

    #[tokio::test]
    async fn test_missing_stack_and_session_are_not_found() {
        let dir = TempDir::new().unwrap();
        let store = JsonDirStore::new(dir.path());

        let err = store.load_stack("nope").await.unwrap_err();
        assert!(matches!(err, StackError::NotFound(_)));
        assert_eq!(err.status_code(), 404);

        let err = store.load_history("nope").await.unwrap_err();
        assert!(matches!(err, StackError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_history_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = JsonDirStore::new(dir.path());
        let turns = vec![RawTurn::new("user", "hi"), RawTurn::new("assistant", "hello")];
        store.save_history("s1", &turns).await.unwrap();
        assert_eq!(store.load_history("s1").await.unwrap(), turns);
    }

    #[tokio::test]
    async fn test_path_traversal_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = JsonDirStore::new(dir.path());
        let err = store.load_stack("../secrets").await.unwrap_err();
        assert!(matches!(err, StackError::Validation(_)));
    }
}
