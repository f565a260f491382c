//! DuckDuckGo Instant Answer
//!
//! Keyless web lookup. The abstract (if any) comes first, then related
//! topics, capped at the configured result count.

use async_trait::async_trait;
use serde_json::Value;

use agent_stack_core::ToolKind;

use crate::error::ToolResult;
use crate::http::send_json;
use crate::trait_def::{SearchHit, StackTool};

const DUCKDUCKGO_API_URL: &str = "https://api.duckduckgo.com/";

const TOOL_NAME: &str = "DuckDuckGo";

/// DuckDuckGo search tool
pub struct DuckDuckGoTool {
    name: String,
    max_results: usize,
    client: reqwest::Client,
    api_url: String,
}

impl DuckDuckGoTool {
    pub fn new(name: Option<String>, max_results: u32, client: reqwest::Client) -> Self {
        Self {
            name: name.unwrap_or_else(|| TOOL_NAME.to_string()),
            max_results: max_results as usize,
            client,
            api_url: DUCKDUCKGO_API_URL.to_string(),
        }
    }

    /// Point the tool at a different endpoint.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

/// Convert an instant-answer payload into hits.
fn parse_results(data: &Value, max_results: usize) -> Vec<SearchHit> {
    let mut results = Vec::new();

    let abstract_text = data
        .get("Abstract")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .or_else(|| data.get("AbstractText").and_then(Value::as_str))
        .filter(|t| !t.is_empty());
    if let Some(abstract_text) = abstract_text {
        results.push(SearchHit {
            title: str_field(data, "Heading"),
            link: str_field(data, "AbstractURL"),
            snippet: Some(abstract_text.to_string()),
        });
    }

    if let Some(topics) = data.get("RelatedTopics").and_then(Value::as_array) {
        // Grouped topics carry their own "Topics" list one level down.
        let flattened = topics.iter().flat_map(|topic| match topic.get("Topics") {
            Some(Value::Array(inner)) => inner.iter().collect::<Vec<_>>(),
            _ => vec![topic],
        });

        for topic in flattened {
            let (Some(text), Some(url)) = (
                topic.get("Text").and_then(Value::as_str),
                topic.get("FirstURL").and_then(Value::as_str),
            ) else {
                continue;
            };
            let title = text.split(" - ").next().unwrap_or(text);
            results.push(SearchHit::new(title, url, text));
        }
    }

    results.truncate(max_results);
    results
}

fn str_field(data: &Value, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl StackTool for DuckDuckGoTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ToolKind {
        ToolKind::DuckDuckGo
    }

    fn supports_search(&self) -> bool {
        true
    }

    fn supports_process(&self) -> bool {
        true
    }

    async fn search(&self, query: &str) -> ToolResult<Vec<SearchHit>> {
        let request = self
            .client
            .get(&self.api_url)
            .query(&[("q", query), ("format", "json"), ("no_html", "1")]);
        let data: Value = send_json(request, TOOL_NAME).await?;

        let hits = parse_results(&data, self.max_results);
        tracing::debug!("[DuckDuckGo] {} hits for query", hits.len());
        Ok(hits)
    }

    async fn process(&self, text: &str) -> ToolResult<Option<String>> {
        let hits = self.search(text).await?;
        if hits.is_empty() {
            return Ok(None);
        }

        let mut output = format!("Web search results for \"{}\":", text.trim());
        for (i, hit) in hits.iter().enumerate() {
            output.push_str(&format!("\n{}. {}", i + 1, hit.summary()));
            if let Some(link) = &hit.link {
                output.push_str(&format!(" ({})", link));
            }
        }
        Ok(Some(output))
    }
}
