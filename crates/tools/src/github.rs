//! GitHub Repository Search

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use agent_stack_core::{Secret, ToolKind};

use crate::error::ToolResult;
use crate::http::send_json;
use crate::trait_def::{SearchHit, StackTool};

const GITHUB_API_BASE: &str = "https://api.github.com";

const TOOL_NAME: &str = "GitHub";

/// Repositories requested per search
pub const DEFAULT_PER_PAGE: u32 = 5;

/// One repository from a search, trimmed to what the prompt needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepoSummary {
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub stars: u64,
    pub language: Option<String>,
    pub updated_at: Option<String>,
}

impl From<RepoItem> for RepoSummary {
    fn from(item: RepoItem) -> Self {
        Self {
            name: item.full_name,
            description: item.description,
            url: item.html_url,
            stars: item.stargazers_count,
            language: item.language,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<RepoItem>,
}

#[derive(Debug, Deserialize)]
struct RepoItem {
    full_name: String,
    description: Option<String>,
    html_url: String,
    #[serde(default)]
    stargazers_count: u64,
    language: Option<String>,
    updated_at: Option<String>,
}

/// GitHub search tool. Works without a token at a lower rate limit.
pub struct GitHubTool {
    name: String,
    token: Option<Secret>,
    per_page: u32,
    client: reqwest::Client,
    api_base: String,
}

impl GitHubTool {
    pub fn new(name: Option<String>, token: Option<Secret>, client: reqwest::Client) -> Self {
        Self {
            name: name.unwrap_or_else(|| TOOL_NAME.to_string()),
            token,
            per_page: DEFAULT_PER_PAGE,
            client,
            api_base: GITHUB_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Search repositories ordered by stars.
    pub async fn search_repositories(&self, query: &str) -> ToolResult<Vec<RepoSummary>> {
        let per_page = self.per_page.to_string();
        let mut request = self
            .client
            .get(format!("{}/search/repositories", self.api_base.trim_end_matches('/')))
            .header("Accept", "application/vnd.github+json")
            .query(&[
                ("q", query),
                ("sort", "stars"),
                ("order", "desc"),
                ("per_page", per_page.as_str()),
            ]);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token.expose()));
        }

        let response: SearchResponse = send_json(request, TOOL_NAME).await?;
        tracing::debug!("[GitHub] {} repositories for query", response.items.len());
        Ok(response.items.into_iter().map(RepoSummary::from).collect())
    }
}

fn repo_to_hit(repo: &RepoSummary) -> SearchHit {
    SearchHit {
        title: Some(repo.name.clone()),
        link: Some(repo.url.clone()),
        snippet: repo.description.clone(),
    }
}

fn format_repos(query: &str, repos: &[RepoSummary]) -> String {
    let mut output = format!("GitHub repositories matching \"{}\":", query.trim());
    for (i, repo) in repos.iter().enumerate() {
        output.push_str(&format!(
            "\n{}. {} ({} stars, {}): {} - {}",
            i + 1,
            repo.name,
            repo.stars,
            repo.language.as_deref().unwrap_or("unknown language"),
            repo.description.as_deref().unwrap_or("No description"),
            repo.url
        ));
    }
    output
}

#[async_trait]
impl StackTool for GitHubTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ToolKind {
        ToolKind::GitHub
    }

    fn supports_search(&self) -> bool {
        true
    }

    fn supports_process(&self) -> bool {
        true
    }

    async fn search(&self, query: &str) -> ToolResult<Vec<SearchHit>> {
        let repos = self.search_repositories(query).await?;
        Ok(repos.iter().map(repo_to_hit).collect())
    }

    async fn process(&self, text: &str) -> ToolResult<Option<String>> {
        let repos = self.search_repositories(text).await?;
        if repos.is_empty() {
            return Ok(None);
        }
        Ok(Some(format_repos(text, &repos)))
    }
}
