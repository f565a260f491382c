//! Tool Registry
//!
//! Static mapping from a tool spec to its adapter.

use std::time::Duration;

use agent_stack_core::{resolve_credential, Secret, ToolKind, ToolSpec, DEFAULT_MAX_RESULTS};

use crate::duckduckgo::DuckDuckGoTool;
use crate::error::{ToolError, ToolResult};
use crate::github::GitHubTool;
use crate::gmail::{GmailCredentials, GmailTool};
use crate::http::{build_http_client, DEFAULT_TIMEOUT_SECS};
use crate::trait_def::StackTool;
use crate::weather::WeatherTool;

/// Application-supplied credentials for tools whose node leaves them unset.
#[derive(Debug, Clone)]
pub struct ToolDefaults {
    pub github_token: Option<Secret>,
    pub weather_api_key: Option<Secret>,
    pub gmail_credentials: Option<Secret>,
    pub timeout: Duration,
}

impl Default for ToolDefaults {
    fn default() -> Self {
        Self {
            github_token: None,
            weather_api_key: None,
            gmail_credentials: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Build the adapter for a tool spec.
///
/// Weather and Gmail fail with `MissingCredential` when no credential can be
/// resolved; GitHub runs unauthenticated instead.
pub fn build_tool(spec: &ToolSpec, defaults: &ToolDefaults) -> ToolResult<Box<dyn StackTool>> {
    let name = spec.name.clone();

    let tool: Box<dyn StackTool> = match &spec.kind {
        ToolKind::DuckDuckGo => {
            let max_results = spec.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
            Box::new(DuckDuckGoTool::new(name, max_results, build_http_client(defaults.timeout)?))
        }
        ToolKind::GitHub => {
            let token = resolve_credential(spec.credential.as_ref(), defaults.github_token.as_ref());
            Box::new(GitHubTool::new(name, token, build_http_client(defaults.timeout)?))
        }
        ToolKind::Weather => {
            let api_key =
                resolve_credential(spec.credential.as_ref(), defaults.weather_api_key.as_ref())
                    .ok_or_else(|| ToolError::missing_credential(spec.display_name()))?;
            Box::new(WeatherTool::new(name, api_key, build_http_client(defaults.timeout)?))
        }
        ToolKind::Gmail => {
            let raw = resolve_credential(spec.credential.as_ref(), defaults.gmail_credentials.as_ref())
                .ok_or_else(|| ToolError::missing_credential(spec.display_name()))?;
            let credentials = GmailCredentials::parse(&raw)?;
            let read_only = spec.read_only.unwrap_or(true);
            Box::new(GmailTool::new(
                name,
                credentials,
                read_only,
                build_http_client(defaults.timeout)?,
            ))
        }
        ToolKind::Unsupported(tag) => {
            return Err(ToolError::Unsupported { tag: tag.clone() });
        }
    };

    tracing::debug!("[Tools] built {} adapter '{}'", spec.kind, tool.name());
    Ok(tool)
}
