//! Gmail Lookup (read-only)
//!
//! Searches the mailbox for messages matching the request text and lists
//! subject, sender and snippet. The OAuth access token is refreshed on
//! every call from the stored refresh token.

use async_trait::async_trait;
use serde::Deserialize;

use agent_stack_core::{Secret, ToolKind};

use crate::error::{ToolError, ToolResult};
use crate::http::send_json;
use crate::trait_def::StackTool;

const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1";
const TOKEN_REFRESH_URL: &str = "https://oauth2.googleapis.com/token";

const TOOL_NAME: &str = "Gmail";

/// Messages listed per lookup
const MAX_MESSAGES: u32 = 5;

/// OAuth client credentials stored on the tool node as JSON text.
#[derive(Clone, Deserialize)]
pub struct GmailCredentials {
    pub client_id: String,
    pub client_secret: Secret,
    pub refresh_token: Secret,
}

impl std::fmt::Debug for GmailCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GmailCredentials")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl GmailCredentials {
    /// Parse the credentials JSON. The error never echoes the input.
    pub fn parse(raw: &Secret) -> ToolResult<Self> {
        serde_json::from_str(raw.expose()).map_err(|e| {
            ToolError::invalid_config(
                TOOL_NAME,
                format!(
                    "credentials must be JSON with client_id, client_secret and refresh_token (line {}, column {})",
                    e.line(),
                    e.column()
                ),
            )
        })
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Default, Deserialize)]
struct MessageList {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GmailMessage {
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    payload: Option<MessagePayload>,
}

#[derive(Debug, Deserialize)]
struct MessagePayload {
    #[serde(default)]
    headers: Vec<MessageHeader>,
}

#[derive(Debug, Deserialize)]
struct MessageHeader {
    name: String,
    value: String,
}

/// Subject, sender and snippet of one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSummary {
    pub subject: String,
    pub from: String,
    pub snippet: String,
}

impl From<GmailMessage> for MessageSummary {
    fn from(message: GmailMessage) -> Self {
        let headers = message.payload.map(|p| p.headers).unwrap_or_default();
        let header = |name: &str| {
            headers
                .iter()
                .find(|h| h.name.eq_ignore_ascii_case(name))
                .map(|h| h.value.clone())
                .unwrap_or_default()
        };
        Self {
            subject: header("Subject"),
            from: header("From"),
            snippet: message.snippet,
        }
    }
}

/// Gmail tool
pub struct GmailTool {
    name: String,
    credentials: GmailCredentials,
    client: reqwest::Client,
}

impl GmailTool {
    pub fn new(
        name: Option<String>,
        credentials: GmailCredentials,
        read_only: bool,
        client: reqwest::Client,
    ) -> Self {
        if !read_only {
            tracing::warn!("[Gmail] write access requested; only read operations are available");
        }
        Self {
            name: name.unwrap_or_else(|| TOOL_NAME.to_string()),
            credentials,
            client,
        }
    }

    async fn access_token(&self) -> ToolResult<String> {
        let request = self.client.post(TOKEN_REFRESH_URL).form(&[
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.expose()),
            ("refresh_token", self.credentials.refresh_token.expose()),
            ("grant_type", "refresh_token"),
        ]);
        let token: TokenResponse = send_json(request, TOOL_NAME).await?;
        Ok(token.access_token)
    }

    /// Messages matching a Gmail search query, newest first.
    pub async fn find_messages(&self, query: &str) -> ToolResult<Vec<MessageSummary>> {
        let token = self.access_token().await?;

        let max = MAX_MESSAGES.to_string();
        let request = self
            .client
            .get(format!("{}/users/me/messages", GMAIL_API_BASE))
            .bearer_auth(&token)
            .query(&[("q", query), ("maxResults", max.as_str())]);
        let list: MessageList = send_json(request, TOOL_NAME).await?;

        let mut summaries = Vec::with_capacity(list.messages.len());
        for message in &list.messages {
            let request = self
                .client
                .get(format!("{}/users/me/messages/{}", GMAIL_API_BASE, message.id))
                .bearer_auth(&token)
                .query(&[
                    ("format", "metadata"),
                    ("metadataHeaders", "Subject"),
                    ("metadataHeaders", "From"),
                ]);
            let full: GmailMessage = send_json(request, TOOL_NAME).await?;
            summaries.push(MessageSummary::from(full));
        }
        Ok(summaries)
    }
}

fn format_messages(messages: &[MessageSummary]) -> String {
    let mut output = String::from("Matching emails:");
    for message in messages {
        let subject = if message.subject.is_empty() {
            "(no subject)"
        } else {
            &message.subject
        };
        output.push_str(&format!("\n- {} (from {}): {}", subject, message.from, message.snippet));
    }
    output
}

#[async_trait]
impl StackTool for GmailTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ToolKind {
        ToolKind::Gmail
    }

    fn supports_process(&self) -> bool {
        true
    }

    async fn process(&self, text: &str) -> ToolResult<Option<String>> {
        let messages = self.find_messages(text.trim()).await?;
        tracing::debug!("[Gmail] {} matching messages", messages.len());
        if messages.is_empty() {
            return Ok(None);
        }
        Ok(Some(format_messages(&messages)))
    }
}
