//! Settings Models
//!
//! Application configuration: provider and tool credentials, endpoints,
//! timeouts and logging. Loaded once at startup by
//! [`crate::storage::config::load_config`].

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use agent_stack_core::Secret;
use agent_stack_llm::ProviderDefaults;
use agent_stack_tools::ToolDefaults;

/// Default per-call timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Application configuration stored in config.json
///
/// Credential fields are [`Secret`]s, so serializing a config for display
/// prints placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub openai_api_key: Option<Secret>,
    pub anthropic_api_key: Option<Secret>,
    pub huggingface_api_key: Option<Secret>,
    /// OpenAI-compatible endpoint override
    pub openai_base_url: Option<String>,
    pub anthropic_base_url: Option<String>,
    pub huggingface_base_url: Option<String>,
    pub github_token: Option<Secret>,
    /// OpenWeatherMap API key
    pub weather_api_key: Option<Secret>,
    /// Gmail credentials JSON `{client_id, client_secret, refresh_token}`
    pub gmail_credentials: Option<Secret>,
    /// Timeout for every LLM and tool call
    pub request_timeout_secs: u64,
    /// Root of the JSON stack/session store
    pub data_dir: Option<PathBuf>,
    /// Return the execution trace with each response
    pub include_trace: bool,
    pub log_format: LogFormat,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            huggingface_api_key: None,
            openai_base_url: None,
            anthropic_base_url: None,
            huggingface_base_url: None,
            github_token: None,
            weather_api_key: None,
            gmail_credentials: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            data_dir: None,
            include_trace: true,
            log_format: LogFormat::Text,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 600 {
            return Err(format!(
                "request_timeout_secs must be between 1 and 600, got {}",
                self.request_timeout_secs
            ));
        }

        for (field, value) in [
            ("openai_base_url", &self.openai_base_url),
            ("anthropic_base_url", &self.anthropic_base_url),
            ("huggingface_base_url", &self.huggingface_base_url),
        ] {
            if let Some(url) = value {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(format!("{} must be an http(s) URL: {}", field, url));
                }
            }
        }

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level: {}. Must be one of {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// LLM credentials and endpoints for the backend registry.
    pub fn provider_defaults(&self) -> ProviderDefaults {
        ProviderDefaults {
            openai_api_key: self.openai_api_key.clone(),
            anthropic_api_key: self.anthropic_api_key.clone(),
            huggingface_api_key: self.huggingface_api_key.clone(),
            openai_base_url: self.openai_base_url.clone(),
            anthropic_base_url: self.anthropic_base_url.clone(),
            huggingface_base_url: self.huggingface_base_url.clone(),
            timeout: self.request_timeout(),
        }
    }

    /// Tool credentials for the tool registry.
    pub fn tool_defaults(&self) -> ToolDefaults {
        ToolDefaults {
            github_token: self.github_token.clone(),
            weather_api_key: self.weather_api_key.clone(),
            gmail_credentials: self.gmail_credentials.clone(),
            timeout: self.request_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.request_timeout_secs, 60);
        assert!(config.include_trace);
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"openai_api_key": "sk-abc", "log_format": "json"}"#).unwrap();
        assert_eq!(config.openai_api_key.as_ref().map(Secret::expose), Some("sk-abc"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.request_timeout_secs = 30;
        config.openai_base_url = Some("localhost:8080".to_string());
        assert!(config.validate().unwrap_err().contains("openai_base_url"));

        config.openai_base_url = None;
        config.log_level = "loud".to_string();
        assert!(config.validate().unwrap_err().contains("log_level"));
    }

    #[test]
    fn test_defaults_carry_credentials_and_timeout() {
        let config = AppConfig {
            anthropic_api_key: Some(Secret::new("ant")),
            weather_api_key: Some(Secret::new("owm")),
            request_timeout_secs: 15,
            ..Default::default()
        };
        let providers = config.provider_defaults();
        let tools = config.tool_defaults();
        assert_eq!(providers.anthropic_api_key.unwrap().expose(), "ant");
        assert_eq!(providers.timeout, Duration::from_secs(15));
        assert_eq!(tools.weather_api_key.unwrap().expose(), "owm");
        assert!(tools.github_token.is_none());
    }

    #[test]
    fn test_serialized_config_hides_credentials() {
        let config = AppConfig {
            github_token: Some(Secret::new("ghp_secret")),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("ghp_secret"));
        assert!(!format!("{:?}", config).contains("ghp_secret"));
    }
}
