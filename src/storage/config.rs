//! JSON Configuration Management
//!
//! Reads the application configuration file and layers credentials from
//! the environment on top of it.

use std::fs;
use std::path::Path;

use agent_stack_core::{Secret, StackError, StackResult};

use crate::models::settings::{AppConfig, LogFormat};

/// Environment variables consulted for each credential, first match wins.
const OPENAI_KEY_VARS: &[&str] = &["OPENAI_API_KEY"];
const ANTHROPIC_KEY_VARS: &[&str] = &["ANTHROPIC_API_KEY"];
const HUGGINGFACE_KEY_VARS: &[&str] = &["HF_API_KEY", "HUGGINGFACE_API_KEY"];
const GITHUB_TOKEN_VARS: &[&str] = &["GITHUB_TOKEN"];
const WEATHER_KEY_VARS: &[&str] = &["OPENWEATHERMAP_API_KEY", "OPENWEATHER_API_KEY"];
const GMAIL_CREDENTIAL_VARS: &[&str] = &["GMAIL_CREDENTIALS"];

/// Load configuration from `path` (defaults when `None`), apply
/// environment overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> StackResult<AppConfig> {
    load_config_with(path, |name| std::env::var(name).ok())
}

/// [`load_config`] with an injectable environment lookup.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> StackResult<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => load_from_file(path)?,
        None => AppConfig::default(),
    };
    apply_env(&mut config, lookup);
    config.validate().map_err(StackError::configuration)?;
    Ok(config)
}

/// Load configuration from a file
fn load_from_file(path: &Path) -> StackResult<AppConfig> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            StackError::not_found(format!("config file {}", path.display()))
        }
        _ => StackError::Io(e),
    })?;
    let config: AppConfig = serde_json::from_str(&content)
        .map_err(|e| StackError::configuration(format!("invalid config {}: {}", path.display(), e)))?;
    tracing::debug!("[Config] loaded {}", path.display());
    Ok(config)
}

/// Environment values replace file values; blank variables are ignored.
pub fn apply_env<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let secret = |names: &[&str]| {
        names
            .iter()
            .find_map(|name| Secret::from_non_empty(lookup(*name).as_deref()))
    };

    let overrides = [
        (&mut config.openai_api_key, secret(OPENAI_KEY_VARS)),
        (&mut config.anthropic_api_key, secret(ANTHROPIC_KEY_VARS)),
        (&mut config.huggingface_api_key, secret(HUGGINGFACE_KEY_VARS)),
        (&mut config.github_token, secret(GITHUB_TOKEN_VARS)),
        (&mut config.weather_api_key, secret(WEATHER_KEY_VARS)),
        (&mut config.gmail_credentials, secret(GMAIL_CREDENTIAL_VARS)),
    ];
    for (slot, value) in overrides {
        if value.is_some() {
            *slot = value;
        }
    }

    if let Some(level) = lookup("AGENT_STACK_LOG").filter(|v| !v.trim().is_empty()) {
        config.log_level = level.trim().to_lowercase();
    }
    if let Some(format) = lookup("AGENT_STACK_LOG_FORMAT") {
        match format.trim().to_lowercase().as_str() {
            "json" => config.log_format = LogFormat::Json,
            "text" => config.log_format = LogFormat::Text,
            other => tracing::warn!("[Config] ignoring unknown log format '{}'", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_without_file() {
        let config = load_config_with(None, env(&[])).unwrap();
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    fn test_file_values_loaded() {
        let file = config_file(r#"{"anthropic_api_key": "ant-file", "include_trace": false}"#);
        let config = load_config_with(Some(file.path()), env(&[])).unwrap();
        assert_eq!(config.anthropic_api_key.unwrap().expose(), "ant-file");
        assert!(!config.include_trace);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = config_file(r#"{"openai_api_key": "sk-file", "github_token": "ghp-file"}"#);
        let config = load_config_with(
            Some(file.path()),
            env(&[("OPENAI_API_KEY", "sk-env"), ("GITHUB_TOKEN", "  ")]),
        )
        .unwrap();
        assert_eq!(config.openai_api_key.unwrap().expose(), "sk-env");
        // Blank variables leave the file value alone.
        assert_eq!(config.github_token.unwrap().expose(), "ghp-file");
    }

    #[test]
    fn test_alternate_variable_names() {
        let config = load_config_with(
            None,
            env(&[
                ("HUGGINGFACE_API_KEY", "hf-alt"),
                ("OPENWEATHER_API_KEY", "owm-alt"),
                ("AGENT_STACK_LOG_FORMAT", "json"),
            ]),
        )
        .unwrap();
        assert_eq!(config.huggingface_api_key.unwrap().expose(), "hf-alt");
        assert_eq!(config.weather_api_key.unwrap().expose(), "owm-alt");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_primary_variable_wins() {
        let config = load_config_with(
            None,
            env(&[("HF_API_KEY", "hf-primary"), ("HUGGINGFACE_API_KEY", "hf-alt")]),
        )
        .unwrap();
        assert_eq!(config.huggingface_api_key.unwrap().expose(), "hf-primary");
    }

    #[test]
    fn test_invalid_file_is_configuration_error() {
        let file = config_file("{ not json");
        let err = load_config_with(Some(file.path()), env(&[])).unwrap_err();
        assert!(matches!(err, StackError::Configuration(_)));

        let file = config_file(r#"{"request_timeout_secs": 0}"#);
        let err = load_config_with(Some(file.path()), env(&[])).unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_with(Some(&dir.path().join("absent.json")), env(&[])).unwrap_err();
        assert!(matches!(err, StackError::NotFound(_)));
    }
}
