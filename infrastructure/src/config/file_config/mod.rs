//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod api;
mod generation;
mod output;
mod render;
mod repl;
mod retry;

pub use api::{FileApiConfig, LEGACY_API_KEY_ENV};
pub use generation::FileGenerationConfig;
pub use output::FileOutputConfig;
pub use render::FileRenderConfig;
pub use repl::FileReplConfig;
pub use retry::FileRetryConfig;

use chatstream_domain::DomainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("api.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("api.api_key_env cannot be empty")]
    EmptyApiKeyEnv,

    #[error("{field} cannot be 0")]
    ZeroValue { field: &'static str },

    #[error("generation: {0}")]
    Generation(#[from] DomainError),

    #[error("render.python cannot be empty while rendering is enabled")]
    EmptyInterpreter,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Remote API connection
    pub api: FileApiConfig,
    /// Model and sampling defaults
    pub generation: FileGenerationConfig,
    /// Retry/backoff settings
    pub retry: FileRetryConfig,
    /// Plot rendering settings
    pub render: FileRenderConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// REPL settings
    pub repl: FileReplConfig,
}

impl FileConfig {
    /// Validate the entire configuration, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }
        if self.api.api_key_env.trim().is_empty() {
            return Err(ConfigValidationError::EmptyApiKeyEnv);
        }
        if self.api.timeout_seconds == 0 {
            return Err(ConfigValidationError::ZeroValue {
                field: "api.timeout_seconds",
            });
        }
        if self.api.connect_timeout_seconds == 0 {
            return Err(ConfigValidationError::ZeroValue {
                field: "api.connect_timeout_seconds",
            });
        }
        if self.retry.max_retries == 0 {
            return Err(ConfigValidationError::ZeroValue {
                field: "retry.max_retries",
            });
        }
        self.generation.to_params()?;
        if self.render.enabled {
            if self.render.python.trim().is_empty() {
                return Err(ConfigValidationError::EmptyInterpreter);
            }
            if self.render.timeout_seconds == 0 {
                return Err(ConfigValidationError::ZeroValue {
                    field: "render.timeout_seconds",
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatstream_domain::Model;
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[api]
api_key_env = "CLAUDE_KEY"
timeout_seconds = 60

[generation]
model = "opus"
temperature = 0.7
max_tokens = 8000
system_prompt = "Be brief."

[retry]
max_retries = 5
base_delay_ms = 250

[render]
enabled = false
python = "/usr/bin/python3.12"

[repl]
show_progress = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.api_key_env, "CLAUDE_KEY");
        assert_eq!(config.api.timeout_seconds, 60);
        assert_eq!(config.api.base_url, "https://api.anthropic.com");
        assert_eq!(config.generation.model, Model::Claude3Opus);
        assert_eq!(config.generation.max_tokens, 8000);
        assert_eq!(config.generation.system_prompt, "Be brief.");
        assert!(!config.render.enabled);
        assert!(!config.render.to_settings().enabled);
        assert!(!config.repl.show_progress);

        let policy = config.retry.to_policy();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.base_delay, Duration::from_millis(250));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[generation]
temperature = 0.3
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let params = config.generation.to_params().unwrap();
        assert_eq!(params.temperature(), 0.3);
        assert_eq!(params.max_tokens(), 4000);
        assert_eq!(params.model, Model::Claude35Sonnet);
        assert!(config.render.enabled);
        assert_eq!(config.render.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.retry.to_policy().max_retries, 3);
        assert_eq!(config.api.api_version, "2023-06-01");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = FileConfig::default();
        config.api.base_url = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::EmptyBaseUrl)
        ));

        let mut config = FileConfig::default();
        config.generation.max_tokens = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::Generation(DomainError::InvalidMaxTokens))
        ));

        let mut config = FileConfig::default();
        config.render.timeout_seconds = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::ZeroValue {
                field: "render.timeout_seconds"
            })
        ));

        config.render.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_model_is_kept_verbatim() {
        let config: FileConfig = toml::from_str("[generation]\nmodel = \"claude-next\"").unwrap();
        assert_eq!(
            config.generation.model,
            Model::Custom("claude-next".to_string())
        );
    }
}
