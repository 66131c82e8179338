//! Remote API configuration from TOML (`[api]` section)

use serde::{Deserialize, Serialize};

/// Older env var name, still accepted when the primary one is unset.
pub const LEGACY_API_KEY_ENV: &str = "MY_ANTHROPIC_API_KEY";

/// Anthropic Messages API connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileApiConfig {
    /// Environment variable name for the API key (default: "ANTHROPIC_API_KEY").
    pub api_key_env: String,
    /// Base URL for the Anthropic API.
    pub base_url: String,
    /// Anthropic API version header.
    pub api_version: String,
    /// TCP connect timeout in seconds.
    pub connect_timeout_seconds: u64,
    /// Whole-request timeout in seconds, streaming included.
    pub timeout_seconds: u64,
}

impl Default for FileApiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            api_version: "2023-06-01".to_string(),
            connect_timeout_seconds: 10,
            timeout_seconds: 300,
        }
    }
}

impl FileApiConfig {
    /// Read the API key from the environment.
    ///
    /// Falls back to [`LEGACY_API_KEY_ENV`] when the configured variable is
    /// unset or blank.
    pub fn resolve_api_key(&self) -> Option<String> {
        [self.api_key_env.as_str(), LEGACY_API_KEY_ENV]
            .into_iter()
            .filter_map(|name| std::env::var(name).ok())
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
    }
}
