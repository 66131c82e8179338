//! Generation defaults from TOML (`[generation]` section)

use chatstream_domain::core::params::DEFAULT_MAX_TOKENS;
use chatstream_domain::{DomainError, GenerationParams, Model};
use serde::{Deserialize, Serialize};

/// Per-turn generation defaults; the REPL can change them per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGenerationConfig {
    pub model: Model,
    pub temperature: f32,
    pub max_tokens: u32,
    /// System instruction sent with every turn; empty for none.
    pub system_prompt: String,
    /// Text every reply is forced to start with; empty for none.
    pub prefill: String,
}

impl Default for FileGenerationConfig {
    fn default() -> Self {
        Self {
            model: Model::default(),
            temperature: 0.0,
            max_tokens: DEFAULT_MAX_TOKENS,
            system_prompt: String::new(),
            prefill: String::new(),
        }
    }
}

impl FileGenerationConfig {
    pub fn to_params(&self) -> Result<GenerationParams, DomainError> {
        GenerationParams::new(self.model.clone(), self.temperature, self.max_tokens)
    }
}
