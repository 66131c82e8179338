//! Code-render configuration from TOML (`[render]` section)

use chatstream_application::RenderSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRenderConfig {
    /// Execute plot blocks and splice their output into the display.
    pub enabled: bool,
    /// Interpreter name or path, resolved through `PATH`.
    pub python: String,
    /// Wall-clock bound on one block, in seconds.
    pub timeout_seconds: u64,
    /// Memoized block results kept before the cache is reset.
    pub max_cached_blocks: usize,
}

impl Default for FileRenderConfig {
    fn default() -> Self {
        let settings = RenderSettings::default();
        Self {
            enabled: settings.enabled,
            python: "python3".to_string(),
            timeout_seconds: 30,
            max_cached_blocks: settings.max_cached_blocks,
        }
    }
}

impl FileRenderConfig {
    pub fn to_settings(&self) -> RenderSettings {
        RenderSettings {
            enabled: self.enabled,
            max_cached_blocks: self.max_cached_blocks,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
