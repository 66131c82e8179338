//! Code-render pass switches.

use serde::{Deserialize, Serialize};

/// Controls the code-render post-processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// When false the display copy equals the canonical text.
    pub enabled: bool,
    /// Executed blocks remembered per renderer before the memo is reset.
    pub max_cached_blocks: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_cached_blocks: 64,
        }
    }
}
