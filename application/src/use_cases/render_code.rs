//! Code-Render Post-Processor.
//!
//! Rewrites the *display* copy of assistant text: every closed
//! ```` ```python ```` block carrying the inline-plot directive is executed
//! and followed by its rendered image, or by a numbered listing and the fault
//! when execution fails. The canonical text is never modified, so rendering
//! the same input twice yields the same output.

use crate::config::RenderSettings;
use crate::ports::plot_executor::PlotExecutor;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chatstream_domain::util::log_preview;
use chatstream_domain::{
    error_annotation, find_code_blocks, image_annotation, is_plot_block, numbered_listing,
    prepare_plot_source,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Renders plot blocks into display text.
///
/// Annotations are memoized by prepared source, so the per-increment
/// re-render of a growing reply executes each finished block once. Entries
/// are never evicted; past `max_cached_blocks` new blocks are not memoized.
pub struct CodeRenderer {
    executor: Arc<dyn PlotExecutor>,
    settings: RenderSettings,
    memo: Mutex<HashMap<String, String>>,
}

impl CodeRenderer {
    pub fn new(executor: Arc<dyn PlotExecutor>) -> Self {
        Self::with_settings(executor, RenderSettings::default())
    }

    pub fn with_settings(executor: Arc<dyn PlotExecutor>, settings: RenderSettings) -> Self {
        Self {
            executor,
            settings,
            memo: Mutex::new(HashMap::new()),
        }
    }

    /// Display copy of `text`.
    pub async fn render(&self, text: &str) -> String {
        if !self.settings.enabled {
            return text.to_string();
        }

        let blocks = find_code_blocks(text);
        if !blocks.iter().any(|block| is_plot_block(block.body)) {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        for block in blocks {
            out.push_str(&text[cursor..block.end]);
            cursor = block.end;

            if !is_plot_block(block.body) {
                continue;
            }
            let source = prepare_plot_source(block.body);
            out.push_str(&self.annotation_for(&source).await);
        }
        out.push_str(&text[cursor..]);
        out
    }

    async fn annotation_for(&self, source: &str) -> String {
        let cached = self.memo.lock().ok().and_then(|m| m.get(source).cloned());
        if let Some(hit) = cached {
            return hit;
        }

        let annotation = match self.executor.execute(source).await {
            Ok(image) => {
                debug!(bytes = image.png.len(), "Rendered plot block");
                image_annotation(&BASE64.encode(&image.png))
            }
            Err(e) => {
                warn!(
                    error = %e,
                    source = %log_preview(&numbered_listing(source), 2000),
                    "Plot block failed"
                );
                error_annotation(source, &e.to_string())
            }
        };

        if let Ok(mut memo) = self.memo.lock() {
            // A full memo keeps what it has; later blocks run on every render.
            if memo.len() < self.settings.max_cached_blocks {
                memo.insert(source.to_string(), annotation.clone());
            } else {
                debug!(cached = memo.len(), "Render memo full, not caching block");
            }
        }
        annotation
    }
}
