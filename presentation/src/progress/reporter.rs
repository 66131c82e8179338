//! Spinner shown while a turn waits for its first increment

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct TurnProgress {
    bar: Option<ProgressBar>,
}

impl TurnProgress {
    /// Start a spinner, or a no-op indicator when `enabled` is false.
    pub fn start(enabled: bool) -> Self {
        if !enabled {
            return Self { bar: None };
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::spinner_style());
        bar.set_message("Waiting for the model...".dimmed().to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar: Some(bar) }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    pub fn is_active(&self) -> bool {
        self.bar.is_some()
    }

    /// Remove the spinner; later calls do nothing.
    pub fn clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for TurnProgress {
    fn drop(&mut self) {
        self.clear();
    }
}
