//! Presentation layer for chatstream
//!
//! This crate contains CLI definitions, output formatters,
//! progress indicators, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, ReplCommand};
pub use cli::commands::Cli;
pub use config::ReplConfig;
pub use output::console::{ConsoleFormatter, StreamPrinter, StreamUpdate};
pub use progress::reporter::TurnProgress;
