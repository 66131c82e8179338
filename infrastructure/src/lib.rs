//! Infrastructure layer for chatstream
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod anthropic;
pub mod config;
pub mod export;
pub mod logging;
pub mod plot;

// Re-export commonly used types
pub use anthropic::{AnthropicConfig, AnthropicGateway};
pub use config::{
    ConfigLoader, ConfigValidationError, FileApiConfig, FileConfig, FileGenerationConfig,
    FileOutputConfig, FileRenderConfig, FileReplConfig, FileRetryConfig,
};
pub use export::FileTranscriptExporter;
pub use logging::JsonlConversationLogger;
pub use plot::PythonPlotExecutor;
