//! Application layer for chatstream
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{RenderSettings, RetryPolicy};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{ChatRequest, GatewayError, LlmGateway, StreamHandle},
    plot_executor::{NoPlotExecutor, PlotError, PlotExecutor, PlotImage},
    transcript_exporter::{ExportError, ExportFormat, ExportReceipt, TranscriptExporter},
};
pub use use_cases::export_history::ExportHistoryUseCase;
pub use use_cases::render_code::CodeRenderer;
pub use use_cases::retry::{Backoff, OVERLOADED_MESSAGE, RetryDecision, TurnFailure};
pub use use_cases::submit_turn::{SubmitTurnInput, SubmitTurnUseCase};
