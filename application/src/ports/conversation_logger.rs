//! Port for structured conversation logging.
//!
//! Records turn lifecycle events (start, retries, completion, cancellation,
//! failure) to a machine-readable log. Human-readable diagnostics stay with
//! `tracing`; this port keeps the transcript-level record.

use serde_json::Value;

/// A structured conversation event.
pub struct ConversationEvent {
    /// Event type identifier (e.g. "turn_started", "retry_scheduled").
    pub event_type: &'static str,
    /// Event-specific fields.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Sink for conversation events.
///
/// `log` is synchronous and infallible so a broken log never disturbs a turn.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
