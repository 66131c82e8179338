//! Wire types for the Anthropic Messages API.
//!
//! # Stream overview
//!
//! A streamed reply is a sequence of server-sent events whose `data` is a JSON
//! object tagged by `type`:
//!
//! - `message_start`, `content_block_start`, `content_block_stop`,
//!   `message_delta`, `ping` and any type not listed here: ignored
//! - `content_block_delta` with a `text_delta`: a text fragment
//! - `message_stop`: the reply is complete
//! - `error`: an in-band failure; `overloaded_error` is the only kind the
//!   engine treats as an increment

use chatstream_application::{ChatRequest, GatewayError};
use chatstream_domain::{Message, StreamEvent};
use serde::{Deserialize, Serialize};

/// Error type the API reports when it is over capacity.
pub const OVERLOADED_ERROR: &str = "overloaded_error";

/// HTTP status the API uses for overload.
pub const STATUS_OVERLOADED: u16 = 529;

/// `POST /v1/messages` body
#[derive(Debug, Serialize)]
pub struct MessagesRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<&'a str>,
    pub stream: bool,
}

impl<'a> MessagesRequest<'a> {
    pub fn streaming(request: &'a ChatRequest) -> Self {
        Self {
            model: request.model.as_str(),
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: request.system.as_deref(),
            stream: true,
        }
    }
}

/// `data` payload of one server-sent event
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum SsePayload {
    MessageStart,
    ContentBlockStart,
    ContentBlockDelta { delta: BlockDelta },
    ContentBlockStop,
    MessageDelta,
    MessageStop,
    Ping,
    Error {
        error: ApiError,
    },
    /// Event types added to the stream later; skipped.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum BlockDelta {
    TextDelta {
        text: String,
    },
    #[serde(other)]
    Other,
}

/// Error object carried both in `error` events and in error response bodies
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ApiError,
}

/// Decode one event payload.
///
/// `Ok(None)` means the event carries nothing the engine needs.
pub fn decode_event(data: &str) -> Result<Option<StreamEvent>, GatewayError> {
    let payload: SsePayload = serde_json::from_str(data).map_err(|e| {
        GatewayError::StreamError(format!("Failed to parse stream event: {}", e))
    })?;

    Ok(match payload {
        SsePayload::ContentBlockDelta {
            delta: BlockDelta::TextDelta { text },
        } => Some(StreamEvent::Delta(text)),
        SsePayload::MessageStop => Some(StreamEvent::Completed),
        SsePayload::Error { error } if error.kind == OVERLOADED_ERROR => {
            Some(StreamEvent::Overloaded)
        }
        SsePayload::Error { error } => {
            return Err(GatewayError::StreamError(format!(
                "{}: {}",
                error.kind, error.message
            )));
        }
        SsePayload::ContentBlockDelta { .. }
        | SsePayload::MessageStart
        | SsePayload::ContentBlockStart
        | SsePayload::ContentBlockStop
        | SsePayload::MessageDelta
        | SsePayload::Ping
        | SsePayload::Unknown => None,
    })
}

/// Parse the error object out of a non-success response body.
pub fn parse_error_body(body: &str) -> Option<ApiError> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error)
}

/// Map a non-success HTTP status to a gateway error.
///
/// 529 (or an `overloaded_error` body) is overload; 401/403 and
/// 400/404/413 can never succeed on retry; everything else is transient.
pub fn classify_status(status: u16, body: &str) -> GatewayError {
    let error = parse_error_body(body);
    let message = match &error {
        Some(e) if !e.message.is_empty() => e.message.clone(),
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => "no response body".to_string(),
    };

    if status == STATUS_OVERLOADED || error.is_some_and(|e| e.kind == OVERLOADED_ERROR) {
        return GatewayError::Overloaded;
    }

    match status {
        401 | 403 => GatewayError::Authentication(message),
        400 | 404 | 413 => GatewayError::InvalidRequest(message),
        _ => GatewayError::Status { status, message },
    }
}
