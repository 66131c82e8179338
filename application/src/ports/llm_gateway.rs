//! LLM Gateway port
//!
//! Defines how the application opens a streaming reply from the remote
//! text-generation API. Adapters decode the wire format into
//! [`StreamEvent`]s once, at the transport boundary.

use async_trait::async_trait;
use chatstream_domain::{GenerationParams, Message, Model, StreamEvent, TurnRequest};
use futures::stream::{BoxStream, Stream, StreamExt};
use thiserror::Error;

/// Out-of-band failures raised by the transport itself
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Upstream overloaded")]
    Overloaded,

    #[error("Stream error: {0}")]
    StreamError(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Gateway misconfigured: {0}")]
    Configuration(String),
}

impl GatewayError {
    /// Failures that cannot succeed on a retry of the same request.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GatewayError::Authentication(_)
                | GatewayError::InvalidRequest(_)
                | GatewayError::Configuration(_)
        )
    }
}

/// The outgoing call for one attempt of a turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: Model,
    pub messages: Vec<Message>,
    pub system: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    pub fn new(turn: &TurnRequest, params: &GenerationParams) -> Self {
        Self {
            model: params.model.clone(),
            messages: turn.messages.clone(),
            system: turn.system.clone(),
            temperature: params.temperature(),
            max_tokens: params.max_tokens(),
        }
    }
}

/// Handle for receiving the increments of one open stream.
///
/// Dropping the handle closes the underlying connection; no further reads
/// happen after that.
pub struct StreamHandle {
    inner: BoxStream<'static, Result<StreamEvent, GatewayError>>,
}

impl StreamHandle {
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<StreamEvent, GatewayError>> + Send + 'static,
    {
        Self {
            inner: stream.boxed(),
        }
    }

    /// Build a handle over an already-known sequence of increments.
    pub fn from_events(events: Vec<Result<StreamEvent, GatewayError>>) -> Self {
        Self::new(futures::stream::iter(events))
    }

    /// Await the next increment, `None` once the stream is exhausted.
    pub async fn next(&mut self) -> Option<Result<StreamEvent, GatewayError>> {
        self.inner.next().await
    }
}

/// Gateway for streaming LLM communication
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Open a fresh stream for `request`.
    async fn open_stream(&self, request: &ChatRequest) -> Result<StreamHandle, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatstream_domain::assemble_turn;

    #[test]
    fn test_fatal_classification() {
        assert!(GatewayError::Authentication("bad key".into()).is_fatal());
        assert!(GatewayError::InvalidRequest("x".into()).is_fatal());
        assert!(!GatewayError::Overloaded.is_fatal());
        assert!(!GatewayError::Timeout.is_fatal());
        assert!(
            !GatewayError::Status {
                status: 500,
                message: "boom".into()
            }
            .is_fatal()
        );
    }

    #[test]
    fn test_chat_request_carries_params() {
        let turn = assemble_turn([], "hi", "Sure,", "sys").unwrap();
        let params = GenerationParams::default().with_temperature(0.4).unwrap();
        let request = ChatRequest::new(&turn, &params);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.system.as_deref(), Some("sys"));
        assert_eq!(request.temperature, 0.4);
        assert_eq!(request.max_tokens, 4000);
    }

    #[tokio::test]
    async fn test_stream_handle_yields_in_order() {
        let mut handle = StreamHandle::from_events(vec![
            Ok(StreamEvent::Delta("a".into())),
            Ok(StreamEvent::Completed),
        ]);
        assert_eq!(handle.next().await, Some(Ok(StreamEvent::Delta("a".into()))));
        assert_eq!(handle.next().await, Some(Ok(StreamEvent::Completed)));
        assert_eq!(handle.next().await, None);
    }
}
