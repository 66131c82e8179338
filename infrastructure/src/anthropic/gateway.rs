//! Anthropic LLM Gateway implementation

use super::protocol::{MessagesRequest, classify_status, decode_event};
use async_trait::async_trait;
use chatstream_application::{ChatRequest, GatewayError, LlmGateway, StreamHandle};
use chatstream_domain::StreamEvent;
use futures::{Stream, StreamExt};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest_eventsource::{Event, EventSource, retry::Never};
use std::time::Duration;
use tracing::{debug, info};

/// Connection settings for [`AnthropicGateway`]
#[derive(Clone)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub base_url: String,
    pub api_version: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl AnthropicConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.anthropic.com".to_string(),
            api_version: "2023-06-01".to_string(),
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(300),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_timeouts(mut self, connect: Duration, total: Duration) -> Self {
        self.connect_timeout = connect;
        self.timeout = total;
        self
    }
}

impl std::fmt::Debug for AnthropicConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("connect_timeout", &self.connect_timeout)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// LLM Gateway over the Anthropic Messages API
///
/// Every `open_stream` call issues one fresh `POST /v1/messages`. The event
/// source never reconnects on its own; retries are the caller's decision.
pub struct AnthropicGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl AnthropicGateway {
    pub fn new(config: AnthropicConfig) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        let mut api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| GatewayError::Configuration("API key is not a valid header".into()))?;
        api_key.set_sensitive(true);
        headers.insert("x-api-key", api_key);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(&config.api_version).map_err(|_| {
                GatewayError::Configuration("API version is not a valid header".into())
            })?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Configuration(e.to_string()))?;

        let endpoint = format!("{}/v1/messages", config.base_url.trim_end_matches('/'));
        info!("AnthropicGateway initialized ({})", endpoint);

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LlmGateway for AnthropicGateway {
    async fn open_stream(&self, request: &ChatRequest) -> Result<StreamHandle, GatewayError> {
        let body = MessagesRequest::streaming(request);
        debug!(
            model = body.model,
            messages = body.messages.len(),
            "Opening stream"
        );

        let builder = self.client.post(&self.endpoint).json(&body);
        let mut source = EventSource::new(builder)
            .map_err(|e| GatewayError::Configuration(e.to_string()))?;
        source.set_retry_policy(Box::new(Never));

        // Status and content-type failures surface before the first message.
        match source.next().await {
            Some(Ok(Event::Open)) => {}
            Some(Ok(Event::Message(message))) => {
                source.close();
                return Err(GatewayError::StreamError(format!(
                    "Received '{}' before the stream opened",
                    message.event
                )));
            }
            Some(Err(e)) => {
                source.close();
                return Err(open_error(e).await);
            }
            None => {
                return Err(GatewayError::StreamError(
                    "Stream closed before opening".into(),
                ));
            }
        }

        Ok(StreamHandle::new(decode_stream(source)))
    }
}

/// Decode the remaining events of an open source.
///
/// Ends after the first terminal event or the first fault.
fn decode_stream(
    mut source: EventSource,
) -> impl Stream<Item = Result<StreamEvent, GatewayError>> + Send + 'static {
    async_stream::stream! {
        while let Some(event) = source.next().await {
            match event {
                Ok(Event::Open) => continue,
                Ok(Event::Message(message)) => match decode_event(&message.data) {
                    Ok(Some(event)) => {
                        let terminal = event.is_terminal();
                        yield Ok(event);
                        if terminal {
                            break;
                        }
                    }
                    Ok(None) => continue,
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                },
                Err(reqwest_eventsource::Error::StreamEnded) => break,
                Err(e) => {
                    yield Err(stream_error(e));
                    break;
                }
            }
        }
        source.close();
    }
}

async fn open_error(error: reqwest_eventsource::Error) -> GatewayError {
    match error {
        reqwest_eventsource::Error::InvalidStatusCode(status, response) => {
            let body = response.text().await.unwrap_or_default();
            classify_status(status.as_u16(), &body)
        }
        reqwest_eventsource::Error::InvalidContentType(content_type, _) => {
            GatewayError::StreamError(format!(
                "Expected an event stream, got {}",
                content_type.to_str().unwrap_or("a non-text content type")
            ))
        }
        other => stream_error(other),
    }
}

fn stream_error(error: reqwest_eventsource::Error) -> GatewayError {
    match error {
        reqwest_eventsource::Error::Transport(e) if e.is_timeout() => GatewayError::Timeout,
        reqwest_eventsource::Error::Transport(e) if e.is_connect() => {
            GatewayError::ConnectionError(e.to_string())
        }
        other => GatewayError::StreamError(other.to_string()),
    }
}
