//! Anthropic Messages API adapter
//!
//! - [`protocol`]: request body and server-sent event payloads
//! - [`gateway`]: [`AnthropicGateway`], the [`LlmGateway`](chatstream_application::LlmGateway)
//!   implementation over `reqwest` + `reqwest-eventsource`

pub mod gateway;
pub mod protocol;

pub use gateway::{AnthropicConfig, AnthropicGateway};
