//! Application-level configuration.
//!
//! - [`RetryPolicy`] — bounded exponential backoff for a turn
//! - [`RenderSettings`] — code-render pass switches

pub mod render_settings;
pub mod retry_policy;

pub use render_settings::RenderSettings;
pub use retry_policy::RetryPolicy;
