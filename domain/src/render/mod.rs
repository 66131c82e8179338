//! Render domain — pure text side of the code-render pass.
//!
//! - [`scanner`] — locate fenced `python` blocks and test for the plot directive
//! - [`source`] — rewrite a block body into executable source
//! - [`annotation`] — the markdown spliced after a block's closing fence
//!
//! Execution itself is a port of the application layer; nothing here runs code.

pub mod annotation;
pub mod scanner;
pub mod source;

/// Token that opts a block into inline plotting.
pub const PLOT_DIRECTIVE: &str = "%matplotlib inline";

/// Plotting library a qualifying block must reference.
pub const PLOT_LIBRARY: &str = "matplotlib";
