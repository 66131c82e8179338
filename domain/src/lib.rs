//! Domain layer for chatstream
//!
//! This crate contains the conversation entities and the pure text logic that
//! the streaming engine is built on. It has no dependencies on transport,
//! process execution or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! A [`Session`] owns one conversation: the ordered user/assistant history and
//! a cooperative cancellation flag shared through [`StopHandle`].
//!
//! ## Turn Request
//!
//! [`TurnRequest`] is the ordered, role-tagged payload built fresh for every
//! call by [`assemble_turn`].
//!
//! ## Render
//!
//! The [`render`] module locates fenced plotting blocks in assistant text and
//! builds the annotations spliced into the *display* copy of a message.

pub mod core;
pub mod prompt;
pub mod render;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use core::{
    error::DomainError,
    model::Model,
    params::{GenerationParams, MAX_TEMPERATURE, MIN_TEMPERATURE},
};
pub use prompt::assembler::{TurnRequest, assemble_turn, normalize_prefill};
pub use render::{
    annotation::{error_annotation, image_annotation, numbered_listing},
    scanner::{CodeBlock, find_code_blocks, is_plot_block},
    source::prepare_plot_source,
};
pub use session::{
    entities::{Message, Role, Session, StopHandle},
    stream::StreamEvent,
    transcript::Transcript,
};
