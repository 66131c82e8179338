//! Conversation session domain.
//!
//! - [`entities::Session`] — one conversation's history and stop flag
//! - [`entities::StopHandle`] — shared handle for cooperative cancellation
//! - [`stream::StreamEvent`] — decoded streaming increments
//! - [`transcript::Transcript`] — a yielded view of the history

pub mod entities;
pub mod stream;
pub mod transcript;
