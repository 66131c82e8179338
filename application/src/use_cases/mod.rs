//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod export_history;
pub mod render_code;
pub mod retry;
pub mod submit_turn;
