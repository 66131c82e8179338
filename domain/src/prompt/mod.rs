//! Prompt domain
//!
//! Builds the ordered, role-tagged request payload for one turn.

pub mod assembler;
