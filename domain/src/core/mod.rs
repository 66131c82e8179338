//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`] — remote model identifiers
//! - [`params::GenerationParams`] — validated sampling parameters for one turn
//! - [`error::DomainError`] — domain-level errors

pub mod error;
pub mod model;
pub mod params;
