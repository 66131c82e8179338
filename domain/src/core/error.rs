//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid temperature: {0} (expected a finite number)")]
    InvalidTemperature(f32),

    #[error("max_tokens must be at least 1")]
    InvalidMaxTokens,

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("A turn is already in flight for session {0}")]
    TurnInFlight(String),

    #[error("No turn is in flight for session {0}")]
    NoTurnInFlight(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DomainError::InvalidMaxTokens.to_string(),
            "max_tokens must be at least 1"
        );
        assert_eq!(
            DomainError::TurnInFlight("abc".to_string()).to_string(),
            "A turn is already in flight for session abc"
        );
    }
}
