//! Sampling parameters for a single turn.

use super::error::DomainError;
use super::model::Model;

pub const MIN_TEMPERATURE: f32 = 0.0;
pub const MAX_TEMPERATURE: f32 = 1.0;

/// Default output bound, matching the front-end slider default.
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Validated generation parameters (Value Object)
///
/// Temperature is clamped into `[MIN_TEMPERATURE, MAX_TEMPERATURE]`;
/// non-finite values are rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub model: Model,
    temperature: f32,
    max_tokens: u32,
}

impl GenerationParams {
    pub fn new(model: Model, temperature: f32, max_tokens: u32) -> Result<Self, DomainError> {
        if !temperature.is_finite() {
            return Err(DomainError::InvalidTemperature(temperature));
        }
        if max_tokens == 0 {
            return Err(DomainError::InvalidMaxTokens);
        }
        Ok(Self {
            model,
            temperature: temperature.clamp(MIN_TEMPERATURE, MAX_TEMPERATURE),
            max_tokens,
        })
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn with_temperature(self, temperature: f32) -> Result<Self, DomainError> {
        Self::new(self.model, temperature, self.max_tokens)
    }

    pub fn with_max_tokens(self, max_tokens: u32) -> Result<Self, DomainError> {
        Self::new(self.model, self.temperature, max_tokens)
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model: Model::default(),
            temperature: MIN_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = GenerationParams::default();
        assert_eq!(params.temperature(), 0.0);
        assert_eq!(params.max_tokens(), 4000);
        assert_eq!(params.model, Model::Claude35Sonnet);
    }

    #[test]
    fn test_temperature_is_clamped() {
        let params = GenerationParams::new(Model::default(), 1.7, 100).unwrap();
        assert_eq!(params.temperature(), 1.0);
        let params = params.with_temperature(-0.5).unwrap();
        assert_eq!(params.temperature(), 0.0);
    }

    #[test]
    fn test_rejects_nan_and_zero_tokens() {
        assert!(matches!(
            GenerationParams::new(Model::default(), f32::NAN, 100),
            Err(DomainError::InvalidTemperature(_))
        ));
        assert_eq!(
            GenerationParams::default().with_max_tokens(0),
            Err(DomainError::InvalidMaxTokens)
        );
    }
}
