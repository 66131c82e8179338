//! Retry/Backoff Controller.
//!
//! Classifies why an attempt of a turn failed and decides whether another
//! attempt follows and after how long. Each attempt restarts the stream from
//! scratch; the caller discards the failed attempt's buffer.

use crate::config::RetryPolicy;
use crate::ports::llm_gateway::GatewayError;
use std::time::Duration;

/// Committed as the assistant message when overload outlasts every attempt.
pub const OVERLOADED_MESSAGE: &str =
    "The model is currently overloaded. Please try again later.";

/// Why an attempt did not produce a reply.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnFailure {
    /// In-band overload signal (or HTTP 529).
    Overloaded,
    /// Out-of-band transport or protocol fault worth retrying.
    Transient(String),
    /// Fault a retry cannot fix, e.g. a rejected API key.
    Fatal(String),
    /// The stream ended normally without any text.
    EmptyResponse,
}

impl TurnFailure {
    pub fn from_gateway(error: &GatewayError) -> Self {
        match error {
            GatewayError::Overloaded => TurnFailure::Overloaded,
            e if e.is_fatal() => TurnFailure::Fatal(e.to_string()),
            e => TurnFailure::Transient(e.to_string()),
        }
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(self, TurnFailure::Fatal(_))
    }

    /// Short tag used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TurnFailure::Overloaded => "overloaded",
            TurnFailure::Transient(_) => "transient",
            TurnFailure::Fatal(_) => "fatal",
            TurnFailure::EmptyResponse => "empty_response",
        }
    }

    /// Assistant message committed once no attempts remain.
    pub fn committed_message(&self) -> String {
        match self {
            TurnFailure::Overloaded => OVERLOADED_MESSAGE.to_string(),
            TurnFailure::Transient(description) | TurnFailure::Fatal(description) => {
                format!("An error occurred: {description}")
            }
            TurnFailure::EmptyResponse => {
                "An error occurred: the model returned an empty response".to_string()
            }
        }
    }
}

/// What happens after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep for the given delay, then start the next attempt.
    RetryAfter(Duration),
    /// No attempts remain (or the failure is fatal).
    GiveUp,
}

/// Attempt counter for one turn.
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: RetryPolicy,
    attempt: u32,
}

impl Backoff {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy, attempt: 0 }
    }

    /// Zero-indexed number of the current attempt.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Record a failure of the current attempt.
    pub fn on_failure(&mut self, failure: &TurnFailure) -> RetryDecision {
        if !failure.is_retryable() {
            return RetryDecision::GiveUp;
        }
        let next = self.attempt + 1;
        if !self.policy.allows(next) {
            return RetryDecision::GiveUp;
        }
        self.attempt = next;
        RetryDecision::RetryAfter(self.policy.delay_before(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(
            TurnFailure::from_gateway(&GatewayError::Overloaded),
            TurnFailure::Overloaded
        );
        assert!(matches!(
            TurnFailure::from_gateway(&GatewayError::Timeout),
            TurnFailure::Transient(_)
        ));
        assert!(matches!(
            TurnFailure::from_gateway(&GatewayError::Authentication("no".into())),
            TurnFailure::Fatal(_)
        ));
    }

    #[test]
    fn test_backoff_schedule_with_three_attempts() {
        let mut backoff = Backoff::new(RetryPolicy::default());
        let failure = TurnFailure::Transient("reset".into());

        assert_eq!(
            backoff.on_failure(&failure),
            RetryDecision::RetryAfter(Duration::from_secs(2))
        );
        assert_eq!(backoff.attempt(), 1);
        assert_eq!(
            backoff.on_failure(&failure),
            RetryDecision::RetryAfter(Duration::from_secs(4))
        );
        assert_eq!(backoff.attempt(), 2);
        assert_eq!(backoff.on_failure(&failure), RetryDecision::GiveUp);
        assert_eq!(backoff.attempt(), 2);
    }

    #[test]
    fn test_fatal_gives_up_immediately() {
        let mut backoff = Backoff::new(RetryPolicy::default());
        assert_eq!(
            backoff.on_failure(&TurnFailure::Fatal("bad key".into())),
            RetryDecision::GiveUp
        );
    }

    #[test]
    fn test_committed_messages() {
        assert_eq!(TurnFailure::Overloaded.committed_message(), OVERLOADED_MESSAGE);
        assert_eq!(
            TurnFailure::Transient("Request timed out".into()).committed_message(),
            "An error occurred: Request timed out"
        );
    }
}
