//! Session domain entities

use super::transcript::Transcript;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Role of a message in a turn request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A role-tagged message in a turn request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Cloneable handle onto a session's cancellation flag.
///
/// A turn holds the [`Session`] mutably for its whole duration, so a stop
/// request from outside the turn goes through a handle taken beforehand.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// Ask the in-flight turn to stop at its next poll point. Idempotent.
    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    pub(crate) fn reset(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// One conversation (Entity)
///
/// `user_messages` and `assistant_messages` have equal length except while a
/// turn is in flight, when exactly one user message is still unpaired.
#[derive(Debug)]
pub struct Session {
    id: String,
    user_messages: Vec<String>,
    assistant_messages: Vec<String>,
    stop: StopHandle,
}

impl Session {
    pub fn new() -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_messages: Vec::new(),
            assistant_messages: Vec::new(),
            stop: StopHandle::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn user_messages(&self) -> &[String] {
        &self.user_messages
    }

    pub fn assistant_messages(&self) -> &[String] {
        &self.assistant_messages
    }

    /// Completed `(user, assistant)` pairs in insertion order.
    ///
    /// An unpaired in-flight user message is not included.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.user_messages
            .iter()
            .zip(self.assistant_messages.iter())
            .map(|(u, a)| (u.as_str(), a.as_str()))
    }

    pub fn is_in_flight(&self) -> bool {
        self.user_messages.len() > self.assistant_messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.user_messages.is_empty() && self.assistant_messages.is_empty()
    }

    /// Record the user side of a new turn.
    pub fn begin_turn(&mut self, message: impl Into<String>) -> Result<(), DomainError> {
        if self.is_in_flight() {
            return Err(DomainError::TurnInFlight(self.id.clone()));
        }
        self.user_messages.push(message.into());
        Ok(())
    }

    /// Pair the in-flight user message with its assistant reply.
    pub fn commit_reply(&mut self, reply: impl Into<String>) -> Result<(), DomainError> {
        if !self.is_in_flight() {
            return Err(DomainError::NoTurnInFlight(self.id.clone()));
        }
        self.assistant_messages.push(reply.into());
        Ok(())
    }

    /// Drop the unpaired user message of an abandoned turn, if any.
    pub fn abandon_turn(&mut self) -> Option<String> {
        if self.is_in_flight() {
            self.user_messages.pop()
        } else {
            None
        }
    }

    /// Empty both message lists.
    pub fn clear(&mut self) {
        self.user_messages.clear();
        self.assistant_messages.clear();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn request_stop(&self) {
        self.stop.request_stop();
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop.is_stop_requested()
    }

    /// Clear the cancellation flag; called when a turn exits.
    pub fn reset_stop(&self) {
        self.stop.reset();
    }

    /// Snapshot of the committed history.
    pub fn transcript(&self) -> Transcript {
        Transcript::committed(self.user_messages.clone(), self.assistant_messages.clone())
    }

    /// Snapshot of the committed history with `buffer` as a provisional tail.
    pub fn transcript_with_tail(&self, buffer: &str) -> Transcript {
        let mut assistant_messages = self.assistant_messages.clone();
        assistant_messages.push(buffer.to_string());
        Transcript::provisional(self.user_messages.clone(), assistant_messages)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sessions_have_distinct_ids() {
        let a = Session::new();
        let b = Session::new();
        assert_ne!(a.id(), b.id());
        assert!(a.is_empty());
        assert!(!a.is_stop_requested());
    }

    #[test]
    fn test_turn_lifecycle_keeps_lists_paired() {
        let mut session = Session::with_id("s1");
        session.begin_turn("hi").unwrap();
        assert!(session.is_in_flight());
        assert_eq!(session.pairs().count(), 0);

        session.commit_reply("hello").unwrap();
        assert!(!session.is_in_flight());
        assert_eq!(session.pairs().collect::<Vec<_>>(), vec![("hi", "hello")]);
    }

    #[test]
    fn test_begin_turn_twice_is_rejected() {
        let mut session = Session::with_id("s1");
        session.begin_turn("one").unwrap();
        assert_eq!(
            session.begin_turn("two"),
            Err(DomainError::TurnInFlight("s1".to_string()))
        );
    }

    #[test]
    fn test_commit_without_turn_is_rejected() {
        let mut session = Session::with_id("s1");
        assert!(matches!(
            session.commit_reply("orphan"),
            Err(DomainError::NoTurnInFlight(_))
        ));
    }

    #[test]
    fn test_abandon_turn_restores_pairing() {
        let mut session = Session::with_id("s1");
        session.begin_turn("hi").unwrap();
        assert_eq!(session.abandon_turn(), Some("hi".to_string()));
        assert!(session.is_empty());
        assert_eq!(session.abandon_turn(), None);
    }

    #[test]
    fn test_stop_handle_shares_flag() {
        let session = Session::new();
        let handle = session.stop_handle();
        handle.request_stop();
        handle.request_stop();
        assert!(session.is_stop_requested());
        session.reset_stop();
        assert!(!handle.is_stop_requested());
    }

    #[test]
    fn test_clear_empties_history() {
        let mut session = Session::new();
        session.begin_turn("a").unwrap();
        session.commit_reply("b").unwrap();
        session.clear();
        assert!(session.is_empty());
    }

    #[test]
    fn test_transcript_with_tail_is_provisional() {
        let mut session = Session::new();
        session.begin_turn("a").unwrap();
        let view = session.transcript_with_tail("partial");
        assert!(view.is_provisional());
        assert_eq!(view.assistant_messages, vec!["partial".to_string()]);
        assert!(session.assistant_messages().is_empty());
    }

    #[test]
    fn test_message_role_serializes_lowercase() {
        let json = serde_json::to_value(Message::assistant("x")).unwrap();
        assert_eq!(json["role"], "assistant");
    }
}
