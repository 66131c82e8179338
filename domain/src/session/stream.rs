//! Streaming increments for one turn.
//!
//! [`StreamEvent`] is the closed set of increments the transport decodes a
//! server-sent stream into. Out-of-band transport faults never appear here;
//! they travel as errors alongside the events.

/// A decoded increment of a streaming reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// An append-only text fragment.
    Delta(String),
    /// The upstream signalled it is overloaded (in-band failure).
    Overloaded,
    /// The reply finished normally.
    Completed,
}

impl StreamEvent {
    /// Returns the text fragment if this is a `Delta`.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamEvent::Delta(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if no further events follow this one.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Overloaded | StreamEvent::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_text_returns_content() {
        let event = StreamEvent::Delta("hello".to_string());
        assert_eq!(event.text(), Some("hello"));
        assert!(!event.is_terminal());
    }

    #[test]
    fn overloaded_and_completed_are_terminal() {
        assert!(StreamEvent::Overloaded.is_terminal());
        assert!(StreamEvent::Completed.is_terminal());
        assert_eq!(StreamEvent::Completed.text(), None);
    }
}
