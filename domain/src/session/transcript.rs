//! Transcript snapshots yielded to the front-end.

/// The `(user_messages, assistant_messages)` view yielded after each step of
/// a turn.
///
/// When `provisional` is set the last assistant entry is the in-flight buffer
/// and has not been committed to the session yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transcript {
    pub user_messages: Vec<String>,
    pub assistant_messages: Vec<String>,
    provisional: bool,
}

impl Transcript {
    pub fn committed(user_messages: Vec<String>, assistant_messages: Vec<String>) -> Self {
        Self {
            user_messages,
            assistant_messages,
            provisional: false,
        }
    }

    pub fn provisional(user_messages: Vec<String>, assistant_messages: Vec<String>) -> Self {
        Self {
            user_messages,
            assistant_messages,
            provisional: true,
        }
    }

    pub fn is_provisional(&self) -> bool {
        self.provisional
    }

    pub fn last_assistant(&self) -> Option<&str> {
        self.assistant_messages.last().map(String::as_str)
    }

    /// Pairs for display; trailing unpaired entries are dropped.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.user_messages
            .iter()
            .zip(self.assistant_messages.iter())
            .map(|(u, a)| (u.as_str(), a.as_str()))
    }

    /// Replace the assistant entries, e.g. with their rendered display copy.
    pub fn with_assistant_messages(self, assistant_messages: Vec<String>) -> Self {
        Self {
            assistant_messages,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_drop_unpaired_tail() {
        let view = Transcript::committed(vec!["a".into(), "b".into()], vec!["x".into()]);
        assert_eq!(view.pairs().collect::<Vec<_>>(), vec![("a", "x")]);
        assert!(!view.is_provisional());
    }

    #[test]
    fn test_with_assistant_messages_keeps_flag() {
        let view = Transcript::provisional(vec!["a".into()], vec!["x".into()])
            .with_assistant_messages(vec!["X".into()]);
        assert_eq!(view.last_assistant(), Some("X"));
        assert!(view.is_provisional());
    }
}
