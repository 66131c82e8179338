//! Prompt Assembler
//!
//! Flattens the committed history into alternating user/assistant messages,
//! appends the new user message and, when present, a trailing assistant
//! "prefill" the model continues from.

use crate::session::entities::Message;

/// Ordered request payload for one outgoing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRequest {
    /// History pairs, then the new user message, then the prefill entry if any.
    pub messages: Vec<Message>,
    /// System instruction, `None` when empty.
    pub system: Option<String>,
    prefill: Option<String>,
}

impl TurnRequest {
    /// The normalized prefill carried by the trailing assistant entry.
    pub fn prefill(&self) -> Option<&str> {
        self.prefill.as_deref()
    }

    /// Initial content of the assistant buffer before any increment arrives.
    pub fn seed_buffer(&self) -> String {
        self.prefill.clone().unwrap_or_default()
    }
}

/// Trailing-whitespace-trimmed prefill, or `None` if nothing remains.
///
/// The remote API rejects a final assistant message ending in whitespace.
pub fn normalize_prefill(prefill: &str) -> Option<String> {
    let trimmed = prefill.trim_end();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn normalize_system(system_prompt: &str) -> Option<String> {
    (!system_prompt.trim().is_empty()).then(|| system_prompt.to_string())
}

/// Build the request payload for `message`.
///
/// Returns `None` for a whitespace-only message: the turn short-circuits
/// without a network call.
pub fn assemble_turn<'a, I>(
    history: I,
    message: &str,
    prefill: &str,
    system_prompt: &str,
) -> Option<TurnRequest>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    if message.trim().is_empty() {
        return None;
    }

    let mut messages: Vec<Message> = history
        .into_iter()
        .flat_map(|(user, assistant)| [Message::user(user), Message::assistant(assistant)])
        .collect();
    messages.push(Message::user(message));

    let prefill = normalize_prefill(prefill);
    if let Some(text) = &prefill {
        messages.push(Message::assistant(text.clone()));
    }

    Some(TurnRequest {
        messages,
        system: normalize_system(system_prompt),
        prefill,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::entities::Role;

    #[test]
    fn test_first_turn_is_single_user_message() {
        let request = assemble_turn([], "hi", "", "").unwrap();
        assert_eq!(request.messages, vec![Message::user("hi")]);
        assert_eq!(request.system, None);
        assert_eq!(request.prefill(), None);
        assert_eq!(request.seed_buffer(), "");
    }

    #[test]
    fn test_history_is_flattened_in_order() {
        let history = [("q1", "a1"), ("q2", "a2")];
        let request = assemble_turn(history, "q3", "", "").unwrap();
        let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(request.messages[3].content, "a2");
        assert_eq!(request.messages[4].content, "q3");
    }

    #[test]
    fn test_prefill_is_trimmed_and_appended() {
        let request = assemble_turn([], "hi", "Sure,  \n", "").unwrap();
        assert_eq!(request.messages.last(), Some(&Message::assistant("Sure,")));
        assert_eq!(request.seed_buffer(), "Sure,");
    }

    #[test]
    fn test_whitespace_prefill_is_suppressed() {
        let request = assemble_turn([], "hi", "   ", "").unwrap();
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.prefill(), None);
    }

    #[test]
    fn test_system_prompt_is_empty_suppressed() {
        assert_eq!(assemble_turn([], "hi", "", "  ").unwrap().system, None);
        assert_eq!(
            assemble_turn([], "hi", "", "Be brief.").unwrap().system,
            Some("Be brief.".to_string())
        );
    }

    #[test]
    fn test_blank_message_short_circuits() {
        assert!(assemble_turn([("q", "a")], " \n\t", "Sure", "sys").is_none());
    }
}
