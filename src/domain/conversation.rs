//! Conversation history types.
//!
//! A conversation is an append-only, chronological sequence of turns.
//! Turns are immutable once appended; ordering is the append order.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::foundation::Timestamp;

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The student chatting with the advisor.
    User,
    /// The advisor's reply.
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "Student"),
            Role::Assistant => write!(f, "Advisor"),
        }
    }
}

/// A single turn in the advising conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    pub timestamp: Timestamp,
}

impl ConversationTurn {
    /// Creates a user turn stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Timestamp::now(),
        }
    }

    /// Creates an assistant turn stamped with the current time.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Timestamp::now(),
        }
    }
}

/// Renders the conversation as a plain transcript for prompt embedding.
pub fn render_transcript(turns: &[ConversationTurn]) -> String {
    turns
        .iter()
        .map(|turn| format!("{}: {}", turn.role, turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Returns the content of the most recent user turn, if any.
pub fn last_user_message(turns: &[ConversationTurn]) -> Option<&str> {
    turns
        .iter()
        .rev()
        .find(|turn| turn.role == Role::User)
        .map(|turn| turn.content.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn turn_serializes_with_iso_timestamp() {
        let turn = ConversationTurn::user("I want to be a nurse");
        let json = serde_json::to_value(&turn).unwrap();

        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "I want to be a nurse");
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn transcript_preserves_append_order() {
        let turns = vec![
            ConversationTurn::assistant("Hi! What career interests you?"),
            ConversationTurn::user("Nursing"),
            ConversationTurn::assistant("What's your current education level?"),
        ];

        let transcript = render_transcript(&turns);
        let lines: Vec<&str> = transcript.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Advisor:"));
        assert!(lines[1].starts_with("Student: Nursing"));
        assert!(lines[2].starts_with("Advisor:"));
    }

    #[test]
    fn last_user_message_skips_assistant_turns() {
        let turns = vec![
            ConversationTurn::user("I have a GED"),
            ConversationTurn::assistant("Got it. What's your target?"),
        ];

        assert_eq!(last_user_message(&turns), Some("I have a GED"));
        assert_eq!(last_user_message(&[]), None);
    }
}
