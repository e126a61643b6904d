//! Conversation message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// Message typed (or spoken) by the user.
    User,
    /// Message produced by the engine.
    Bot,
}

/// A single message in a conversation.
///
/// Messages are immutable once created; ordering is insertion order.
/// Transient messages ("Listening...", the synthetic welcome) are visible in
/// the transcript but never persisted and are removed when their moment
/// passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The message text.
    pub text: String,
    /// Who sent it.
    pub sender: Sender,
    /// When it was created.
    pub timestamp: DateTime<Utc>,
    /// True = not persisted / auto-removed.
    #[serde(default)]
    pub transient: bool,
}

impl Message {
    /// Creates a user message stamped with the current time.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
            transient: false,
        }
    }

    /// Creates a bot message stamped with the current time.
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
            timestamp: Utc::now(),
            transient: false,
        }
    }

    /// Creates a transient bot message (shown, never persisted).
    pub fn transient_bot(text: impl Into<String>) -> Self {
        Self {
            transient: true,
            ..Self::bot(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let user = Message::user("hello");
        assert_eq!(user.sender, Sender::User);
        assert!(!user.transient);

        let bot = Message::transient_bot("Listening...");
        assert_eq!(bot.sender, Sender::Bot);
        assert!(bot.transient);
    }

    #[test]
    fn test_transient_defaults_to_false_on_deserialize() {
        let json = r#"{"text":"hi","sender":"user","timestamp":"2024-01-01T00:00:00Z"}"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert!(!message.transient);
    }
}
