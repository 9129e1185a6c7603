//! Message types exchanged with the completion endpoint.
//!
//! The serialized form is exactly `{ "role": ..., "content": ... }`, which is
//! what chat-completion endpoints accept and return.

use serde::{Deserialize, Serialize};

/// Role in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message (instructions to the model). Never displayed.
    System,
    /// User message.
    User,
    /// Assistant (model) response.
    #[default]
    Assistant,
}

impl Role {
    /// Label shown above a message in the transcript.
    pub fn label(self) -> &'static str {
        match self {
            Role::System => "System",
            Role::User => "You",
            Role::Assistant => "HealthBot",
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message author. Missing roles in responses read as assistant.
    #[serde(default)]
    pub role: Role,
    /// Message content.
    #[serde(default)]
    pub content: String,
}

impl Message {
    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Whether this message is shown in the transcript.
    pub fn is_visible(&self) -> bool {
        self.role != Role::System
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let user = Message::user("Hello");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content, "Hello");

        assert_eq!(Message::assistant("Hi").role, Role::Assistant);
        assert_eq!(Message::system("Be kind").role, Role::System);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::user("hello")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hello"}"#);
    }

    #[test]
    fn test_missing_role_defaults_to_assistant() {
        let msg: Message = serde_json::from_str(r#"{"content":"Hi there"}"#).unwrap();
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.content, "Hi there");
    }

    #[test]
    fn test_system_message_is_hidden() {
        assert!(!Message::system("x").is_visible());
        assert!(Message::user("x").is_visible());
        assert!(Message::assistant("x").is_visible());
    }
}
