//! Transcript message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::content::RichContent;

/// Who produced a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Typed by the user.
    User,
    /// Produced by the widget or the remote agent.
    Bot,
}

impl MessageRole {
    /// CSS class used for the message bubble.
    pub fn as_class(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Bot => "bot",
        }
    }
}

/// A single message shown in the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Raw message text.
    pub content: String,
    /// Author of the message.
    pub role: MessageRole,
    /// When the message was appended.
    pub timestamp: DateTime<Utc>,
}

impl MessageRecord {
    pub fn new(content: impl Into<String>, role: MessageRole) -> Self {
        Self {
            content: content.into(),
            role,
            timestamp: Utc::now(),
        }
    }

    /// Content prepared for rendering.
    ///
    /// Bot messages get their URLs turned into link segments; user messages
    /// are always plain text.
    pub fn rich_content(&self) -> RichContent {
        match self.role {
            MessageRole::Bot => RichContent::linkify(&self.content),
            MessageRole::User => RichContent::plain(&self.content),
        }
    }
}

/// Append-only, in-memory transcript.
///
/// Growth is unbounded for the lifetime of the widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHistory {
    messages: Vec<MessageRecord>,
}

impl MessageHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, content: impl Into<String>, role: MessageRole) -> &MessageRecord {
        self.messages.push(MessageRecord::new(content, role));
        &self.messages[self.messages.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageRecord> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&MessageRecord> {
        self.messages.last()
    }

    /// Messages appended at or after `index`.
    pub fn since(&self, index: usize) -> &[MessageRecord] {
        self.messages.get(index..).unwrap_or(&[])
    }

    pub fn as_slice(&self) -> &[MessageRecord] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_keeps_insertion_order() {
        let mut history = MessageHistory::new();
        history.push("hello", MessageRole::User);
        history.push("hi there", MessageRole::Bot);

        assert_eq!(history.len(), 2);
        let roles: Vec<_> = history.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![MessageRole::User, MessageRole::Bot]);
        assert_eq!(history.since(1).len(), 1);
        assert!(history.since(5).is_empty());
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&MessageRole::Bot).unwrap();
        assert_eq!(json, "\"bot\"");
    }
}
