//! Conversation messages.
//!
//! A [`Conversation`] is the ordered list of [`Message`]s shown to the user.
//! It only grows, except that a loading placeholder is removed once the chat
//! request it stands in for resolves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Typed by the user.
    User,
    /// Produced by the backend (or the client on its behalf).
    Bot,
}

/// Identifier carried only by loading placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loading-{}", self.0)
    }
}

/// A single entry in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Set only on loading placeholders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<MessageId>,
    /// Message text (markdown).
    pub text: String,
    /// Author of the message.
    pub sender: Sender,
    /// Attributions, de-duplicated in first-seen order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    /// When the message was created.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            sender: Sender::User,
            sources: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Create a bot message. Duplicate sources are dropped.
    pub fn bot<I, S>(text: impl Into<String>, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: None,
            text: text.into(),
            sender: Sender::Bot,
            sources: dedup_sources(sources),
            timestamp: Utc::now(),
        }
    }

    /// Create a loading placeholder with the given id.
    pub fn placeholder(id: MessageId) -> Self {
        Self {
            id: Some(id),
            text: String::new(),
            sender: Sender::Bot,
            sources: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Whether this is a loading placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.id.is_some()
    }

    /// The `Sources: a, b, c` line, or `None` when there are no sources.
    pub fn sources_line(&self) -> Option<String> {
        if self.sources.is_empty() {
            None
        } else {
            Some(format!("Sources: {}", self.sources.join(", ")))
        }
    }
}

/// Remove duplicate sources, keeping the first occurrence of each.
pub fn dedup_sources<I, S>(sources: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .map(Into::into)
        .filter(|source| seen.insert(source.clone()))
        .collect()
}

/// Ordered, append-only list of messages.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Create an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Append a new loading placeholder and return its id.
    pub fn push_placeholder(&mut self) -> MessageId {
        let id = MessageId::new();
        self.messages.push(Message::placeholder(id));
        id
    }

    /// Remove the placeholder with `id`. Returns whether one was removed.
    pub fn remove(&mut self, id: MessageId) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != Some(id));
        self.messages.len() != before
    }

    /// All messages in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the conversation has no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of loading placeholders currently present.
    pub fn placeholder_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_placeholder()).count()
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let sources = dedup_sources(["a", "b", "a", "c"]);
        assert_eq!(sources, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_bot_message_sources_line() {
        let msg = Message::bot("answer", ["a", "b", "a", "c"]);
        assert_eq!(msg.sources_line().as_deref(), Some("Sources: a, b, c"));

        let bare = Message::bot("answer", Vec::<String>::new());
        assert!(bare.sources_line().is_none());
    }

    #[test]
    fn test_user_message_has_no_id() {
        let msg = Message::user("hi");
        assert_eq!(msg.sender, Sender::User);
        assert!(!msg.is_placeholder());
    }

    #[test]
    fn test_placeholder_ids_are_unique() {
        let mut convo = Conversation::new();
        let first = convo.push_placeholder();
        let second = convo.push_placeholder();
        assert_ne!(first, second);
        assert_eq!(convo.placeholder_count(), 2);
    }

    #[test]
    fn test_remove_only_targets_placeholder() {
        let mut convo = Conversation::new();
        convo.push(Message::user("question"));
        let id = convo.push_placeholder();

        assert!(convo.remove(id));
        assert_eq!(convo.len(), 1);
        assert_eq!(convo.messages()[0].text, "question");

        // Second removal is a no-op
        assert!(!convo.remove(id));
    }

    #[test]
    fn test_message_id_display() {
        let id = MessageId::new();
        assert!(id.to_string().starts_with("loading-"));
    }
}
