//! Append-only message log for one chat session.

use chrono::Utc;

use crate::types::{Message, MessageId, Sender};

/// Ordered history of a conversation.
///
/// Messages can only be appended; nothing hands out mutable access to a
/// stored message, so an entry never changes once written.
#[derive(Debug, Clone, Default)]
pub struct TranscriptStore {
    messages: Vec<Message>,
    next_id: u64,
}

impl TranscriptStore {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return a copy of what was stored.
    pub fn append(&mut self, sender: Sender, text: impl Into<String>) -> Message {
        let message = Message {
            id: MessageId(self.next_id),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        };
        self.next_id += 1;
        self.messages.push(message.clone());
        message
    }

    /// Messages in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Owned copy of the log for rendering outside the session lock.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
