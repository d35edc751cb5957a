//! Exchange message types.

use serde::{Deserialize, Serialize};

/// Who produced a message in the exchange log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The human participant.
    User,
    /// The simulated opposing debater.
    Counterpart,
}

/// A single utterance in the exchange log.
///
/// Messages are append-only and ordered by creation. A message with
/// `pending = true` is a placeholder for an outstanding counterpart reply;
/// it is resolved in place (content replaced, flag cleared), never
/// duplicated. At most one pending message exists at any instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeMessage {
    /// Unique message identifier (UUID format)
    pub id: String,
    /// Who produced this message
    pub speaker: Speaker,
    /// Message text
    pub content: String,
    /// Timestamp when the message was created or resolved (RFC 3339)
    pub timestamp: String,
    /// True while a counterpart reply is outstanding
    #[serde(default)]
    pub pending: bool,
}

impl ExchangeMessage {
    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Speaker::User, content, false)
    }

    /// Creates a resolved counterpart message.
    pub fn counterpart(content: impl Into<String>) -> Self {
        Self::new(Speaker::Counterpart, content, false)
    }

    /// Creates a pending counterpart placeholder.
    pub fn placeholder() -> Self {
        Self::new(Speaker::Counterpart, "Thinking...", true)
    }

    fn new(speaker: Speaker, content: impl Into<String>, pending: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            speaker,
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            pending,
        }
    }

    /// Resolves a pending placeholder in place with its final content.
    pub fn resolve(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.pending = false;
        self.timestamp = chrono::Utc::now().to_rfc3339();
    }
}
