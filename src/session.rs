//! Session context
//!
//! Shared state of the hub: the connection registry and the message log.
//! Created once at startup and owned by the event router.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::registry::{ConnectionRegistry, Participant};
use crate::types::ClientId;

/// A chat message as stored in the log and broadcast as `newMessage`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Unix milliseconds, bumped to stay strictly increasing
    pub id: i64,
    /// Author connection
    pub user_id: ClientId,
    /// Author display name at the time of sending
    pub username: String,
    /// Raw message text
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only, in-memory message log
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Vec<ChatMessage>,
    last_id: i64,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message written by `author` and return the stored copy
    pub fn append(&mut self, author: &Participant, content: String) -> ChatMessage {
        let timestamp = Utc::now();
        let id = timestamp.timestamp_millis().max(self.last_id + 1);
        self.last_id = id;

        let message = ChatMessage {
            id,
            user_id: author.id,
            username: author.username.clone(),
            content,
            timestamp,
        };
        self.messages.push(message.clone());
        message
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Registry and message log, mutated only by the event router
#[derive(Debug, Default)]
pub struct SessionContext {
    pub registry: ConnectionRegistry,
    pub messages: MessageLog,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }
}
