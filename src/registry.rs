//! Connection registry
//!
//! Tracks which connections have joined and under which display name.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::ClientId;

/// A joined connection
///
/// Serialized as an entry of the `onlineUsers` roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Connection this participant is bound to
    pub id: ClientId,
    /// Display name given at join time
    pub username: String,
    /// Time of the successful join
    pub joined_at: DateTime<Utc>,
}

/// Registry of joined connections
///
/// At most one participant per `ClientId`. Snapshots list participants in
/// join order; overwriting an entry keeps its position.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    participants: HashMap<ClientId, Participant>,
    order: Vec<ClientId>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the participant for `id`
    pub fn register(&mut self, id: ClientId, username: String) -> Participant {
        let participant = Participant {
            id,
            username,
            joined_at: Utc::now(),
        };
        if self.participants.insert(id, participant.clone()).is_none() {
            self.order.push(id);
        }
        participant
    }

    /// Remove the participant for `id`
    ///
    /// Returns `None` if the connection never joined (or already left).
    pub fn unregister(&mut self, id: ClientId) -> Option<Participant> {
        let participant = self.participants.remove(&id)?;
        self.order.retain(|other| *other != id);
        Some(participant)
    }

    pub fn get(&self, id: ClientId) -> Option<&Participant> {
        self.participants.get(&id)
    }

    /// Point-in-time copy of every participant, in join order
    pub fn list_all(&self) -> Vec<Participant> {
        self.order
            .iter()
            .filter_map(|id| self.participants.get(id))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
