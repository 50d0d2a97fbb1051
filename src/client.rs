//! Client struct definition
//!
//! Represents an open connection and its outbound message queue.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::warn;

use crate::channel::Channel;
use crate::error::SendError;
use crate::message::ServerMessage;
use crate::types::ClientId;

/// Open connection information
///
/// Holds the connection's ID and the queue drained by its write task.
#[derive(Debug)]
pub struct Client {
    /// Unique identifier for this connection
    pub id: ClientId,
    /// Server → Client message channel
    pub sender: mpsc::Sender<ServerMessage>,
}

impl Client {
    /// Create a new client with the given ID and sender channel
    pub fn new(id: ClientId, sender: mpsc::Sender<ServerMessage>) -> Self {
        Self { id, sender }
    }

    /// Queue a message for this client
    ///
    /// Never waits: returns an error if the queue is full or the client
    /// has disconnected.
    pub fn send(&self, msg: ServerMessage) -> Result<(), SendError> {
        self.sender.try_send(msg).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SendError::ChannelFull,
            mpsc::error::TrySendError::Closed(_) => SendError::ChannelClosed,
        })
    }

    fn deliver(&self, msg: ServerMessage) {
        if let Err(e) = self.send(msg) {
            warn!("Dropped message for client {}: {}", self.id, e);
        }
    }
}

/// All open connections, keyed by ID
#[derive(Debug, Default)]
pub struct ClientTable {
    clients: HashMap<ClientId, Client>,
}

impl ClientTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, client: Client) {
        self.clients.insert(client.id, client);
    }

    pub fn remove(&mut self, client_id: ClientId) -> Option<Client> {
        self.clients.remove(&client_id)
    }

    pub fn contains(&self, client_id: ClientId) -> bool {
        self.clients.contains_key(&client_id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl Channel for ClientTable {
    fn send_to(&self, client_id: ClientId, msg: ServerMessage) {
        if let Some(client) = self.clients.get(&client_id) {
            client.deliver(msg);
        }
    }

    fn send_to_all(&self, msg: ServerMessage) {
        for client in self.clients.values() {
            client.deliver(msg.clone());
        }
    }

    fn send_to_all_except(&self, except: ClientId, msg: ServerMessage) {
        for client in self.clients.values().filter(|c| c.id != except) {
            client.deliver(msg.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pong() -> ServerMessage {
        ServerMessage::Pong { timestamp: 1 }
    }

    #[tokio::test]
    async fn test_client_send() {
        let (tx, mut rx) = mpsc::channel(32);
        let client = Client::new(ClientId::new(), tx);

        client.send(pong()).unwrap();

        assert_eq!(rx.recv().await, Some(pong()));
    }

    #[tokio::test]
    async fn test_client_send_full_and_closed() {
        let (tx, rx) = mpsc::channel(1);
        let client = Client::new(ClientId::new(), tx);

        client.send(pong()).unwrap();
        assert!(matches!(client.send(pong()), Err(SendError::ChannelFull)));

        drop(rx);
        assert!(matches!(client.send(pong()), Err(SendError::ChannelClosed)));
    }

    #[tokio::test]
    async fn test_table_fan_out() {
        let mut table = ClientTable::new();
        let (tx_a, mut rx_a) = mpsc::channel(32);
        let (tx_b, mut rx_b) = mpsc::channel(32);
        let a = ClientId::new();
        let b = ClientId::new();
        table.insert(Client::new(a, tx_a));
        table.insert(Client::new(b, tx_b));

        table.send_to_all(pong());
        table.send_to_all_except(a, ServerMessage::Pong { timestamp: 2 });
        table.send_to(a, ServerMessage::Pong { timestamp: 3 });

        assert_eq!(rx_a.try_recv().unwrap(), pong());
        assert_eq!(rx_a.try_recv().unwrap(), ServerMessage::Pong { timestamp: 3 });
        assert!(rx_a.try_recv().is_err());

        assert_eq!(rx_b.try_recv().unwrap(), pong());
        assert_eq!(rx_b.try_recv().unwrap(), ServerMessage::Pong { timestamp: 2 });
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_table_skips_closed_clients() {
        let mut table = ClientTable::new();
        let (tx_a, rx_a) = mpsc::channel(32);
        let (tx_b, mut rx_b) = mpsc::channel(32);
        table.insert(Client::new(ClientId::new(), tx_a));
        table.insert(Client::new(ClientId::new(), tx_b));
        drop(rx_a);

        table.send_to_all(pong());

        assert_eq!(rx_b.try_recv().unwrap(), pong());
        assert_eq!(table.len(), 2);
    }
}
