//! ChatServer Actor implementation
//!
//! The single dispatch point of the hub: owns the open connections and the
//! event router, and processes commands from connection handlers one at a time.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::client::{Client, ClientTable};
use crate::config::Config;
use crate::error::AppError;
use crate::message::{ClientMessage, ServerMessage};
use crate::router::EventRouter;
use crate::session::SessionContext;
use crate::types::ClientId;

/// Commands sent from handlers to the ChatServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New client connected
    Connect {
        client_id: ClientId,
        sender: mpsc::Sender<ServerMessage>,
    },
    /// Client disconnected
    Disconnect { client_id: ClientId },
    /// Decoded client event
    Event {
        client_id: ClientId,
        message: ClientMessage,
    },
    /// Client frame that could not be decoded
    Rejected { client_id: ClientId, error: AppError },
}

/// The main ChatServer actor
///
/// Manages all state and processes commands from client handlers.
/// No locks: every mutation happens on this task.
pub struct ChatServer {
    /// All open connections: ClientId -> Client
    clients: ClientTable,
    /// Registry, message log and event handling
    router: EventRouter,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl ChatServer {
    /// Create a new ChatServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>, config: &Config) -> Self {
        Self {
            clients: ClientTable::new(),
            router: EventRouter::new(SessionContext::new(), config),
            receiver,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Continuously receives and processes commands until all senders are dropped.
    pub async fn run(mut self) {
        info!("ChatServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("ChatServer shutting down");
    }

    /// Process a single command
    fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect { client_id, sender } => {
                self.clients.insert(Client::new(client_id, sender));
                self.router.handle_connect(client_id, &self.clients);
            }
            ServerCommand::Disconnect { client_id } => {
                // Events still queued for this id are dropped from here on
                if self.clients.remove(client_id).is_none() {
                    return;
                }
                self.router.handle_disconnect(client_id, &self.clients);
            }
            ServerCommand::Event { client_id, message } => {
                if !self.clients.contains(client_id) {
                    debug!("Dropping '{}' from unknown client {}", message.event_name(), client_id);
                    return;
                }
                self.router.handle_event(client_id, message, &self.clients);
            }
            ServerCommand::Rejected { client_id, error } => {
                if !self.clients.contains(client_id) {
                    return;
                }
                self.router.handle_rejected(client_id, error, &self.clients);
            }
        }

        debug!(
            "Open connections: {}, joined: {}, messages: {}",
            self.clients.len(),
            self.router.context().registry.len(),
            self.router.context().messages.len()
        );
    }
}
