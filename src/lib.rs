//! Broadcast Hub Library
//!
//! A real-time broadcast chat hub built with tokio-tungstenite using the
//! Actor pattern for state management.
//!
//! # Features
//! - WebSocket connection handling with a welcome event
//! - Joining under a display name, with the full roster broadcast to everyone
//! - Chat messages echoed to every connection, sender included
//! - Leave / disconnect notifications to the remaining connections
//! - Ping / pong liveness probe
//! - Per-event error reporting to the originating connection
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatServer` is the central actor and the single dispatch point
//! - `EventRouter` applies events to the `SessionContext` (registry + message log)
//!   and fans out through the `Channel` capability
//! - Each connection has a `handler` task communicating with the server
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use broadcast_hub::{accept_loop, ChatServer, Config};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::default();
//!     let listener = TcpListener::bind(config.bind_addr()).await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(config.command_buffer);
//!
//!     tokio::spawn(ChatServer::new(cmd_rx, &config).run());
//!     accept_loop(listener, cmd_tx, config.client_buffer).await;
//! }
//! ```

pub mod channel;
pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod message;
pub mod registry;
pub mod router;
pub mod server;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use channel::Channel;
pub use client::{Client, ClientTable};
pub use config::Config;
pub use error::{AppError, SendError};
pub use handler::{accept_loop, handle_connection};
pub use message::{ClientMessage, ErrorCode, ServerMessage};
pub use registry::{ConnectionRegistry, Participant};
pub use router::EventRouter;
pub use server::{ChatServer, ServerCommand};
pub use session::{ChatMessage, MessageLog, SessionContext};
pub use types::ClientId;
