//! Error types for the hub
//!
//! Defines application-level errors and outbound queue errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-level errors
///
/// Covers both fatal errors (connection termination) and
/// business errors (reported to the originating client as an `error` event).
#[derive(Debug, Error)]
pub enum AppError {
    /// WebSocket protocol error (fatal)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Channel send error (fatal - internal channel broken)
    #[error("Channel send error")]
    ChannelSend,

    /// Authenticated-only event received before `join`
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Display name rejected by the join policy
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    /// Inbound frame could not be decoded into a known event
    #[error("Malformed '{event}' payload: {reason}")]
    MalformedPayload { event: String, reason: String },
}

impl AppError {
    /// Event name carried by the error, if it knows which event it belongs to
    pub fn event(&self) -> Option<&str> {
        match self {
            AppError::MalformedPayload { event, .. } => Some(event.as_str()),
            _ => None,
        }
    }
}

/// Outbound queue errors
///
/// Occurs when a message cannot be queued for a connection's write task.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,

    /// The connection's outbound queue is full
    #[error("Channel full")]
    ChannelFull,
}
