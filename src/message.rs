//! Message protocol definitions
//!
//! JSON-based bidirectional message protocol using Serde's tagged enum
//! for type-safe serialization/deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::registry::Participant;
use crate::session::ChatMessage;
use crate::types::ClientId;

/// Client → Server message
///
/// All messages from client to server. Uses tagged enum with snake_case naming.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Announce a display name
    Join { username: String },
    /// Send a chat message (requires join)
    Message { content: String },
    /// Leave the chat, keeping the connection open
    Leave,
    /// Liveness probe
    Ping,
    /// Client is reconnecting (informational)
    ReconnectAttempt,
}

impl ClientMessage {
    /// Decode a text frame
    ///
    /// Any failure is reported as `MalformedPayload`, tagged with the frame's
    /// `type` when it can be read.
    pub fn parse(text: &str) -> Result<Self, AppError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| AppError::MalformedPayload {
                event: "unknown".to_string(),
                reason: e.to_string(),
            })?;

        let event = value
            .get("type")
            .and_then(|t| t.as_str())
            .unwrap_or("unknown")
            .to_string();

        serde_json::from_value(value).map_err(|e| AppError::MalformedPayload {
            event,
            reason: e.to_string(),
        })
    }

    /// Wire name of the event
    pub fn event_name(&self) -> &'static str {
        match self {
            ClientMessage::Join { .. } => "join",
            ClientMessage::Message { .. } => "message",
            ClientMessage::Leave => "leave",
            ClientMessage::Ping => "ping",
            ClientMessage::ReconnectAttempt => "reconnect_attempt",
        }
    }
}

/// Server → Client message
///
/// All messages from server to client. Uses tagged enum with camelCase naming.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Connection accepted, client ID issued
    Welcome { client_id: ClientId, message: String },
    /// Someone joined; carries the full roster
    UserJoined {
        user_id: ClientId,
        username: String,
        online_users: Vec<Participant>,
    },
    /// Chat message, echoed to everyone including the author
    NewMessage(ChatMessage),
    /// Someone left; carries the remaining roster
    UserLeft {
        user_id: ClientId,
        username: String,
        online_users: Vec<Participant>,
    },
    /// Reply to ping, Unix milliseconds
    Pong { timestamp: i64 },
    /// Handling of one of the client's events failed
    Error {
        event: String,
        code: ErrorCode,
        message: String,
        timestamp: DateTime<Utc>,
    },
}

impl ServerMessage {
    /// Build the `error` reply for a failed `event`
    pub fn error(event: &str, err: &AppError) -> Self {
        let (code, message) = match err {
            AppError::NotAuthenticated => (
                ErrorCode::NotAuthenticated,
                "Join before sending messages".to_string(),
            ),
            AppError::InvalidUsername(reason) => (ErrorCode::InvalidUsername, reason.clone()),
            AppError::MalformedPayload { reason, .. } => (
                ErrorCode::InvalidMessage,
                format!("Invalid message format: {}", reason),
            ),
            // Fatal errors are not typically converted (connection closes)
            _ => (ErrorCode::Internal, "Internal error".to_string()),
        };
        ServerMessage::Error {
            event: event.to_string(),
            code,
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Error codes for ServerMessage::Error
///
/// Represents different error scenarios that can be communicated to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Authenticated-only event before join
    NotAuthenticated,
    /// Username rejected at join
    InvalidUsername,
    /// Invalid message format
    InvalidMessage,
    /// Unexpected failure while handling the event
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_deserialize() {
        let msg = ClientMessage::parse(r#"{"type": "join", "username": "alice"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Join {
                username: "alice".to_string()
            }
        );

        let msg = ClientMessage::parse(r#"{"type": "reconnect_attempt"}"#).unwrap();
        assert_eq!(msg, ClientMessage::ReconnectAttempt);
        assert_eq!(msg.event_name(), "reconnect_attempt");
    }

    #[test]
    fn test_client_message_ignores_extra_fields() {
        let msg = ClientMessage::parse(r#"{"type": "ping", "seq": 4}"#).unwrap();
        assert_eq!(msg, ClientMessage::Ping);
    }

    #[test]
    fn test_parse_missing_field_names_event() {
        let err = ClientMessage::parse(r#"{"type": "join"}"#).unwrap_err();
        assert!(matches!(err, AppError::MalformedPayload { .. }));
        assert_eq!(err.event(), Some("join"));
    }

    #[test]
    fn test_parse_unknown_type() {
        let err = ClientMessage::parse(r#"{"type": "typing"}"#).unwrap_err();
        assert_eq!(err.event(), Some("typing"));
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = ClientMessage::parse("not json").unwrap_err();
        assert_eq!(err.event(), Some("unknown"));

        let err = ClientMessage::parse(r#"{"content": "hi"}"#).unwrap_err();
        assert_eq!(err.event(), Some("unknown"));
    }

    #[test]
    fn test_server_message_serialize() {
        let msg = ServerMessage::UserLeft {
            user_id: ClientId::new(),
            username: "alice".to_string(),
            online_users: Vec::new(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"userLeft\""));
        assert!(json.contains("\"userId\":"));
        assert!(json.contains("\"onlineUsers\":[]"));
    }

    #[test]
    fn test_pong_serialize() {
        let json = serde_json::to_string(&ServerMessage::Pong { timestamp: 42 }).unwrap();
        assert_eq!(json, r#"{"type":"pong","timestamp":42}"#);
    }

    #[test]
    fn test_error_serialize() {
        let msg = ServerMessage::error("message", &AppError::NotAuthenticated);
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"error\""));
        assert!(json.contains("\"event\":\"message\""));
        assert!(json.contains("\"code\":\"not_authenticated\""));
    }

    #[test]
    fn test_fatal_error_is_internal() {
        let msg = ServerMessage::error("join", &AppError::ChannelSend);
        match msg {
            ServerMessage::Error { code, message, .. } => {
                assert_eq!(code, ErrorCode::Internal);
                assert_eq!(message, "Internal error");
            }
            _ => panic!("Wrong variant"),
        }
    }
}
