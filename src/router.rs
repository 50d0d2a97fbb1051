//! Event router
//!
//! Applies connection events to the session context and issues the
//! resulting broadcasts through a [`Channel`]. Every handler failure is
//! caught here and reported to the originating connection only.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::channel::Channel;
use crate::config::Config;
use crate::error::AppError;
use crate::message::{ClientMessage, ServerMessage};
use crate::session::SessionContext;
use crate::types::ClientId;

pub struct EventRouter {
    context: SessionContext,
    welcome_message: String,
    max_username_chars: usize,
}

impl EventRouter {
    pub fn new(context: SessionContext, config: &Config) -> Self {
        Self {
            context,
            welcome_message: config.welcome_message.clone(),
            max_username_chars: config.max_username_chars,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Greet a newly accepted connection
    pub fn handle_connect<C: Channel>(&self, client_id: ClientId, channel: &C) {
        info!("Client {} connected", client_id);
        channel.send_to(
            client_id,
            ServerMessage::Welcome {
                client_id,
                message: self.welcome_message.clone(),
            },
        );
    }

    /// Process one client event
    pub fn handle_event<C: Channel>(
        &mut self,
        client_id: ClientId,
        msg: ClientMessage,
        channel: &C,
    ) {
        let event = msg.event_name();
        let result = match msg {
            ClientMessage::Join { username } => self.handle_join(client_id, username, channel),
            ClientMessage::Message { content } => self.handle_message(client_id, content, channel),
            ClientMessage::Leave => {
                self.handle_leave(client_id, channel);
                Ok(())
            }
            ClientMessage::Ping => {
                self.handle_ping(client_id, channel);
                Ok(())
            }
            ClientMessage::ReconnectAttempt => {
                debug!("Reconnect attempt from {}", client_id);
                Ok(())
            }
        };

        if let Err(err) = result {
            self.report_error(client_id, event, &err, channel);
        }
    }

    /// Report an event that failed before reaching a handler
    pub fn handle_rejected<C: Channel>(&self, client_id: ClientId, err: AppError, channel: &C) {
        let event = err.event().unwrap_or("unknown").to_string();
        self.report_error(client_id, &event, &err, channel);
    }

    /// Transport-level disconnect: same effect as `leave`
    pub fn handle_disconnect<C: Channel>(&mut self, client_id: ClientId, channel: &C) {
        info!("Client {} disconnected", client_id);
        self.handle_leave(client_id, channel);
    }

    fn handle_join<C: Channel>(
        &mut self,
        client_id: ClientId,
        username: String,
        channel: &C,
    ) -> Result<(), AppError> {
        let username = self.validate_username(&username)?;
        let participant = self.context.registry.register(client_id, username);
        info!("Client {} joined as '{}'", client_id, participant.username);

        channel.send_to_all(ServerMessage::UserJoined {
            user_id: client_id,
            username: participant.username,
            online_users: self.context.registry.list_all(),
        });
        Ok(())
    }

    fn handle_message<C: Channel>(
        &mut self,
        client_id: ClientId,
        content: String,
        channel: &C,
    ) -> Result<(), AppError> {
        let Some(author) = self.context.registry.get(client_id) else {
            return Err(AppError::NotAuthenticated);
        };

        let message = self.context.messages.append(author, content);
        debug!("Message {} from '{}': {}", message.id, message.username, message.content);

        channel.send_to_all(ServerMessage::NewMessage(message));
        Ok(())
    }

    fn handle_leave<C: Channel>(&mut self, client_id: ClientId, channel: &C) {
        let Some(participant) = self.context.registry.unregister(client_id) else {
            return;
        };
        info!("'{}' left ({})", participant.username, client_id);

        channel.send_to_all_except(
            client_id,
            ServerMessage::UserLeft {
                user_id: client_id,
                username: participant.username,
                online_users: self.context.registry.list_all(),
            },
        );
    }

    fn handle_ping<C: Channel>(&self, client_id: ClientId, channel: &C) {
        debug!("Ping from {}", client_id);
        channel.send_to(
            client_id,
            ServerMessage::Pong {
                timestamp: Utc::now().timestamp_millis(),
            },
        );
    }

    fn validate_username(&self, username: &str) -> Result<String, AppError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::InvalidUsername("Username must not be empty".to_string()));
        }
        if username.chars().count() > self.max_username_chars {
            return Err(AppError::InvalidUsername(format!(
                "Username must be at most {} characters",
                self.max_username_chars
            )));
        }
        Ok(username.to_string())
    }

    fn report_error<C: Channel>(
        &self,
        client_id: ClientId,
        event: &str,
        err: &AppError,
        channel: &C,
    ) {
        warn!("Event '{}' from {} failed: {}", event, client_id, err);
        channel.send_to(client_id, ServerMessage::error(event, err));
    }
}
