//! Outbound delivery capability used by the event router

use crate::message::ServerMessage;
use crate::types::ClientId;

/// Fan-out over the currently open connections
///
/// Delivery is best effort: implementations drop messages they cannot queue
/// and never block the caller.
pub trait Channel {
    /// Send to a single connection
    fn send_to(&self, client_id: ClientId, msg: ServerMessage);

    /// Send to every open connection, joined or not
    fn send_to_all(&self, msg: ServerMessage);

    /// Send to every open connection except `except`
    fn send_to_all_except(&self, except: ClientId, msg: ServerMessage);
}
