/* This file defines how data travels over the websocket.
   Events are flat JSON objects discriminated by a "type" field:
     {"type":"message", ...}  {"type":"typing", ...}  {"type":"error", ...}
   There is no payload envelope; the discriminant sits next to the fields.
*/
use serde::{Deserialize, Serialize};

use crate::models::ChatMessage;

/// Client → server events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientEvent {
    /// Ask the server to create and broadcast a message. The body is trimmed
    /// client-side; the server validates authoritatively.
    Message { username: String, message: String },
    /// Announce start/stop of composition. Never persisted.
    Typing { username: String, is_typing: bool },
}

/// Server → client events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerEvent {
    /// A newly persisted message, broadcast to every connection including
    /// the sender. The echo is the sender's only confirmation.
    Message(ChatMessage),
    /// A participant's current typing flag, broadcast to every connection.
    /// Receivers drop events carrying their own username.
    Typing { username: String, is_typing: bool },
    /// A validation or security rejection, sent only to the offending
    /// connection. Does not alter connection state.
    Error { message: String },
}
