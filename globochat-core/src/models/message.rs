use serde::{Deserialize, Serialize};

/// A message persisted by the server and broadcast over the socket.
///
/// Immutable once created; `id` and `timestamp` are server-assigned and
/// list order is the server's arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub username: String,
    pub message: String,
    pub timestamp: String, // RFC3339 UTC
}
