//! globochat-core: types shared between client and server (models, wire
//! events, validation rules). No I/O lives here.

pub mod models;
pub mod protocol;
pub mod utils;
pub mod validate;

// Convenient re-exports to keep paths short in the client/server crates
pub use models::ChatMessage;
pub use protocol::http::{HistoryParams, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};
pub use protocol::ws::{ClientEvent, ServerEvent};
pub use utils::{new_message_id, now_timestamp};
pub use validate::{validate_message, validate_username, ValidationError};
