pub mod http;
pub mod ws;

pub use http::{HistoryParams, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};
pub use ws::{ClientEvent, ServerEvent};
