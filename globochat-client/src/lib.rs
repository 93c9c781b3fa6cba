//! Client side of the globochat contract: a sans-IO session state machine
//! plus the plumbing that drives it (history fetch, websocket transport,
//! local preferences).

pub mod history;
pub mod prefs;
pub mod session;
pub mod transport;

pub use session::{ChatSession, Notice, TYPING_IDLE};
