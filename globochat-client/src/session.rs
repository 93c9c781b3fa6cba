//! The session state machine.
//!
//! `ChatSession` owns everything the UI shows: the message list, the set of
//! currently typing participants, the connection flag, and the typing-idle
//! timer. It performs no I/O; the caller feeds it socket lifecycle changes,
//! inbound [`ServerEvent`]s and user input, and forwards the
//! [`ClientEvent`]s it emits.

use std::collections::BTreeSet;
use std::fmt;
use std::time::{Duration, Instant};

use globochat_core::{
    validate_message, validate_username, ChatMessage, ClientEvent, ServerEvent, ValidationError,
};

/// How long after the last keystroke a typing announcement expires.
pub const TYPING_IDLE: Duration = Duration::from_secs(2);

/// A user-facing notice. The UI layer decides how to render each kind
/// (transient toast, persistent banner); none of them end the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Client-side validation failure; nothing was sent.
    Invalid(ValidationError),
    /// No open channel; sending is disabled until the view is restarted.
    NotConnected,
    /// The server rejected an event with an `error` broadcast.
    Rejected(String),
    /// Transport or load failure.
    Transport(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Invalid(e) => write!(f, "{}", e),
            Notice::NotConnected => write!(f, "not connected to the server"),
            Notice::Rejected(msg) | Notice::Transport(msg) => write!(f, "{}", msg),
        }
    }
}

/// Per-session client state. One instance per chosen identity.
#[derive(Debug)]
pub struct ChatSession {
    username: String,
    connected: bool,
    messages: Vec<ChatMessage>,
    typing: BTreeSet<String>,
    announced_typing: bool,
    typing_deadline: Option<Instant>,
}

impl ChatSession {
    /// Creates a session for a display name. The name gates session
    /// creation: an invalid one never produces a session.
    pub fn new(username: &str) -> Result<Self, ValidationError> {
        let username = validate_username(username)?.to_string();
        Ok(Self {
            username,
            connected: false,
            messages: Vec::new(),
            typing: BTreeSet::new(),
            announced_typing: false,
            typing_deadline: None,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Messages in server arrival order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Participants currently composing, own identity excluded.
    pub fn typing_users(&self) -> impl Iterator<Item = &str> {
        self.typing.iter().map(String::as_str)
    }

    /// Replaces the list with fetched history (one-shot, at session start).
    pub fn history_loaded(&mut self, messages: Vec<ChatMessage>) {
        self.messages = messages;
    }

    /// The channel opened: sending becomes possible.
    pub fn socket_opened(&mut self) {
        self.connected = true;
    }

    /// The channel closed or failed. Sending is disabled and stays disabled:
    /// there is no reconnection, the session is down until the program is
    /// restarted. Typing indicators are stale without a feed, so they clear.
    pub fn socket_closed(&mut self) {
        self.connected = false;
        self.typing.clear();
        self.announced_typing = false;
        self.typing_deadline = None;
    }

    /// Reports the current input after a keystroke. Emits `typing(true)` on
    /// the first keystroke after idle and re-arms the idle deadline; clearing
    /// the input stops immediately.
    pub fn keystroke(&mut self, input: &str, now: Instant) -> Option<ClientEvent> {
        if !self.connected {
            return None;
        }
        if input.is_empty() {
            return self.stop_typing();
        }
        self.typing_deadline = Some(now + TYPING_IDLE);
        if self.announced_typing {
            None
        } else {
            self.announced_typing = true;
            Some(self.typing_event(true))
        }
    }

    /// Emits `typing(false)` once the idle deadline has passed. A keystroke
    /// in the meantime pushes the deadline, winning the timer race.
    pub fn poll_typing(&mut self, now: Instant) -> Option<ClientEvent> {
        match self.typing_deadline {
            Some(deadline) if now >= deadline => self.stop_typing(),
            _ => None,
        }
    }

    /// Submits the composed text. Pre-validation here is deliberately thin
    /// (non-empty body, channel open); the server stays authoritative and
    /// answers anything else with an `error` event.
    ///
    /// The local list is not appended: only the broadcast echo does that.
    pub fn submit(&mut self, input: &str) -> Result<Vec<ClientEvent>, Notice> {
        let body = match validate_message(input) {
            Ok(body) => body.to_string(),
            Err(ValidationError::MessageEmpty) => {
                return Err(Notice::Invalid(ValidationError::MessageEmpty))
            }
            // over-long input still goes out; rejection is the server's call
            Err(_) => input.trim().to_string(),
        };
        if !self.connected {
            return Err(Notice::NotConnected);
        }

        let mut events = vec![ClientEvent::Message {
            username: self.username.clone(),
            message: body,
        }];
        // submitting always ends the composition window
        self.announced_typing = false;
        self.typing_deadline = None;
        events.push(self.typing_event(false));
        Ok(events)
    }

    /// Applies one inbound event. Returns a notice when there is something
    /// to surface; inbound events never change the connection flag.
    pub fn apply(&mut self, event: ServerEvent) -> Option<Notice> {
        match event {
            ServerEvent::Message(msg) => {
                self.messages.push(msg);
                None
            }
            ServerEvent::Typing { username, is_typing } => {
                if username == self.username {
                    return None;
                }
                if is_typing {
                    self.typing.insert(username);
                } else {
                    self.typing.remove(&username);
                }
                None
            }
            ServerEvent::Error { message } => Some(Notice::Rejected(message)),
        }
    }

    fn stop_typing(&mut self) -> Option<ClientEvent> {
        self.typing_deadline = None;
        if self.announced_typing {
            self.announced_typing = false;
            Some(self.typing_event(false))
        } else {
            None
        }
    }

    fn typing_event(&self, is_typing: bool) -> ClientEvent {
        ClientEvent::Typing { username: self.username.clone(), is_typing }
    }
}
