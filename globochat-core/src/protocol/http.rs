use serde::{Deserialize, Serialize};

/// How many messages `GET /api/messages` returns when `limit` is absent.
pub const DEFAULT_HISTORY_LIMIT: u32 = 100;

/// Hard cap on `limit`, so one request cannot dump the whole table.
pub const MAX_HISTORY_LIMIT: u32 = 500;

/// Query parameters for `GET /api/messages`.
///
/// The response body is a bare JSON array of [`crate::ChatMessage`] in
/// chronological order (oldest first), holding the most recent `limit` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_HISTORY_LIMIT
}

impl Default for HistoryParams {
    fn default() -> Self {
        Self { limit: DEFAULT_HISTORY_LIMIT }
    }
}

impl HistoryParams {
    /// Limit clamped to `1..=MAX_HISTORY_LIMIT`.
    pub fn effective_limit(&self) -> u32 {
        self.limit.clamp(1, MAX_HISTORY_LIMIT)
    }
}
