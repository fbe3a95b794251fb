//! Global ban ledger model.

use serde::{Deserialize, Serialize};

/// A user recorded as globally banned.
///
/// Presence here records administrative intent only; propagation to the
/// directory chats may have partially failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanRecord {
    pub user_id: u64,
    #[serde(default)]
    pub reason: String,
    /// Unix timestamp of the first insert.
    #[serde(default)]
    pub banned_at: i64,
}

impl BanRecord {
    pub fn new(user_id: u64, reason: impl Into<String>) -> Self {
        Self {
            user_id,
            reason: reason.into(),
            banned_at: chrono::Utc::now().timestamp(),
        }
    }
}
