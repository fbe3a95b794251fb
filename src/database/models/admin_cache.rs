//! Admin cache model.
//!
//! The whole administrator set of a chat lives in one document, so a
//! refresh is a single replace and readers never see a partial set.

use serde::{Deserialize, Serialize};

/// Administrators observed in a chat at the last refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCacheEntry {
    pub chat_id: i64,
    #[serde(default)]
    pub admins: Vec<u64>,
    /// Unix timestamp of the refresh that produced `admins`.
    pub refreshed_at: i64,
}

impl AdminCacheEntry {
    pub fn new(chat_id: i64, mut admins: Vec<u64>) -> Self {
        admins.sort_unstable();
        admins.dedup();
        Self {
            chat_id,
            admins,
            refreshed_at: chrono::Utc::now().timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dedups_admins() {
        let entry = AdminCacheEntry::new(-100, vec![3, 1, 3, 2]);
        assert_eq!(entry.admins, vec![1, 2, 3]);
        assert_eq!(entry.chat_id, -100);
    }
}
