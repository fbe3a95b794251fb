//! User profile model.
//!
//! Users seen by the bot, used to put names on staff listings.

use serde::{Deserialize, Serialize};
use teloxide::types::User;

/// Stored profile of a Telegram user.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
    /// Telegram user ID.
    pub user_id: u64,
    /// Username without @ (lowercase for matching).
    pub username: Option<String>,
    /// Original username (preserving case for display).
    pub username_display: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl UserProfile {
    pub fn from_telegram(user: &User) -> Self {
        Self {
            user_id: user.id.0,
            username: user.username.as_ref().map(|u| u.to_lowercase()),
            username_display: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            updated_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Whether the Telegram user differs from what is stored.
    pub fn has_changed(&self, other: &User) -> bool {
        let new_username = other.username.as_ref().map(|u| u.to_lowercase());
        self.username != new_username
            || self.first_name != other.first_name
            || self.last_name != other.last_name
    }

    /// Full name for display.
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: Option<&str>, first: &str) -> User {
        serde_json::from_value(serde_json::json!({
            "id": 42,
            "is_bot": false,
            "first_name": first,
            "username": username,
        }))
        .unwrap()
    }

    #[test]
    fn test_username_case_changes_are_ignored() {
        let profile = UserProfile::from_telegram(&user(Some("Alice"), "Alice"));

        assert_eq!(profile.username.as_deref(), Some("alice"));
        assert!(!profile.has_changed(&user(Some("ALICE"), "Alice")));
        assert!(profile.has_changed(&user(Some("alice"), "Alicia")));
        assert!(profile.has_changed(&user(None, "Alice")));
    }

    #[test]
    fn test_display_name() {
        let mut profile = UserProfile::from_telegram(&user(None, "Bob"));
        assert_eq!(profile.display_name(), "Bob");

        profile.last_name = Some("Stone".to_string());
        assert_eq!(profile.display_name(), "Bob Stone");
    }
}
