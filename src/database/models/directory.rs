//! Directory entry model.
//!
//! One document per managed chat, keyed by `chat_id`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of chat listed in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatCategory {
    Group,
    Channel,
}

impl ChatCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Channel => "channel",
        }
    }
}

impl fmt::Display for ChatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chat managed by the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Telegram chat ID (unique key).
    pub chat_id: i64,
    pub category: ChatCategory,
    /// Invite link as supplied by staff. Not validated.
    pub invite_link: String,
    /// Display title, empty when unknown.
    #[serde(default)]
    pub title: String,
}

impl DirectoryEntry {
    pub fn new(
        chat_id: i64,
        category: ChatCategory,
        invite_link: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            chat_id,
            category,
            invite_link: invite_link.into(),
            title: title.into(),
        }
    }
}
