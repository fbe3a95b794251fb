//! Store interfaces.
//!
//! The permission gate and fan-out executor only see these traits, so the
//! MongoDB repositories can be swapped for in-memory stores in tests.
//!
//! Duplicate policies differ on purpose: directory entries describe current
//! state and are replaced, while role and ban entries form an access list
//! and keep their first insert.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{AdminCacheEntry, BanRecord, DirectoryEntry};

/// A set of staff user IDs (sudo users or global admins).
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Add a user. Adding an existing user is a no-op.
    async fn add(&self, user_id: u64) -> Result<()>;

    /// Remove a user. Removing an absent user is a no-op.
    async fn remove(&self, user_id: u64) -> Result<()>;

    async fn contains(&self, user_id: u64) -> Result<bool>;

    async fn list(&self) -> Result<Vec<u64>>;
}

/// Chats managed by the bot.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Insert or fully replace the entry for `entry.chat_id`.
    async fn upsert(&self, entry: DirectoryEntry) -> Result<()>;

    /// Remove a chat. Removing an absent chat is a no-op.
    async fn remove(&self, chat_id: i64) -> Result<()>;

    async fn get(&self, chat_id: i64) -> Result<Option<DirectoryEntry>>;

    /// All entries in storage order.
    async fn list_all(&self) -> Result<Vec<DirectoryEntry>>;
}

/// Globally banned users.
#[async_trait]
pub trait BanLedger: Send + Sync {
    /// Record a ban. An existing record keeps its original reason.
    async fn add(&self, user_id: u64, reason: &str) -> Result<()>;

    /// Remove a ban. Removing an absent user is a no-op.
    async fn remove(&self, user_id: u64) -> Result<()>;

    async fn get(&self, user_id: u64) -> Result<Option<BanRecord>>;

    async fn list_all(&self) -> Result<Vec<BanRecord>>;
}

/// Last observed administrator set per chat.
#[async_trait]
pub trait AdminCacheStore: Send + Sync {
    /// Replace the admin set of `chat_id` in one write.
    async fn replace(&self, chat_id: i64, admins: Vec<u64>) -> Result<()>;

    async fn get(&self, chat_id: i64) -> Result<Option<AdminCacheEntry>>;

    async fn list_all(&self) -> Result<Vec<AdminCacheEntry>>;
}
