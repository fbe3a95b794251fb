//! In-memory store implementations for tests.

use std::collections::HashMap;

use anyhow::{bail, Result};
use async_trait::async_trait;
use parking_lot::Mutex;

use super::models::{AdminCacheEntry, BanRecord, DirectoryEntry};
use super::store::{AdminCacheStore, BanLedger, DirectoryStore, RoleStore};

#[derive(Default)]
pub struct MemoryRoleStore {
    users: Mutex<Vec<u64>>,
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn add(&self, user_id: u64) -> Result<()> {
        let mut users = self.users.lock();
        if !users.contains(&user_id) {
            users.push(user_id);
        }
        Ok(())
    }

    async fn remove(&self, user_id: u64) -> Result<()> {
        self.users.lock().retain(|id| *id != user_id);
        Ok(())
    }

    async fn contains(&self, user_id: u64) -> Result<bool> {
        Ok(self.users.lock().contains(&user_id))
    }

    async fn list(&self) -> Result<Vec<u64>> {
        Ok(self.users.lock().clone())
    }
}

/// Directory kept in insertion order. `fail_reads` simulates a storage outage.
#[derive(Default)]
pub struct MemoryDirectory {
    entries: Mutex<Vec<DirectoryEntry>>,
    pub fail_reads: Mutex<bool>,
}

#[async_trait]
impl DirectoryStore for MemoryDirectory {
    async fn upsert(&self, entry: DirectoryEntry) -> Result<()> {
        let mut entries = self.entries.lock();
        match entries.iter_mut().find(|e| e.chat_id == entry.chat_id) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
        Ok(())
    }

    async fn remove(&self, chat_id: i64) -> Result<()> {
        self.entries.lock().retain(|e| e.chat_id != chat_id);
        Ok(())
    }

    async fn get(&self, chat_id: i64) -> Result<Option<DirectoryEntry>> {
        Ok(self
            .entries
            .lock()
            .iter()
            .find(|e| e.chat_id == chat_id)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<DirectoryEntry>> {
        if *self.fail_reads.lock() {
            bail!("directory unavailable");
        }
        Ok(self.entries.lock().clone())
    }
}

#[derive(Default)]
pub struct MemoryBanLedger {
    records: Mutex<Vec<BanRecord>>,
}

#[async_trait]
impl BanLedger for MemoryBanLedger {
    async fn add(&self, user_id: u64, reason: &str) -> Result<()> {
        let mut records = self.records.lock();
        if !records.iter().any(|r| r.user_id == user_id) {
            records.push(BanRecord::new(user_id, reason));
        }
        Ok(())
    }

    async fn remove(&self, user_id: u64) -> Result<()> {
        self.records.lock().retain(|r| r.user_id != user_id);
        Ok(())
    }

    async fn get(&self, user_id: u64) -> Result<Option<BanRecord>> {
        Ok(self
            .records
            .lock()
            .iter()
            .find(|r| r.user_id == user_id)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<BanRecord>> {
        Ok(self.records.lock().clone())
    }
}

/// Admin cache. `fail_writes` simulates a storage outage.
#[derive(Default)]
pub struct MemoryAdminCache {
    entries: Mutex<HashMap<i64, AdminCacheEntry>>,
    pub fail_writes: Mutex<bool>,
}

#[async_trait]
impl AdminCacheStore for MemoryAdminCache {
    async fn replace(&self, chat_id: i64, admins: Vec<u64>) -> Result<()> {
        if *self.fail_writes.lock() {
            bail!("admin cache unavailable");
        }
        self.entries
            .lock()
            .insert(chat_id, AdminCacheEntry::new(chat_id, admins));
        Ok(())
    }

    async fn get(&self, chat_id: i64) -> Result<Option<AdminCacheEntry>> {
        Ok(self.entries.lock().get(&chat_id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<AdminCacheEntry>> {
        Ok(self.entries.lock().values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::ChatCategory;

    #[tokio::test]
    async fn test_directory_upsert_last_write_wins() {
        let directory = MemoryDirectory::default();
        directory
            .upsert(DirectoryEntry::new(-1, ChatCategory::Group, "https://t.me/a", "First"))
            .await
            .unwrap();
        directory
            .upsert(DirectoryEntry::new(-1, ChatCategory::Channel, "https://t.me/b", "Second"))
            .await
            .unwrap();

        let all = directory.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Second");
        assert_eq!(all[0].category, ChatCategory::Channel);
        assert_eq!(all[0].invite_link, "https://t.me/b");
    }

    #[tokio::test]
    async fn test_directory_keeps_insertion_order() {
        let directory = MemoryDirectory::default();
        for id in [-3, -1, -2] {
            directory
                .upsert(DirectoryEntry::new(id, ChatCategory::Group, "", ""))
                .await
                .unwrap();
        }
        directory.remove(-99).await.unwrap();

        let ids: Vec<i64> = directory
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.chat_id)
            .collect();
        assert_eq!(ids, vec![-3, -1, -2]);
    }

    #[tokio::test]
    async fn test_ban_add_is_idempotent_and_keeps_first_reason() {
        let ledger = MemoryBanLedger::default();
        ledger.add(42, "spam").await.unwrap();
        ledger.add(42, "other").await.unwrap();

        let all = ledger.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].reason, "spam");
    }

    #[tokio::test]
    async fn test_role_remove_absent_is_noop() {
        let sudos = MemoryRoleStore::default();
        sudos.remove(7).await.unwrap();
        sudos.add(7).await.unwrap();
        sudos.add(7).await.unwrap();

        assert_eq!(sudos.list().await.unwrap(), vec![7]);
        assert!(sudos.contains(7).await.unwrap());
    }

    #[tokio::test]
    async fn test_admin_cache_replace_drops_previous_set() {
        let cache = MemoryAdminCache::default();
        cache.replace(-5, vec![1, 2]).await.unwrap();
        cache.replace(-5, vec![3]).await.unwrap();

        let entry = cache.get(-5).await.unwrap().unwrap();
        assert_eq!(entry.admins, vec![3]);
    }
}
