//! Directory-wide fan-out of administrative actions.
//!
//! The directory is read once per run; every chat is then handled strictly
//! one after another. A failing chat is recorded and the loop moves on.
//! Nothing is retried or rolled back.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::membership::{ChatMembership, MembershipError};
use crate::database::{AdminCacheStore, DirectoryStore};

/// Action applied to every directory chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanOutAction {
    Ban(u64),
    Unban(u64),
    RefreshAdmins,
}

impl fmt::Display for FanOutAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ban(user_id) => write!(f, "ban {}", user_id),
            Self::Unban(user_id) => write!(f, "unban {}", user_id),
            Self::RefreshAdmins => f.write_str("refresh admins"),
        }
    }
}

/// Why a single chat failed.
#[derive(Debug, Error)]
pub enum EntryFailure {
    #[error(transparent)]
    Remote(#[from] MembershipError),

    #[error("admin cache write failed: {0:#}")]
    Cache(anyhow::Error),
}

/// Result of the action on one chat.
#[derive(Debug)]
pub struct EntryOutcome {
    pub chat_id: i64,
    pub result: Result<(), EntryFailure>,
}

impl EntryOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-chat outcomes of one fan-out run, in directory order.
#[derive(Debug)]
pub struct FanOutReport {
    pub action: FanOutAction,
    pub outcomes: Vec<EntryOutcome>,
}

impl FanOutReport {
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (i64, &EntryFailure)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.chat_id, e)))
    }
}

/// Runs fan-out actions over the directory.
#[derive(Clone)]
pub struct FanOutExecutor {
    directory: Arc<dyn DirectoryStore>,
    admin_cache: Arc<dyn AdminCacheStore>,
    membership: Arc<dyn ChatMembership>,
}

impl FanOutExecutor {
    pub fn new(
        directory: Arc<dyn DirectoryStore>,
        admin_cache: Arc<dyn AdminCacheStore>,
        membership: Arc<dyn ChatMembership>,
    ) -> Self {
        Self {
            directory,
            admin_cache,
            membership,
        }
    }

    /// Apply `action` to every chat in the directory.
    ///
    /// # Errors
    /// Only a failure to read the directory is returned; per-chat failures
    /// are recorded in the report.
    pub async fn propagate(&self, action: FanOutAction) -> anyhow::Result<FanOutReport> {
        let entries = self.directory.list_all().await?;
        info!("Fan-out {} over {} chats", action, entries.len());

        let mut outcomes = Vec::with_capacity(entries.len());
        for entry in &entries {
            let result = self.apply(action, entry.chat_id).await;
            match &result {
                Ok(()) => debug!("Fan-out {} ok in {}", action, entry.chat_id),
                Err(e) => warn!("Fan-out {} failed in {}: {}", action, entry.chat_id, e),
            }
            outcomes.push(EntryOutcome {
                chat_id: entry.chat_id,
                result,
            });
        }

        let report = FanOutReport { action, outcomes };
        info!(
            "Fan-out {} done: success={}, failed={}",
            action,
            report.success_count(),
            report.failure_count()
        );
        Ok(report)
    }

    async fn apply(&self, action: FanOutAction, chat_id: i64) -> Result<(), EntryFailure> {
        match action {
            FanOutAction::Ban(user_id) => self.membership.ban_member(chat_id, user_id).await?,
            FanOutAction::Unban(user_id) => self.membership.unban_member(chat_id, user_id).await?,
            FanOutAction::RefreshAdmins => {
                // A failed lookup returns before touching the cache, leaving
                // the previous set in place.
                let admins = self.membership.list_administrators(chat_id).await?;
                self.admin_cache
                    .replace(chat_id, admins)
                    .await
                    .map_err(EntryFailure::Cache)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::{MemoryAdminCache, MemoryDirectory};
    use crate::database::{BanLedger, ChatCategory, DirectoryEntry, Stores};
    use crate::testing::{Call, FakeMembership};

    async fn directory_with(ids: &[i64]) -> Arc<MemoryDirectory> {
        let directory = Arc::new(MemoryDirectory::default());
        for id in ids {
            directory
                .upsert(DirectoryEntry::new(*id, ChatCategory::Group, "https://t.me/x", ""))
                .await
                .unwrap();
        }
        directory
    }

    fn executor(
        directory: Arc<MemoryDirectory>,
        cache: Arc<MemoryAdminCache>,
        membership: Arc<FakeMembership>,
    ) -> FanOutExecutor {
        FanOutExecutor::new(directory, cache, membership)
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_loop() {
        let directory = directory_with(&[-1, -2, -3, -4, -5]).await;
        let membership = Arc::new(FakeMembership::default().failing_in(&[-1, -4]));
        let fanout = executor(directory, Arc::default(), membership.clone());

        let report = fanout.propagate(FanOutAction::Ban(42)).await.unwrap();

        assert_eq!(report.success_count(), 3);
        assert_eq!(report.failure_count(), 2);
        let failed: Vec<i64> = report.failures().map(|(id, _)| id).collect();
        assert_eq!(failed, vec![-1, -4]);
        // Every chat was attempted, in directory order.
        assert_eq!(
            membership.calls(),
            [-1, -2, -3, -4, -5].map(|c| Call::Ban(c, 42)).to_vec()
        );
    }

    #[tokio::test]
    async fn test_global_ban_scenario() {
        let stores = Stores::in_memory();
        for id in [-10, -20, -30] {
            stores
                .directory
                .upsert(DirectoryEntry::new(id, ChatCategory::Group, "link", ""))
                .await
                .unwrap();
        }
        let membership = Arc::new(FakeMembership::default().failing_in(&[-20]));
        let fanout = FanOutExecutor::new(
            stores.directory.clone(),
            stores.admin_cache.clone(),
            membership,
        );

        stores.bans.add(42, "").await.unwrap();
        let report = fanout.propagate(FanOutAction::Ban(42)).await.unwrap();

        assert_eq!(report.success_count(), 2);
        assert_eq!(report.failure_count(), 1);
        assert!(stores.bans.get(42).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unban_calls_unban() {
        let directory = directory_with(&[-1]).await;
        let membership = Arc::new(FakeMembership::default());
        let fanout = executor(directory, Arc::default(), membership.clone());

        let report = fanout.propagate(FanOutAction::Unban(9)).await.unwrap();

        assert_eq!(report.success_count(), 1);
        assert_eq!(membership.calls(), vec![Call::Unban(-1, 9)]);
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let fanout = executor(
            Arc::default(),
            Arc::default(),
            Arc::new(FakeMembership::default()),
        );

        let report = fanout.propagate(FanOutAction::Ban(1)).await.unwrap();
        assert_eq!(report.success_count(), 0);
        assert_eq!(report.failure_count(), 0);
    }

    #[tokio::test]
    async fn test_refresh_replaces_cached_admins() {
        let directory = directory_with(&[-1]).await;
        let cache = Arc::new(MemoryAdminCache::default());
        let membership = Arc::new(FakeMembership::default().with_admins(-1, &[1, 2]));
        let fanout = executor(directory.clone(), cache.clone(), membership);
        fanout.propagate(FanOutAction::RefreshAdmins).await.unwrap();

        let membership = Arc::new(FakeMembership::default().with_admins(-1, &[3]));
        let fanout = executor(directory, cache.clone(), membership);
        fanout.propagate(FanOutAction::RefreshAdmins).await.unwrap();

        assert_eq!(cache.get(-1).await.unwrap().unwrap().admins, vec![3]);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_stale_entry() {
        let directory = directory_with(&[-1, -2]).await;
        let cache = Arc::new(MemoryAdminCache::default());
        cache.replace(-1, vec![5]).await.unwrap();

        let membership = Arc::new(
            FakeMembership::default()
                .with_admins(-2, &[7])
                .failing_in(&[-1]),
        );
        let fanout = executor(directory, cache.clone(), membership);
        let report = fanout.propagate(FanOutAction::RefreshAdmins).await.unwrap();

        assert_eq!(report.success_count(), 1);
        assert_eq!(cache.get(-1).await.unwrap().unwrap().admins, vec![5]);
        assert_eq!(cache.get(-2).await.unwrap().unwrap().admins, vec![7]);
    }

    #[tokio::test]
    async fn test_cache_write_failure_counts_as_failure() {
        let directory = directory_with(&[-1]).await;
        let cache = Arc::new(MemoryAdminCache::default());
        *cache.fail_writes.lock() = true;
        let membership = Arc::new(FakeMembership::default().with_admins(-1, &[1]));
        let fanout = executor(directory, cache, membership);

        let report = fanout.propagate(FanOutAction::RefreshAdmins).await.unwrap();

        assert_eq!(report.failure_count(), 1);
        assert!(matches!(report.failures().next(), Some((-1, EntryFailure::Cache(_)))));
    }

    #[tokio::test]
    async fn test_directory_read_failure_propagates() {
        let directory = Arc::new(MemoryDirectory::default());
        *directory.fail_reads.lock() = true;
        let fanout = executor(directory, Arc::default(), Arc::new(FakeMembership::default()));

        assert!(fanout.propagate(FanOutAction::Ban(1)).await.is_err());
    }
}
