//! User profile repository with a cache in front of MongoDB.
//!
//! Every message sender is upserted in the background; writes are skipped
//! when the cached profile is unchanged.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use moka::sync::Cache;
use mongodb::bson::doc;
use mongodb::options::ReplaceOptions;
use mongodb::Collection;
use teloxide::types::User;
use tokio::spawn;
use tracing::{debug, warn};

use super::models::UserProfile;
use super::Database;

const COLLECTION: &str = "users";

/// Profiles known to be stored in MongoDB.
///
/// An entry is only added once its write succeeded, so a failed write is
/// retried on the next message from that user.
struct ProfileCache {
    inner: Cache<u64, UserProfile>,
}

impl ProfileCache {
    fn new() -> Self {
        let inner = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(Duration::from_secs(3600))
            .build();
        Self { inner }
    }

    /// Profile to write for `user`, or `None` when the stored one is current.
    fn pending(&self, user: &User) -> Option<UserProfile> {
        match self.inner.get(&user.id.0) {
            Some(cached) if !cached.has_changed(user) => None,
            _ => Some(UserProfile::from_telegram(user)),
        }
    }

    fn commit(&self, profile: UserProfile) {
        self.inner.insert(profile.user_id, profile);
    }

    fn get(&self, user_id: u64) -> Option<UserProfile> {
        self.inner.get(&user_id)
    }
}

/// Repository for user profiles.
pub struct ProfileRepository {
    collection: Collection<UserProfile>,
    cache: ProfileCache,
}

impl ProfileRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
            cache: ProfileCache::new(),
        }
    }

    pub async fn init(&self, db: &Database) -> Result<()> {
        db.ensure_unique_index(COLLECTION, "user_id").await
    }

    /// Insert or update a user profile.
    pub async fn upsert(&self, user: &User) -> Result<()> {
        let Some(profile) = self.cache.pending(user) else {
            return Ok(());
        };

        let options = ReplaceOptions::builder().upsert(true).build();
        self.collection
            .replace_one(doc! { "user_id": profile.user_id as i64 }, &profile)
            .with_options(options)
            .await?;

        debug!("Upserted profile {} (@{:?})", profile.user_id, profile.username);
        self.cache.commit(profile);
        Ok(())
    }

    /// Upsert in the background (non-blocking).
    pub fn upsert_background(self: Arc<Self>, user: User) {
        spawn(async move {
            if let Err(e) = self.upsert(&user).await {
                warn!("Failed to upsert profile {}: {}", user.id, e);
            }
        });
    }

    pub async fn get(&self, user_id: u64) -> Result<Option<UserProfile>> {
        if let Some(profile) = self.cache.get(user_id) {
            return Ok(Some(profile));
        }

        let result = self
            .collection
            .find_one(doc! { "user_id": user_id as i64 })
            .await?;

        if let Some(profile) = &result {
            self.cache.commit(profile.clone());
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u64, first_name: &str) -> User {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "is_bot": false,
            "first_name": first_name,
        }))
        .unwrap()
    }

    #[test]
    fn test_new_user_is_pending() {
        let cache = ProfileCache::new();
        let profile = cache.pending(&user(1, "Ann")).unwrap();
        assert_eq!(profile.user_id, 1);
    }

    #[test]
    fn test_uncommitted_profile_stays_pending() {
        let cache = ProfileCache::new();
        let ann = user(1, "Ann");

        // Write failed: nothing committed, so the next message retries.
        assert!(cache.pending(&ann).is_some());
        assert!(cache.pending(&ann).is_some());
        assert!(cache.get(1).is_none());
    }

    #[test]
    fn test_committed_profile_skips_until_changed() {
        let cache = ProfileCache::new();
        let ann = user(1, "Ann");

        let profile = cache.pending(&ann).unwrap();
        cache.commit(profile);
        assert!(cache.pending(&ann).is_none());

        let renamed = cache.pending(&user(1, "Anna")).unwrap();
        assert_eq!(renamed.first_name, "Anna");
    }
}
