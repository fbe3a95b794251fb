//! Staff role repository.
//!
//! One collection per role; documents only carry the user ID and when it
//! was added.

use anyhow::Result;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::UpdateOptions;
use mongodb::Collection;
use tracing::debug;

use crate::database::models::{StaffEntry, StaffRole};
use crate::database::store::RoleStore;
use crate::database::Database;

use super::insertion_order;

fn user_filter(user_id: u64) -> Document {
    doc! { "user_id": user_id as i64 }
}

/// Update that only writes when the document is created, so adding an
/// existing member leaves it untouched.
fn insert_once(entry: &StaffEntry) -> Document {
    doc! { "$setOnInsert": { "added_at": entry.added_at } }
}

/// MongoDB-backed role list.
pub struct RoleRepository {
    collection: Collection<StaffEntry>,
    role: StaffRole,
}

impl RoleRepository {
    pub fn new(db: &Database, role: StaffRole) -> Self {
        Self {
            collection: db.collection(role.collection_name()),
            role,
        }
    }

    /// Create the unique index backing idempotent inserts.
    pub async fn init(&self, db: &Database) -> Result<()> {
        db.ensure_unique_index(self.role.collection_name(), "user_id").await
    }
}

#[async_trait]
impl RoleStore for RoleRepository {
    async fn add(&self, user_id: u64) -> Result<()> {
        let entry = StaffEntry::new(user_id);
        let options = UpdateOptions::builder().upsert(true).build();

        let result = self
            .collection
            .update_one(user_filter(user_id), insert_once(&entry))
            .with_options(options)
            .await?;

        debug!(
            "Add {} {}: inserted={}",
            self.role,
            user_id,
            result.upserted_id.is_some()
        );
        Ok(())
    }

    async fn remove(&self, user_id: u64) -> Result<()> {
        let result = self.collection.delete_one(user_filter(user_id)).await?;
        debug!("Remove {} {}: {}", self.role, user_id, result.deleted_count > 0);
        Ok(())
    }

    async fn contains(&self, user_id: u64) -> Result<bool> {
        Ok(self.collection.find_one(user_filter(user_id)).await?.is_some())
    }

    async fn list(&self) -> Result<Vec<u64>> {
        let entries: Vec<StaffEntry> = self
            .collection
            .find(doc! {})
            .sort(insertion_order())
            .await?
            .try_collect()
            .await?;

        Ok(entries.into_iter().map(|e| e.user_id).collect())
    }
}
