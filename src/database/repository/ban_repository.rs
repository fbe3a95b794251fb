//! Global ban ledger repository.

use anyhow::Result;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::UpdateOptions;
use mongodb::Collection;
use tracing::debug;

use crate::database::models::BanRecord;
use crate::database::store::BanLedger;
use crate::database::Database;

use super::insertion_order;

fn user_filter(user_id: u64) -> Document {
    doc! { "user_id": user_id as i64 }
}

/// Fields written only when the document is created; a repeat ban keeps
/// the original reason and timestamp.
fn insert_once(record: &BanRecord) -> Document {
    doc! {
        "$setOnInsert": {
            "reason": record.reason.as_str(),
            "banned_at": record.banned_at,
        }
    }
}

const COLLECTION: &str = "global_bans";

/// MongoDB-backed ban ledger.
pub struct BanRepository {
    collection: Collection<BanRecord>,
}

impl BanRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
        }
    }

    pub async fn init(&self, db: &Database) -> Result<()> {
        db.ensure_unique_index(COLLECTION, "user_id").await
    }
}

#[async_trait]
impl BanLedger for BanRepository {
    async fn add(&self, user_id: u64, reason: &str) -> Result<()> {
        let record = BanRecord::new(user_id, reason);
        let options = UpdateOptions::builder().upsert(true).build();

        let result = self
            .collection
            .update_one(user_filter(user_id), insert_once(&record))
            .with_options(options)
            .await?;

        debug!("Ledger add {}: inserted={}", user_id, result.upserted_id.is_some());
        Ok(())
    }

    async fn remove(&self, user_id: u64) -> Result<()> {
        let result = self.collection.delete_one(user_filter(user_id)).await?;
        debug!("Ledger remove {}: {}", user_id, result.deleted_count > 0);
        Ok(())
    }

    async fn get(&self, user_id: u64) -> Result<Option<BanRecord>> {
        Ok(self.collection.find_one(user_filter(user_id)).await?)
    }

    async fn list_all(&self) -> Result<Vec<BanRecord>> {
        let records = self
            .collection
            .find(doc! {})
            .sort(insertion_order())
            .await?
            .try_collect()
            .await?;

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::to_document;

    #[test]
    fn test_filter_matches_stored_user_id() {
        let stored = to_document(&BanRecord::new(42, "spam")).unwrap();
        assert_eq!(stored.get("user_id"), user_filter(42).get("user_id"));
    }

    #[test]
    fn test_repeat_ban_cannot_overwrite_reason() {
        let update = insert_once(&BanRecord {
            user_id: 42,
            reason: "spam".to_string(),
            banned_at: 100,
        });

        // Nothing outside $setOnInsert, so a matched document is unchanged.
        assert_eq!(update.keys().collect::<Vec<_>>(), vec!["$setOnInsert"]);
        let on_insert = update.get_document("$setOnInsert").unwrap();
        assert_eq!(on_insert.get_str("reason").unwrap(), "spam");
        assert_eq!(on_insert.get_i64("banned_at").unwrap(), 100);
        assert!(!on_insert.contains_key("user_id"));
    }
}
