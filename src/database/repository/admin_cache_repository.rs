//! Admin cache repository.

use anyhow::Result;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::ReplaceOptions;
use mongodb::Collection;
use tracing::debug;

use crate::database::models::AdminCacheEntry;
use crate::database::store::AdminCacheStore;
use crate::database::Database;

fn chat_filter(chat_id: i64) -> Document {
    doc! { "chat_id": chat_id }
}

const COLLECTION: &str = "admin_cache";

/// MongoDB-backed admin cache, one document per chat.
pub struct AdminCacheRepository {
    collection: Collection<AdminCacheEntry>,
}

impl AdminCacheRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
        }
    }

    pub async fn init(&self, db: &Database) -> Result<()> {
        db.ensure_unique_index(COLLECTION, "chat_id").await
    }
}

#[async_trait]
impl AdminCacheStore for AdminCacheRepository {
    async fn replace(&self, chat_id: i64, admins: Vec<u64>) -> Result<()> {
        let entry = AdminCacheEntry::new(chat_id, admins);
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(chat_filter(chat_id), &entry)
            .with_options(options)
            .await?;

        debug!("Cached {} admins for chat {}", entry.admins.len(), chat_id);
        Ok(())
    }

    async fn get(&self, chat_id: i64) -> Result<Option<AdminCacheEntry>> {
        Ok(self.collection.find_one(chat_filter(chat_id)).await?)
    }

    async fn list_all(&self) -> Result<Vec<AdminCacheEntry>> {
        let entries = self.collection.find(doc! {}).await?.try_collect().await?;
        Ok(entries)
    }
}
