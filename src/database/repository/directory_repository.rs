//! Directory repository.
//!
//! Upserts replace the whole document so the last write wins, while the
//! `_id` of an existing entry is kept and storage order stays stable.

use anyhow::Result;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::ReplaceOptions;
use mongodb::Collection;
use tracing::debug;

use crate::database::models::DirectoryEntry;
use crate::database::store::DirectoryStore;
use crate::database::Database;

use super::insertion_order;

fn chat_filter(chat_id: i64) -> Document {
    doc! { "chat_id": chat_id }
}

const COLLECTION: &str = "directory";

/// MongoDB-backed chat directory.
pub struct DirectoryRepository {
    collection: Collection<DirectoryEntry>,
}

impl DirectoryRepository {
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
impl DirectoryStore for DirectoryRepository {
    async fn upsert(&self, entry: DirectoryEntry) -> Result<()> {
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(chat_filter(entry.chat_id), &entry)
            .with_options(options)
            .await?;

        debug!("Saved directory entry {} ({})", entry.chat_id, entry.category);
        Ok(())
    }

    async fn remove(&self, chat_id: i64) -> Result<()> {
        let result = self.collection.delete_one(chat_filter(chat_id)).await?;
        debug!("Removed directory entry {}: {}", chat_id, result.deleted_count > 0);
        Ok(())
    }

    async fn get(&self, chat_id: i64) -> Result<Option<DirectoryEntry>> {
        Ok(self.collection.find_one(chat_filter(chat_id)).await?)
    }

    async fn list_all(&self) -> Result<Vec<DirectoryEntry>> {
        let entries = self
            .collection
            .find(doc! {})
            .sort(insertion_order())
            .await?
            .try_collect()
            .await?;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::ChatCategory;
    use mongodb::bson::to_document;

    #[test]
    fn test_replacement_keeps_existing_id() {
        let entry = DirectoryEntry::new(-100, ChatCategory::Group, "https://t.me/x", "Fans");
        let replacement = to_document(&entry).unwrap();

        // A replacement without `_id` keeps the stored one, and with it the
        // entry's place in insertion order.
        assert!(!replacement.contains_key("_id"));
        assert_eq!(replacement.get("chat_id"), chat_filter(-100).get("chat_id"));
        assert_eq!(replacement.get_str("category").unwrap(), "group");
        assert_eq!(insertion_order(), doc! { "_id": 1 });
    }
}
