//! Repository module - MongoDB implementations of the store traits.

use mongodb::bson::{doc, Document};

mod admin_cache_repository;
mod ban_repository;
mod directory_repository;
mod role_repository;

pub use admin_cache_repository::AdminCacheRepository;
pub use ban_repository::BanRepository;
pub use directory_repository::DirectoryRepository;
pub use role_repository::RoleRepository;

/// Sort by `_id`, i.e. by first insertion. Replacing a document keeps its
/// `_id`, so updated entries keep their position.
pub(crate) fn insertion_order() -> Document {
    doc! { "_id": 1 }
}
