//! Database module exports.

#[cfg(test)]
pub mod memory;
mod models;
mod mongo;
mod profiles;
mod repository;
mod store;

use std::sync::Arc;

use tracing::info;

pub use models::*;
pub use mongo::Database;
pub use profiles::ProfileRepository;
pub use repository::{AdminCacheRepository, BanRepository, DirectoryRepository, RoleRepository};
pub use store::{AdminCacheStore, BanLedger, DirectoryStore, RoleStore};

/// Handles to every persistent store, shared across handlers.
#[derive(Clone)]
pub struct Stores {
    pub sudos: Arc<dyn RoleStore>,
    pub global_admins: Arc<dyn RoleStore>,
    pub directory: Arc<dyn DirectoryStore>,
    pub bans: Arc<dyn BanLedger>,
    pub admin_cache: Arc<dyn AdminCacheStore>,
}

impl Stores {
    /// Open the MongoDB-backed stores and create their indexes.
    pub async fn mongo(db: &Database) -> anyhow::Result<Self> {
        let sudos = RoleRepository::new(db, StaffRole::Sudo);
        let global_admins = RoleRepository::new(db, StaffRole::GlobalAdmin);
        let directory = DirectoryRepository::new(db);
        let bans = BanRepository::new(db);
        let admin_cache = AdminCacheRepository::new(db);

        sudos.init(db).await?;
        global_admins.init(db).await?;
        directory.init(db).await?;
        bans.init(db).await?;
        admin_cache.init(db).await?;
        info!("Store indexes ensured");

        Ok(Self {
            sudos: Arc::new(sudos),
            global_admins: Arc::new(global_admins),
            directory: Arc::new(directory),
            bans: Arc::new(bans),
            admin_cache: Arc::new(admin_cache),
        })
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            sudos: Arc::new(memory::MemoryRoleStore::default()),
            global_admins: Arc::new(memory::MemoryRoleStore::default()),
            directory: Arc::new(memory::MemoryDirectory::default()),
            bans: Arc::new(memory::MemoryBanLedger::default()),
            admin_cache: Arc::new(memory::MemoryAdminCache::default()),
        }
    }

    /// Store for the given staff role.
    pub fn role(&self, role: StaffRole) -> &Arc<dyn RoleStore> {
        match role {
            StaffRole::Sudo => &self.sudos,
            StaffRole::GlobalAdmin => &self.global_admins,
        }
    }
}
