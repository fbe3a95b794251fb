//! Database models.

pub mod admin_cache;
pub mod ban;
pub mod directory;
pub mod profile;
pub mod staff;

pub use admin_cache::AdminCacheEntry;
pub use ban::BanRecord;
pub use directory::{ChatCategory, DirectoryEntry};
pub use profile::UserProfile;
pub use staff::{StaffEntry, StaffRole};
