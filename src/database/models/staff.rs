//! Staff role models (sudo users and global admins).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which staff list a role store holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffRole {
    Sudo,
    GlobalAdmin,
}

impl StaffRole {
    /// Collection backing this role.
    pub fn collection_name(&self) -> &'static str {
        match self {
            Self::Sudo => "sudos",
            Self::GlobalAdmin => "global_admins",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sudo => f.write_str("sudo"),
            Self::GlobalAdmin => f.write_str("global admin"),
        }
    }
}

/// A member of a staff list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffEntry {
    pub user_id: u64,
    #[serde(default)]
    pub added_at: i64,
}

impl StaffEntry {
    pub fn new(user_id: u64) -> Self {
        Self {
            user_id,
            added_at: chrono::Utc::now().timestamp(),
        }
    }
}
