//! Permission gate.
//!
//! Classifies a caller against the configured owners, the staff stores and
//! the caller's status in the current chat. Nothing is cached: every check
//! re-reads the stores and may issue a fresh remote lookup.

use std::sync::Arc;

use tracing::debug;

use crate::database::RoleStore;
use crate::fanout::ChatMembership;

/// Kind of chat a command arrived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group | Self::Supergroup)
    }
}

/// Chat a command was issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatContext {
    pub chat_id: i64,
    pub kind: ChatKind,
}

impl ChatContext {
    pub fn new(chat_id: i64, kind: ChatKind) -> Self {
        Self { chat_id, kind }
    }
}

/// Both permission flags of a caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub is_owner_or_sudo: bool,
    pub is_chat_admin: bool,
}

/// Who may run a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Owner, sudo users and (when merged) global admins.
    StaffOnly,
    /// Staff, or an administrator of the group the command came from.
    StaffOrChatAdmin,
}

impl Policy {
    /// Combine a classification under this policy.
    pub fn evaluate(&self, classification: Classification) -> Decision {
        let allowed = match self {
            Self::StaffOnly => classification.is_owner_or_sudo,
            Self::StaffOrChatAdmin => {
                classification.is_owner_or_sudo || classification.is_chat_admin
            }
        };
        if allowed { Decision::Allow } else { Decision::Deny }
    }
}

/// Outcome of a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Permission gate over owners, staff stores and remote chat membership.
#[derive(Clone)]
pub struct PermissionGate {
    owner_ids: Vec<u64>,
    sudos: Arc<dyn RoleStore>,
    global_admins: Arc<dyn RoleStore>,
    /// Count global admins as staff.
    merge_global_admins: bool,
    membership: Arc<dyn ChatMembership>,
}

impl PermissionGate {
    pub fn new(
        owner_ids: Vec<u64>,
        sudos: Arc<dyn RoleStore>,
        global_admins: Arc<dyn RoleStore>,
        merge_global_admins: bool,
        membership: Arc<dyn ChatMembership>,
    ) -> Self {
        Self {
            owner_ids,
            sudos,
            global_admins,
            merge_global_admins,
            membership,
        }
    }

    #[inline]
    pub fn is_bot_owner(&self, user_id: u64) -> bool {
        self.owner_ids.contains(&user_id)
    }

    pub fn owner_ids(&self) -> &[u64] {
        &self.owner_ids
    }

    /// Owner, sudo, or (when merged) global admin.
    ///
    /// # Errors
    /// Propagates store read failures.
    pub async fn is_owner_or_sudo(&self, user_id: u64) -> anyhow::Result<bool> {
        if self.is_bot_owner(user_id) {
            return Ok(true);
        }
        if self.sudos.contains(user_id).await? {
            return Ok(true);
        }
        if self.merge_global_admins && self.global_admins.contains(user_id).await? {
            return Ok(true);
        }
        Ok(false)
    }

    /// Whether the caller administers the group in `chat`.
    ///
    /// Only groups are looked up. Any remote failure means "not an admin".
    pub async fn is_chat_admin(&self, user_id: u64, chat: ChatContext) -> bool {
        if !chat.kind.is_group() {
            return false;
        }
        match self.membership.get_membership(chat.chat_id, user_id).await {
            Ok(status) => status.is_admin(),
            Err(e) => {
                debug!(
                    "Membership lookup for {} in {} failed, treating as non-admin: {}",
                    user_id, chat.chat_id, e
                );
                false
            }
        }
    }

    /// Compute both flags for a caller.
    pub async fn classify(
        &self,
        user_id: u64,
        chat: ChatContext,
    ) -> anyhow::Result<Classification> {
        Ok(Classification {
            is_owner_or_sudo: self.is_owner_or_sudo(user_id).await?,
            is_chat_admin: self.is_chat_admin(user_id, chat).await,
        })
    }

    /// Evaluate `policy` for a caller, skipping the remote lookup when the
    /// staff check already decides.
    pub async fn authorize(
        &self,
        policy: Policy,
        user_id: u64,
        chat: ChatContext,
    ) -> anyhow::Result<Decision> {
        let is_owner_or_sudo = self.is_owner_or_sudo(user_id).await?;
        let is_chat_admin = match policy {
            Policy::StaffOrChatAdmin if !is_owner_or_sudo => {
                self.is_chat_admin(user_id, chat).await
            }
            _ => false,
        };

        let decision = policy.evaluate(Classification {
            is_owner_or_sudo,
            is_chat_admin,
        });
        debug!("{:?} for user {} in {}: {:?}", policy, user_id, chat.chat_id, decision);
        Ok(decision)
    }
}
