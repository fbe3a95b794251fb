//! Remote chat membership calls.
//!
//! The only network-facing operations of the moderation core. Each call is
//! independent and may fail for any reason; callers treat all failures alike.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatMemberKind, UserId};
use thiserror::Error;

/// Failure of a single remote membership call.
#[derive(Debug, Error)]
pub enum MembershipError {
    #[error("telegram request failed: {0}")]
    Request(#[from] teloxide::RequestError),
}

/// Status of a user in a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Creator,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
}

impl MemberStatus {
    /// Creator or administrator.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Creator | Self::Administrator)
    }

    fn from_kind(kind: &ChatMemberKind) -> Self {
        if kind.is_owner() {
            Self::Creator
        } else if kind.is_administrator() {
            Self::Administrator
        } else if kind.is_restricted() {
            Self::Restricted
        } else if kind.is_left() {
            Self::Left
        } else if kind.is_banned() {
            Self::Banned
        } else {
            Self::Member
        }
    }
}

/// Basic information about a remote chat.
#[derive(Debug, Clone)]
pub struct ChatSummary {
    pub id: i64,
    pub title: Option<String>,
    pub kind: &'static str,
    pub member_count: u32,
}

/// Outbound membership API used by the gate and the fan-out executor.
#[async_trait]
pub trait ChatMembership: Send + Sync {
    async fn get_membership(&self, chat_id: i64, user_id: u64)
        -> Result<MemberStatus, MembershipError>;

    async fn ban_member(&self, chat_id: i64, user_id: u64) -> Result<(), MembershipError>;

    async fn unban_member(&self, chat_id: i64, user_id: u64) -> Result<(), MembershipError>;

    async fn list_administrators(&self, chat_id: i64) -> Result<Vec<u64>, MembershipError>;

    /// Title of a chat, if it has one.
    async fn chat_title(&self, chat_id: i64) -> Result<Option<String>, MembershipError>;

    async fn chat_summary(&self, chat_id: i64) -> Result<ChatSummary, MembershipError>;
}

#[async_trait]
impl ChatMembership for Bot {
    async fn get_membership(
        &self,
        chat_id: i64,
        user_id: u64,
    ) -> Result<MemberStatus, MembershipError> {
        let member = self.get_chat_member(ChatId(chat_id), UserId(user_id)).await?;
        Ok(MemberStatus::from_kind(&member.kind))
    }

    async fn ban_member(&self, chat_id: i64, user_id: u64) -> Result<(), MembershipError> {
        self.ban_chat_member(ChatId(chat_id), UserId(user_id)).await?;
        Ok(())
    }

    async fn unban_member(&self, chat_id: i64, user_id: u64) -> Result<(), MembershipError> {
        // Without only_if_banned, Telegram kicks a user who is still a member.
        self.unban_chat_member(ChatId(chat_id), UserId(user_id))
            .only_if_banned(true)
            .await?;
        Ok(())
    }

    async fn list_administrators(&self, chat_id: i64) -> Result<Vec<u64>, MembershipError> {
        let admins = self.get_chat_administrators(ChatId(chat_id)).await?;
        Ok(admins.into_iter().map(|m| m.user.id.0).collect())
    }

    async fn chat_title(&self, chat_id: i64) -> Result<Option<String>, MembershipError> {
        let chat = self.get_chat(ChatId(chat_id)).await?;
        Ok(chat.title().map(str::to_string))
    }

    async fn chat_summary(&self, chat_id: i64) -> Result<ChatSummary, MembershipError> {
        let chat = self.get_chat(ChatId(chat_id)).await?;
        let member_count = self.get_chat_member_count(ChatId(chat_id)).await?;

        let kind = if chat.is_supergroup() {
            "supergroup"
        } else if chat.is_group() {
            "group"
        } else if chat.is_channel() {
            "channel"
        } else {
            "private"
        };

        Ok(ChatSummary {
            id: chat.id.0,
            title: chat.title().map(str::to_string),
            kind,
            member_count,
        })
    }
}
