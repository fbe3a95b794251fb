//! Test doubles for the remote membership API.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;
use teloxide::{ApiError, RequestError};

use crate::fanout::{ChatMembership, ChatSummary, MemberStatus, MembershipError};

fn chat_not_found() -> MembershipError {
    MembershipError::Request(RequestError::Api(ApiError::ChatNotFound))
}

/// A remote call observed by [`FakeMembership`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Membership(i64, u64),
    Ban(i64, u64),
    Unban(i64, u64),
    Admins(i64),
}

/// Scripted membership API: every call in a chat listed by `failing_in`
/// errors, everything else succeeds.
#[derive(Default)]
pub struct FakeMembership {
    failing: HashSet<i64>,
    admins: HashMap<i64, Vec<u64>>,
    statuses: HashMap<(i64, u64), MemberStatus>,
    calls: Mutex<Vec<Call>>,
}

impl FakeMembership {
    pub fn failing_in(mut self, chats: &[i64]) -> Self {
        self.failing.extend(chats);
        self
    }

    pub fn with_admins(mut self, chat_id: i64, admins: &[u64]) -> Self {
        self.admins.insert(chat_id, admins.to_vec());
        self
    }

    pub fn with_status(mut self, chat_id: i64, user_id: u64, status: MemberStatus) -> Self {
        self.statuses.insert((chat_id, user_id), status);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn record(&self, call: Call, chat_id: i64) -> Result<(), MembershipError> {
        self.calls.lock().push(call);
        if self.failing.contains(&chat_id) {
            return Err(chat_not_found());
        }
        Ok(())
    }
}

#[async_trait]
impl ChatMembership for FakeMembership {
    async fn get_membership(
        &self,
        chat_id: i64,
        user_id: u64,
    ) -> Result<MemberStatus, MembershipError> {
        self.record(Call::Membership(chat_id, user_id), chat_id)?;
        Ok(self
            .statuses
            .get(&(chat_id, user_id))
            .copied()
            .unwrap_or(MemberStatus::Member))
    }

    async fn ban_member(&self, chat_id: i64, user_id: u64) -> Result<(), MembershipError> {
        self.record(Call::Ban(chat_id, user_id), chat_id)
    }

    async fn unban_member(&self, chat_id: i64, user_id: u64) -> Result<(), MembershipError> {
        self.record(Call::Unban(chat_id, user_id), chat_id)
    }

    async fn list_administrators(&self, chat_id: i64) -> Result<Vec<u64>, MembershipError> {
        self.record(Call::Admins(chat_id), chat_id)?;
        Ok(self.admins.get(&chat_id).cloned().unwrap_or_default())
    }

    async fn chat_title(&self, chat_id: i64) -> Result<Option<String>, MembershipError> {
        if self.failing.contains(&chat_id) {
            return Err(chat_not_found());
        }
        Ok(Some(format!("Chat {}", chat_id)))
    }

    async fn chat_summary(&self, chat_id: i64) -> Result<ChatSummary, MembershipError> {
        Ok(ChatSummary {
            id: chat_id,
            title: self.chat_title(chat_id).await?,
            kind: "supergroup",
            member_count: 0,
        })
    }
}
