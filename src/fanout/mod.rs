//! Fan-out of administrative actions across the chat directory.
//!
//! - `membership` - outbound Telegram membership calls behind a trait
//! - `executor` - sequential per-chat execution with per-chat outcomes

mod executor;
mod membership;

pub use executor::{EntryFailure, EntryOutcome, FanOutAction, FanOutExecutor, FanOutReport};
pub use membership::{ChatMembership, ChatSummary, MemberStatus, MembershipError};
