//! Message dispatcher setup.
//!
//! Builds the dispatcher with the command router and user tracking.

use std::sync::Arc;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

use crate::config::Config;
use crate::database::{ProfileRepository, Stores};
use crate::fanout::{ChatMembership, FanOutExecutor};
use crate::permissions::{ChatContext, ChatKind, PermissionGate};
use crate::plugins;

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Persistent stores (roles, directory, bans, admin cache).
    pub stores: Stores,

    /// Permission gate over owners, staff stores and chat membership.
    pub gate: PermissionGate,

    /// Directory-wide fan-out of bans, unbans and admin refreshes.
    pub fanout: FanOutExecutor,

    /// Remote membership API (title lookups, chat info).
    pub membership: Arc<dyn ChatMembership>,

    /// User profiles for staff listings.
    pub profiles: Arc<ProfileRepository>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        bot: &ThrottledBot,
        config: &Config,
        stores: Stores,
        profiles: Arc<ProfileRepository>,
    ) -> Self {
        // Membership calls go through the inner Bot; Throttle only matters
        // for outgoing messages.
        let membership: Arc<dyn ChatMembership> = Arc::new(bot.inner().clone());

        let gate = PermissionGate::new(
            config.owner_ids.clone(),
            stores.sudos.clone(),
            stores.global_admins.clone(),
            config.global_admins_are_staff,
            membership.clone(),
        );
        let fanout = FanOutExecutor::new(
            stores.directory.clone(),
            stores.admin_cache.clone(),
            membership.clone(),
        );

        Self {
            stores,
            gate,
            fanout,
            membership,
            profiles,
        }
    }

    /// Permission context of the chat a message came from.
    pub fn chat_context(msg: &Message) -> ChatContext {
        let kind = if msg.chat.is_supergroup() {
            ChatKind::Supergroup
        } else if msg.chat.is_group() {
            ChatKind::Group
        } else if msg.chat.is_channel() {
            ChatKind::Channel
        } else {
            ChatKind::Private
        };
        ChatContext::new(msg.chat.id.0, kind)
    }
}

/// Build the dispatcher with all handlers.
pub fn build_dispatcher(
    bot: ThrottledBot,
    state: AppState,
) -> Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey> {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    Update::filter_message()
        .inspect_async(track_user)
        .branch(plugins::command_handler())
}

/// Track user from message (runs before all handlers).
async fn track_user(msg: Message, state: AppState) {
    if let Some(user) = msg.from.as_ref() {
        state.profiles.clone().upsert_background(user.clone());
    }
}
