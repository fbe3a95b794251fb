//! Admin cache commands.

use teloxide::prelude::*;

use super::staff::staff_line;
use super::{guard, reply_usage, report_text};
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::AdminCacheStore;
use crate::fanout::FanOutAction;
use crate::i18n::get_text;
use crate::permissions::Policy;
use crate::utils::{reply_html, reply_html_chunked, ArgError, CommandArgs};

/// Handle /refreshadmins - refresh the admin cache of every managed chat.
pub async fn refreshadmins_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    if !guard(&bot, &msg, &state, Policy::StaffOnly, "common.unauthorized").await? {
        return Ok(());
    }

    let report = state.fanout.propagate(FanOutAction::RefreshAdmins).await?;
    let text = report_text("admins.refreshed", &report);
    reply_html(&bot, &msg, text).await
}

/// Handle /chatadmins [chat_id] - show the cached admin set of a chat.
///
/// Defaults to the current chat when used inside a group.
pub async fn chatadmins_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    if !guard(&bot, &msg, &state, Policy::StaffOnly, "common.unauthorized").await? {
        return Ok(());
    }

    let usage = "/chatadmins <chat_id>";
    let chat_id = match CommandArgs::parse(&args).optional_chat_id(0) {
        Ok(Some(id)) => id,
        Ok(None) if AppState::chat_context(&msg).kind.is_group() => msg.chat.id.0,
        Ok(None) => return reply_usage(&bot, &msg, &ArgError::Missing("chat_id"), usage).await,
        Err(e) => return reply_usage(&bot, &msg, &e, usage).await,
    };

    let Some(entry) = state.stores.admin_cache.get(chat_id).await? else {
        let text = get_text("admins.not_cached").replace("{id}", &chat_id.to_string());
        return reply_html(&bot, &msg, text).await;
    };

    let refreshed = chrono::DateTime::from_timestamp(entry.refreshed_at, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| entry.refreshed_at.to_string());

    let mut text = get_text("admins.cached_header")
        .replace("{id}", &chat_id.to_string())
        .replace("{time}", &refreshed);
    text.push('\n');
    for admin in &entry.admins {
        text.push_str(&staff_line(&state, *admin, "User").await);
    }

    reply_html_chunked(&bot, &msg, &text).await
}
