//! Global ban commands.
//!
//! The ledger is updated first, then the action is fanned out to every
//! directory chat. The ledger entry stays whatever the fan-out outcome.

use teloxide::prelude::*;
use tracing::info;

use super::{guard, reply_usage, report_text};
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::BanLedger;
use crate::fanout::FanOutAction;
use crate::i18n::get_text;
use crate::permissions::Policy;
use crate::utils::{html_escape, reply_html, reply_html_chunked, CommandArgs};

/// Handle /nban <user_id> [reason].
pub async fn nban_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    if !guard(&bot, &msg, &state, Policy::StaffOnly, "common.unauthorized").await? {
        return Ok(());
    }

    let args = CommandArgs::parse(&args);
    let target = match args.user_id(0) {
        Ok(id) => id,
        Err(e) => return reply_usage(&bot, &msg, &e, "/nban <user_id> [reason]").await,
    };
    let reason = args.rest(1).unwrap_or_default();

    state.stores.bans.add(target, &reason).await?;
    info!("Global ban {} recorded, reason: {:?}", target, reason);

    let report = state.fanout.propagate(FanOutAction::Ban(target)).await?;
    let text = report_text("gban.banned", &report);
    reply_html(&bot, &msg, text).await
}

/// Handle /unban <user_id>.
pub async fn unban_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    if !guard(&bot, &msg, &state, Policy::StaffOnly, "common.unauthorized").await? {
        return Ok(());
    }

    let target = match CommandArgs::parse(&args).user_id(0) {
        Ok(id) => id,
        Err(e) => return reply_usage(&bot, &msg, &e, "/unban <user_id>").await,
    };

    state.stores.bans.remove(target).await?;
    info!("Global ban {} lifted", target);

    let report = state.fanout.propagate(FanOutAction::Unban(target)).await?;
    let text = report_text("gban.unbanned", &report);
    reply_html(&bot, &msg, text).await
}

/// Handle /gbans - list the ledger.
pub async fn gbans_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    if !guard(&bot, &msg, &state, Policy::StaffOnly, "common.unauthorized").await? {
        return Ok(());
    }

    let records = state.stores.bans.list_all().await?;
    if records.is_empty() {
        return reply_html(&bot, &msg, get_text("gban.list_empty")).await;
    }

    let mut text = get_text("gban.list_header");
    text.push('\n');
    for record in records {
        text.push_str(&format!("- <code>{}</code>", record.user_id));
        if !record.reason.is_empty() {
            text.push_str(&format!(" — {}", html_escape(&record.reason)));
        }
        text.push('\n');
    }

    reply_html_chunked(&bot, &msg, &text).await
}
