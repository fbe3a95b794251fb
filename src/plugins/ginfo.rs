//! /ginfo - basic information about a chat.

use teloxide::prelude::*;
use tracing::debug;

use super::{guard, reply_usage};
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::get_text;
use crate::permissions::Policy;
use crate::utils::{html_escape, reply_html, ArgError, CommandArgs};

/// Handle /ginfo [chat_id]. Defaults to the current group.
pub async fn ginfo_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    if !guard(&bot, &msg, &state, Policy::StaffOnly, "common.unauthorized_ginfo").await? {
        return Ok(());
    }

    let usage = "/ginfo <chat_id>";
    let chat_id = match CommandArgs::parse(&args).optional_chat_id(0) {
        Ok(Some(id)) => id,
        Ok(None) if AppState::chat_context(&msg).kind.is_group() => msg.chat.id.0,
        Ok(None) => return reply_usage(&bot, &msg, &ArgError::Missing("chat_id"), usage).await,
        Err(e) => return reply_usage(&bot, &msg, &e, usage).await,
    };

    let summary = match state.membership.chat_summary(chat_id).await {
        Ok(summary) => summary,
        Err(e) => {
            debug!("ginfo for {} failed: {}", chat_id, e);
            return reply_html(&bot, &msg, get_text("ginfo.failed")).await;
        }
    };

    let text = get_text("ginfo.text")
        .replace("{title}", &html_escape(summary.title.as_deref().unwrap_or("-")))
        .replace("{id}", &summary.id.to_string())
        .replace("{type}", summary.kind)
        .replace("{members}", &summary.member_count.to_string());
    reply_html(&bot, &msg, text).await
}
