//! /start and /help.

use teloxide::prelude::*;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::get_text;
use crate::utils::reply_html;

/// Handle the /start command.
pub async fn start_command(
    bot: ThrottledBot,
    msg: Message,
    _state: AppState,
) -> anyhow::Result<()> {
    reply_html(&bot, &msg, get_text("start.running")).await
}

/// Handle the /help command.
pub async fn help_command(
    bot: ThrottledBot,
    msg: Message,
    _state: AppState,
) -> anyhow::Result<()> {
    reply_html(&bot, &msg, get_text("help.text")).await
}
