//! Ping command plugin.
//!
//! Measures and displays Telegram API latency.

use std::time::Instant;

use teloxide::prelude::*;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::get_text;
use crate::utils::reply_html;

/// Handle the /ping command - measures Telegram API latency.
pub async fn ping_command(
    bot: ThrottledBot,
    msg: Message,
    _state: AppState,
) -> anyhow::Result<()> {
    let start = Instant::now();
    let _ = bot.get_me().await;
    let ms = start.elapsed().as_millis();

    let emoji = if ms < 100 {
        "🟢"
    } else if ms < 300 {
        "🟡"
    } else {
        "🔴"
    };

    let text = get_text("ping.pong")
        .replace("{emoji}", emoji)
        .replace("{ms}", &ms.to_string());
    reply_html(&bot, &msg, text).await
}
