//! Reply helpers.
//!
//! Commands answer with an HTML reply to the command message. Long lists are
//! split on line boundaries so no message exceeds Telegram's length limit.

use teloxide::prelude::*;
use teloxide::types::{ParseMode, ReplyParameters};

use crate::bot::dispatcher::ThrottledBot;

/// Telegram's maximum message length, in characters.
pub const MAX_MESSAGE_LEN: usize = 4096;

/// Send `text` as an HTML reply to `msg`.
pub async fn reply_html(
    bot: &ThrottledBot,
    msg: &Message,
    text: impl Into<String>,
) -> anyhow::Result<()> {
    bot.send_message(msg.chat.id, text.into())
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    Ok(())
}

/// Send `text` as one or more HTML replies, each within [`MAX_MESSAGE_LEN`].
pub async fn reply_html_chunked(
    bot: &ThrottledBot,
    msg: &Message,
    text: &str,
) -> anyhow::Result<()> {
    for chunk in split_message(text, MAX_MESSAGE_LEN) {
        reply_html(bot, msg, chunk).await?;
    }
    Ok(())
}

/// Split `text` into pieces of at most `limit` characters.
///
/// Pieces break after a newline where possible, so HTML tags opened on a
/// line stay in the same piece. Only a single line longer than `limit` is
/// cut mid-line.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();

        if current_len + line_len > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len > limit {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(limit) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        current.push_str(line);
        current_len += line_len;
    }

    if !current.trim().is_empty() {
        chunks.push(current);
    }
    chunks
}
