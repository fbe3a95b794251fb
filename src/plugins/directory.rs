//! Directory commands.
//!
//! Staff maintain the list of managed chats. Group admins may read it from
//! inside their group.

use teloxide::prelude::*;
use tracing::{debug, info};

use super::{guard, reply_usage};
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::{ChatCategory, DirectoryEntry, DirectoryStore};
use crate::i18n::get_text;
use crate::permissions::Policy;
use crate::utils::{html_escape, reply_html, reply_html_chunked, CommandArgs};

/// Handle /directory - list every managed chat.
pub async fn directory_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let deny_key = "common.unauthorized_directory";
    if !guard(&bot, &msg, &state, Policy::StaffOrChatAdmin, deny_key).await? {
        return Ok(());
    }

    let entries = state.stores.directory.list_all().await?;
    if entries.is_empty() {
        return reply_html(&bot, &msg, get_text("directory.empty")).await;
    }

    let text: String = entries.iter().map(format_entry).collect();
    reply_html_chunked(&bot, &msg, &text).await
}

/// Handle /addgroup <chat_id> <link>.
pub async fn addgroup_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    add_entry(bot, msg, state, args, ChatCategory::Group).await
}

/// Handle /addchannel <chat_id> <link>.
pub async fn addchannel_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    add_entry(bot, msg, state, args, ChatCategory::Channel).await
}

/// Handle /rmgroup <chat_id>.
pub async fn rmgroup_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    remove_entry(bot, msg, state, args, ChatCategory::Group).await
}

/// Handle /rmchannel <chat_id>.
pub async fn rmchannel_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    remove_entry(bot, msg, state, args, ChatCategory::Channel).await
}

async fn add_entry(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
    category: ChatCategory,
) -> anyhow::Result<()> {
    if !guard(&bot, &msg, &state, Policy::StaffOnly, "common.unauthorized").await? {
        return Ok(());
    }

    let (usage, unknown_key, added_key) = match category {
        ChatCategory::Group => (
            "/addgroup <chat_id> <link>",
            "directory.unknown_group",
            "directory.group_added",
        ),
        ChatCategory::Channel => (
            "/addchannel <chat_id> <link>",
            "directory.unknown_channel",
            "directory.channel_added",
        ),
    };

    let args = CommandArgs::parse(&args);
    let parsed = args
        .chat_id(0)
        .and_then(|chat_id| Ok((chat_id, args.string(1, "link")?)));
    let (chat_id, link) = match parsed {
        Ok(v) => v,
        Err(e) => return reply_usage(&bot, &msg, &e, usage).await,
    };

    let title = match state.membership.chat_title(chat_id).await {
        Ok(Some(title)) if !title.is_empty() => title,
        Ok(_) => get_text(unknown_key),
        Err(e) => {
            debug!("Title lookup for {} failed: {}", chat_id, e);
            get_text(unknown_key)
        }
    };

    state
        .stores
        .directory
        .upsert(DirectoryEntry::new(chat_id, category, link, title.clone()))
        .await?;
    info!("Directory upsert {} ({}) \"{}\"", chat_id, category, title);

    reply_html(&bot, &msg, get_text(added_key).replace("{title}", &html_escape(&title))).await
}

async fn remove_entry(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
    category: ChatCategory,
) -> anyhow::Result<()> {
    if !guard(&bot, &msg, &state, Policy::StaffOnly, "common.unauthorized").await? {
        return Ok(());
    }

    let (usage, removed_key) = match category {
        ChatCategory::Group => ("/rmgroup <chat_id>", "directory.group_removed"),
        ChatCategory::Channel => ("/rmchannel <chat_id>", "directory.channel_removed"),
    };

    let chat_id = match CommandArgs::parse(&args).chat_id(0) {
        Ok(id) => id,
        Err(e) => return reply_usage(&bot, &msg, &e, usage).await,
    };

    // Removal is by chat ID only; the category of the command is cosmetic.
    state.stores.directory.remove(chat_id).await?;
    info!("Directory remove {}", chat_id);

    reply_html(&bot, &msg, get_text(removed_key)).await
}

fn format_entry(entry: &DirectoryEntry) -> String {
    let title = if entry.title.is_empty() {
        entry.chat_id.to_string()
    } else {
        entry.title.clone()
    };
    format!(
        "- <a href=\"{}\">{}</a> — <code>{}</code> ({})\n",
        html_escape(&entry.invite_link),
        html_escape(&title),
        entry.chat_id,
        entry.category
    )
}
