//! Command router.
//!
//! Each command maps to one handler. Handlers run a permission guard first,
//! then parse their arguments, then call into the stores or the fan-out
//! executor and format a single reply.

pub mod admins;
pub mod directory;
pub mod gban;
pub mod ginfo;
pub mod ping;
pub mod staff;
pub mod start;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::debug;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::fanout::FanOutReport;
use crate::i18n::get_text;
use crate::permissions::Policy;
use crate::utils::{html_escape, reply_html, ArgError};

/// All bot commands.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Check the bot is alive")]
    Start,

    #[command(description = "Show help")]
    Help,

    #[command(description = "Measure API latency")]
    Ping,

    // Staff
    #[command(description = "Add a sudo user")]
    Addsudo(String),

    #[command(description = "Remove a sudo user")]
    Rmsudo(String),

    #[command(description = "Add a global admin")]
    Addadmin(String),

    #[command(description = "Remove a global admin")]
    Rmadmin(String),

    #[command(description = "List owner and staff")]
    Allstaff,

    // Directory
    #[command(description = "List managed chats")]
    Directory,

    #[command(description = "Add a group to the directory")]
    Addgroup(String),

    #[command(description = "Remove a group from the directory")]
    Rmgroup(String),

    #[command(description = "Add a channel to the directory")]
    Addchannel(String),

    #[command(description = "Remove a channel from the directory")]
    Rmchannel(String),

    // Global bans
    #[command(description = "Ban a user in every managed chat")]
    Nban(String),

    #[command(description = "Unban a user in every managed chat")]
    Unban(String),

    #[command(description = "List globally banned users")]
    Gbans,

    // Admin cache
    #[command(description = "Refresh cached admins of every managed chat")]
    Refreshadmins,

    #[command(description = "Show cached admins of a chat")]
    Chatadmins(String),

    #[command(description = "Show chat info")]
    Ginfo(String),
}

/// Build the combined command handler.
pub fn command_handler() -> UpdateHandler<anyhow::Error> {
    use dptree::case;

    teloxide::filter_command::<Command, _>()
        .branch(case![Command::Start].endpoint(start::start_command))
        .branch(case![Command::Help].endpoint(start::help_command))
        .branch(case![Command::Ping].endpoint(ping::ping_command))
        // Staff
        .branch(case![Command::Addsudo(args)].endpoint(staff::addsudo_command))
        .branch(case![Command::Rmsudo(args)].endpoint(staff::rmsudo_command))
        .branch(case![Command::Addadmin(args)].endpoint(staff::addadmin_command))
        .branch(case![Command::Rmadmin(args)].endpoint(staff::rmadmin_command))
        .branch(case![Command::Allstaff].endpoint(staff::allstaff_command))
        // Directory
        .branch(case![Command::Directory].endpoint(directory::directory_command))
        .branch(case![Command::Addgroup(args)].endpoint(directory::addgroup_command))
        .branch(case![Command::Rmgroup(args)].endpoint(directory::rmgroup_command))
        .branch(case![Command::Addchannel(args)].endpoint(directory::addchannel_command))
        .branch(case![Command::Rmchannel(args)].endpoint(directory::rmchannel_command))
        // Global bans
        .branch(case![Command::Nban(args)].endpoint(gban::nban_command))
        .branch(case![Command::Unban(args)].endpoint(gban::unban_command))
        .branch(case![Command::Gbans].endpoint(gban::gbans_command))
        // Admin cache
        .branch(case![Command::Refreshadmins].endpoint(admins::refreshadmins_command))
        .branch(case![Command::Chatadmins(args)].endpoint(admins::chatadmins_command))
        .branch(case![Command::Ginfo(args)].endpoint(ginfo::ginfo_command))
}

/// Run the permission guard for `policy`.
///
/// Replies with the `deny_key` text and returns `false` when the caller is
/// not allowed. Messages without a sender are rejected silently.
pub(crate) async fn guard(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
    policy: Policy,
    deny_key: &str,
) -> anyhow::Result<bool> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(false);
    };

    let decision = state
        .gate
        .authorize(policy, user.id.0, AppState::chat_context(msg))
        .await?;
    if decision.is_allowed() {
        return Ok(true);
    }

    debug!("Denied {:?} for user {}", policy, user.id);
    reply_html(bot, msg, get_text(deny_key)).await?;
    Ok(false)
}

/// Reply with an argument error and the command's usage line.
pub(crate) async fn reply_usage(
    bot: &ThrottledBot,
    msg: &Message,
    error: &ArgError,
    usage: &str,
) -> anyhow::Result<()> {
    let text = get_text("common.invalid_args")
        .replace("{error}", &html_escape(&error.to_string()))
        .replace("{usage}", &html_escape(usage));
    reply_html(bot, msg, text).await
}

/// Success/failure tally of a fan-out run, naming the chats that failed.
pub(crate) fn report_text(key: &str, report: &FanOutReport) -> String {
    let mut text = get_text(key)
        .replace("{ok}", &report.success_count().to_string())
        .replace("{fail}", &report.failure_count().to_string());

    let failed: Vec<String> = report
        .failures()
        .map(|(chat_id, _)| format!("<code>{}</code>", chat_id))
        .collect();
    if !failed.is_empty() {
        text.push('\n');
        text.push_str(&get_text("common.failed_in").replace("{chats}", &failed.join(", ")));
    }
    text
}
