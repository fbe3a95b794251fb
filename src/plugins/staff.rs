//! Staff management: sudo users and global admins.

use teloxide::prelude::*;
use tracing::info;

use super::{guard, reply_usage};
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::{RoleStore, StaffRole};
use crate::i18n::get_text;
use crate::permissions::Policy;
use crate::utils::{reply_html, reply_html_chunked, user_link, CommandArgs};

#[derive(Clone, Copy)]
enum Change {
    Add,
    Remove,
}

/// Handle /addsudo <user_id>.
pub async fn addsudo_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    change_role(bot, msg, state, args, StaffRole::Sudo, Change::Add).await
}

/// Handle /rmsudo <user_id>.
pub async fn rmsudo_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    change_role(bot, msg, state, args, StaffRole::Sudo, Change::Remove).await
}

/// Handle /addadmin <user_id>.
pub async fn addadmin_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    change_role(bot, msg, state, args, StaffRole::GlobalAdmin, Change::Add).await
}

/// Handle /rmadmin <user_id>.
pub async fn rmadmin_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    change_role(bot, msg, state, args, StaffRole::GlobalAdmin, Change::Remove).await
}

async fn change_role(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
    role: StaffRole,
    change: Change,
) -> anyhow::Result<()> {
    if !guard(&bot, &msg, &state, Policy::StaffOnly, "common.unauthorized").await? {
        return Ok(());
    }

    let (usage, key) = match (role, change) {
        (StaffRole::Sudo, Change::Add) => ("/addsudo <user_id>", "staff.sudo_added"),
        (StaffRole::Sudo, Change::Remove) => ("/rmsudo <user_id>", "staff.sudo_removed"),
        (StaffRole::GlobalAdmin, Change::Add) => ("/addadmin <user_id>", "staff.admin_added"),
        (StaffRole::GlobalAdmin, Change::Remove) => ("/rmadmin <user_id>", "staff.admin_removed"),
    };

    let target = match CommandArgs::parse(&args).user_id(0) {
        Ok(id) => id,
        Err(e) => return reply_usage(&bot, &msg, &e, usage).await,
    };

    let store = state.stores.role(role);
    let verb = match change {
        Change::Add => {
            store.add(target).await?;
            "Added"
        }
        Change::Remove => {
            store.remove(target).await?;
            "Removed"
        }
    };
    info!("{} {} {} by {:?}", verb, role, target, msg.from.as_ref().map(|u| u.id));

    reply_html(&bot, &msg, get_text(key).replace("{id}", &target.to_string())).await
}

/// Handle /allstaff - owner, sudo users and global admins with names.
pub async fn allstaff_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    if !guard(&bot, &msg, &state, Policy::StaffOnly, "common.unauthorized").await? {
        return Ok(());
    }

    let sudos = state.stores.sudos.list().await?;
    let admins = state.stores.global_admins.list().await?;

    let mut text = get_text("staff.owner_header");
    text.push('\n');
    for owner in state.gate.owner_ids() {
        text.push_str(&staff_line(&state, *owner, "Owner").await);
    }

    text.push('\n');
    if sudos.is_empty() {
        text.push_str(&get_text("staff.no_sudos"));
        text.push('\n');
    } else {
        text.push_str(&get_text("staff.sudo_header"));
        text.push('\n');
        for id in sudos {
            text.push_str(&staff_line(&state, id, "User").await);
        }
    }

    text.push('\n');
    if admins.is_empty() {
        text.push_str(&get_text("staff.no_admins"));
    } else {
        text.push_str(&get_text("staff.admin_header"));
        text.push('\n');
        for id in admins {
            text.push_str(&staff_line(&state, id, "User").await);
        }
    }

    reply_html_chunked(&bot, &msg, &text).await
}

/// One listing line; falls back to `fallback` when the profile is unknown.
pub(crate) async fn staff_line(state: &AppState, user_id: u64, fallback: &str) -> String {
    let name = match state.profiles.get(user_id).await {
        Ok(Some(profile)) => profile.display_name(),
        _ => fallback.to_string(),
    };
    format!("- {} (<code>{}</code>)\n", user_link(user_id, &name), user_id)
}
