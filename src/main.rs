//! Sentinel - directory moderation bot for Telegram.
//!
//! Manages a directory of groups and channels on behalf of an owner and a
//! staff of sudo users and global admins.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `database` - MongoDB stores behind injectable traits
//! - `permissions` - Owner/sudo/chat-admin classification and guards
//! - `fanout` - Directory-wide ban, unban and admin refresh
//! - `bot` - Dispatcher, runtime and background admin refresh
//! - `plugins` - Command handlers
//! - `i18n` - Reply texts
//! - `utils` - Argument parsing and reply helpers

mod bot;
mod config;
mod database;
mod fanout;
mod i18n;
mod permissions;
mod plugins;
#[cfg(test)]
mod testing;
mod utils;

use std::sync::Arc;

use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bot::AppState;
use config::Config;
use database::{Database, ProfileRepository, Stores};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Default to info for our crate when RUST_LOG is not set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sentinel=info,teloxide=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Sentinel bot...");

    let config = Config::from_env()?;
    info!("Configuration loaded, bot mode: {:?}", config.bot_mode);

    i18n::init();

    info!("Connecting to MongoDB...");
    let db = Database::connect(&config.mongodb_uri, &config.mongodb_database).await?;
    let stores = Stores::mongo(&db).await?;
    let profiles = Arc::new(ProfileRepository::new(&db));
    profiles.init(&db).await?;
    info!("Database connected");

    let bot = Bot::new(&config.bot_token).throttle(Limits::default());
    info!("Bot initialized with rate limiting (Throttle)");

    let me = bot.get_me().await?;
    info!("Bot username: @{}", me.username());

    if config.owner_ids.is_empty() {
        info!("No owner IDs configured (OWNER_IDS is empty)");
    } else {
        info!("Bot owners: {:?}", config.owner_ids);
    }

    let state = AppState::new(&bot, &config, stores, profiles);

    if let Some(period) = config.admin_refresh_interval {
        bot::refresher::spawn(state.fanout.clone(), period);
    } else {
        info!("Scheduled admin refresh disabled");
    }

    let dispatcher = bot::build_dispatcher(bot.clone(), state);
    bot::run(&config, dispatcher, bot).await
}
