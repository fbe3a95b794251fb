//! Configuration module for Sentinel.
//!
//! Loads configuration from environment variables.

use std::env;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Default interval between background admin cache refreshes.
const DEFAULT_ADMIN_REFRESH_SECS: u64 = 3600;

/// Errors raised while reading the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Bot running mode
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BotMode {
    #[default]
    Polling,
    Webhook,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub bot_mode: BotMode,
    pub webhook_url: Option<String>,
    pub webhook_port: u16,
    pub webhook_secret: Option<String>,

    /// Owner user IDs. Owners are always staff, whatever the stores say.
    pub owner_ids: Vec<u64>,

    /// Whether global admins count as staff alongside sudo users.
    pub global_admins_are_staff: bool,

    /// Background admin cache refresh period. `None` disables the task.
    pub admin_refresh_interval: Option<Duration>,

    // MongoDB
    pub mongodb_uri: String,
    pub mongodb_database: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_mode = match var("BOT_MODE")
            .unwrap_or_else(|| "polling".to_string())
            .to_lowercase()
            .as_str()
        {
            "webhook" => BotMode::Webhook,
            _ => BotMode::Polling,
        };

        let webhook_url = var("WEBHOOK_URL").filter(|s| !s.is_empty());
        if bot_mode == BotMode::Webhook && webhook_url.is_none() {
            return Err(ConfigError::Missing("WEBHOOK_URL"));
        }

        let webhook_port = match var("WEBHOOK_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "WEBHOOK_PORT",
                value: raw.clone(),
            })?,
            None => 8443,
        };

        // OWNER_ID is the single-owner spelling; both may be combined.
        let owner_ids = [var("OWNER_IDS"), var("OWNER_ID")]
            .into_iter()
            .flatten()
            .flat_map(|raw| {
                raw.split(',')
                    .filter_map(|s| s.trim().parse::<u64>().ok())
                    .collect::<Vec<_>>()
            })
            .fold(Vec::new(), |mut acc, id| {
                if !acc.contains(&id) {
                    acc.push(id);
                }
                acc
            });

        let global_admins_are_staff = match var("GLOBAL_ADMINS_ARE_STAFF") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid {
                name: "GLOBAL_ADMINS_ARE_STAFF",
                value: raw.clone(),
            })?,
            None => false,
        };

        let refresh_secs = match var("ADMIN_REFRESH_INTERVAL_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                name: "ADMIN_REFRESH_INTERVAL_SECS",
                value: raw.clone(),
            })?,
            None => DEFAULT_ADMIN_REFRESH_SECS,
        };
        let admin_refresh_interval = (refresh_secs > 0).then(|| Duration::from_secs(refresh_secs));

        Ok(Self {
            bot_token: var("BOT_TOKEN").ok_or(ConfigError::Missing("BOT_TOKEN"))?,
            bot_mode,
            webhook_url,
            webhook_port,
            webhook_secret: var("WEBHOOK_SECRET").filter(|s| !s.is_empty()),
            owner_ids,
            global_admins_are_staff,
            admin_refresh_interval,
            mongodb_uri: var("MONGODB_URI").ok_or(ConfigError::Missing("MONGODB_URI"))?,
            mongodb_database: var("MONGODB_DATABASE").unwrap_or_else(|| "sentinel".to_string()),
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
