//! # Configuration Module
//!
//! Environment-based configuration for the tally bot.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Sweep intervals and message TTLs made configurable
//! - 1.1.0: Add rates/facts endpoints and backup channel
//! - 1.0.0: Initial release with token and database path

use anyhow::{Context as _, Result};
use std::env;
use std::time::Duration;

/// Message lifetimes applied to transient replies, in seconds.
///
/// Every call site picks one of these constants, so entries enter the
/// deletion queue in fire-time order (see `features::ephemeral`).
#[derive(Clone, Copy, Debug)]
pub struct Ttls {
    /// Short-lived notices: confirmations, validation warnings (default 2 min).
    pub notice: i64,
    /// Dialog prompts and menus (default 5 min).
    pub dialog: i64,
    /// Fired reminders stay visible this long (default 10 h).
    pub reminder: i64,
    /// Everything else that should not live forever (default 24 h).
    pub default: i64,
}

impl Default for Ttls {
    fn default() -> Self {
        Ttls {
            notice: 2 * 60,
            dialog: 5 * 60,
            reminder: 10 * 60 * 60,
            default: 24 * 60 * 60,
        }
    }
}

/// Bot configuration loaded from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    pub discord_token: String,
    /// Guild for instant command registration during development.
    pub discord_guild_id: Option<String>,
    pub database_path: String,
    pub log_level: String,

    /// Cadence of the dialog-state expiry sweep.
    pub state_sweep_interval: Duration,
    /// Cadence of the message-deletion drain worker.
    pub deletion_sweep_interval: Duration,
    /// Cadence of the reminder fire sweep.
    pub reminder_sweep_interval: Duration,
    /// How long an unanswered dialog prompt keeps its input mode alive.
    pub dialog_state_ttl: Duration,
    pub ttls: Ttls,

    /// Central bank daily rates endpoint (JSON).
    pub rates_url: String,
    /// Random fact page scraped for /fact.
    pub fact_url: String,

    /// Channel that receives hourly database backups; disabled when unset.
    pub backup_channel_id: Option<u64>,
    pub backup_interval: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `DISCORD_TOKEN` is the only required variable; everything else has a
    /// default that matches the production deployment.
    pub fn from_env() -> Result<Self> {
        let discord_token = env::var("DISCORD_TOKEN")
            .context("DISCORD_TOKEN environment variable is required")?;

        let ttls = Ttls {
            notice: env_i64("NOTICE_TTL_SECONDS", 2 * 60),
            dialog: env_i64("DIALOG_TTL_SECONDS", 5 * 60),
            reminder: env_i64("REMINDER_TTL_SECONDS", 10 * 60 * 60),
            default: env_i64("DEFAULT_TTL_SECONDS", 24 * 60 * 60),
        };

        Ok(Config {
            discord_token,
            discord_guild_id: env::var("DISCORD_GUILD_ID").ok(),
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "tally.db".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            state_sweep_interval: Duration::from_secs(env_u64("STATE_SWEEP_SECONDS", 10)),
            deletion_sweep_interval: Duration::from_secs(env_u64("DELETION_SWEEP_SECONDS", 10)),
            reminder_sweep_interval: Duration::from_secs(env_u64("REMINDER_SWEEP_SECONDS", 60)),
            dialog_state_ttl: Duration::from_secs(env_u64("DIALOG_STATE_TTL_SECONDS", 5 * 60)),
            ttls,
            rates_url: env::var("RATES_URL")
                .unwrap_or_else(|_| "https://www.cbr-xml-daily.ru/daily_json.js".to_string()),
            fact_url: env::var("FACT_URL").unwrap_or_else(|_| "https://randstuff.ru/fact/".to_string()),
            backup_channel_id: env::var("BACKUP_CHANNEL_ID")
                .ok()
                .and_then(|s| s.parse().ok()),
            backup_interval: Duration::from_secs(env_u64("BACKUP_INTERVAL_SECONDS", 60 * 60)),
        })
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_i64(name: &str, default: i64) -> i64 {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
