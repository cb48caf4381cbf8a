//! # Configuration
//!
//! Process configuration read from the environment (and `.env` via dotenvy).
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Reminder timezone, DM role name and environment mode
//! - 1.0.0: Token, database path and log level

use anyhow::{anyhow, Result};
use chrono_tz::Tz;

pub const DEFAULT_DATABASE_FILE: &str = "./database/milesbot.db";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_DM_ROLE_NAME: &str = "DM";

/// Deployment mode, from `BOT_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BotEnvironment {
    #[default]
    Production,
    Development,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub database_path: String,
    pub log_level: String,
    /// Register commands for this guild only instead of globally
    pub guild_id: Option<u64>,
    /// Role whose holders may create, toggle and delete reminders
    pub dm_role_name: String,
    /// Zone in which cron expressions are evaluated
    pub timezone: Tz,
    pub environment: BotEnvironment,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let discord_token =
            get("DISCORD_TOKEN").ok_or_else(|| anyhow!("DISCORD_TOKEN must be set"))?;

        let guild_id = get("DISCORD_GUILD_ID")
            .map(|raw| {
                raw.parse::<u64>()
                    .map_err(|_| anyhow!("DISCORD_GUILD_ID must be a numeric id, got {raw:?}"))
            })
            .transpose()?;

        let timezone = match get("REMINDER_TIMEZONE") {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|_| anyhow!("REMINDER_TIMEZONE is not a known IANA zone: {name:?}"))?,
            None => Tz::UTC,
        };

        let environment = match get("BOT_ENV").as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("production") | Some("prod") => BotEnvironment::Production,
            Some("development") | Some("dev") => BotEnvironment::Development,
            Some(other) => return Err(anyhow!("Unknown BOT_ENV {other:?}")),
        };

        Ok(Self {
            discord_token,
            database_path: get("DATABASE_FILE").unwrap_or_else(|| DEFAULT_DATABASE_FILE.to_string()),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            guild_id,
            dm_role_name: get("DM_ROLE_NAME").unwrap_or_else(|| DEFAULT_DM_ROLE_NAME.to_string()),
            timezone,
            environment,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == BotEnvironment::Development
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("DISCORD_TOKEN", "abc")])).unwrap();
        assert_eq!(config.discord_token, "abc");
        assert_eq!(config.database_path, DEFAULT_DATABASE_FILE);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.guild_id, None);
        assert_eq!(config.dm_role_name, "DM");
        assert_eq!(config.timezone, Tz::UTC);
        assert!(!config.is_development());
    }

    #[test]
    fn test_missing_token_names_the_key() {
        let err = Config::from_lookup(lookup(&[("DISCORD_TOKEN", "  ")])).unwrap_err();
        assert!(err.to_string().contains("DISCORD_TOKEN"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "abc"),
            ("DATABASE_FILE", "/tmp/bot.db"),
            ("LOG_LEVEL", "debug"),
            ("DISCORD_GUILD_ID", "1214647154044313600"),
            ("DM_ROLE_NAME", "Game Master"),
            ("REMINDER_TIMEZONE", "America/New_York"),
            ("BOT_ENV", "Development"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, "/tmp/bot.db");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.guild_id, Some(1214647154044313600));
        assert_eq!(config.dm_role_name, "Game Master");
        assert_eq!(config.timezone, chrono_tz::America::New_York);
        assert!(config.is_development());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for (key, value) in [
            ("DISCORD_GUILD_ID", "not-a-number"),
            ("REMINDER_TIMEZONE", "Mars/Olympus"),
            ("BOT_ENV", "staging"),
        ] {
            let result = Config::from_lookup(lookup(&[("DISCORD_TOKEN", "abc"), (key, value)]));
            assert!(result.is_err(), "{key}={value} should be rejected");
        }
    }
}
