//! Shared context for command handlers
//!
//! - **Version**: 2.1.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.1.0: Database serves campaign, recap and skyhook commands
//! - 2.0.0: Reminder manager, config and DM role check
//! - 1.0.0: Initial implementation with core shared state

use anyhow::Result;
use serenity::model::guild::Member;
use serenity::model::id::GuildId;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::core::embeds::TEST_ENV_WARNING;
use crate::core::Config;
use crate::database::Database;
use crate::features::reminders::ReminderManager;

/// Shared context for all command handlers
///
/// Contains the services most handlers need:
/// - ReminderManager for every reminder mutation, so rows and jobs stay in step
/// - Database for campaigns, info blocks, recaps and skyhook timers, which have no jobs
/// - Config for the DM role name and environment mode
#[derive(Clone)]
pub struct CommandContext {
    pub database: Database,
    pub reminders: Arc<ReminderManager>,
    pub config: Arc<Config>,
    pub start_time: std::time::Instant,
}

impl CommandContext {
    pub fn new(database: Database, reminders: Arc<ReminderManager>, config: Arc<Config>) -> Self {
        Self {
            database,
            reminders,
            config,
            start_time: std::time::Instant::now(),
        }
    }

    /// Footer text for reply embeds, set only in development
    pub fn footer(&self) -> Option<&'static str> {
        self.config.is_development().then_some(TEST_ENV_WARNING)
    }

    /// Whether `member` holds the configured DM role in `guild_id`
    pub async fn is_dungeon_master(
        &self,
        serenity_ctx: &Context,
        guild_id: GuildId,
        member: Option<&Member>,
    ) -> Result<bool> {
        let Some(member) = member else {
            return Ok(false);
        };
        if member.roles.is_empty() {
            return Ok(false);
        }

        let guild_roles = guild_id.roles(&serenity_ctx.http).await?;
        let held = member
            .roles
            .iter()
            .filter_map(|id| guild_roles.get(id))
            .map(|role| role.name.as_str());
        Ok(holds_role(held, &self.config.dm_role_name))
    }
}

/// Exact, case-sensitive role name match
pub fn holds_role<'a>(mut role_names: impl Iterator<Item = &'a str>, wanted: &str) -> bool {
    role_names.any(|name| name == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_context_clone() {
        // CommandContext should be Clone for sharing across handlers
        fn assert_clone<T: Clone>() {}
        assert_clone::<CommandContext>();
    }

    #[test]
    fn test_holds_role_is_exact() {
        assert!(holds_role(["Player", "DM"].into_iter(), "DM"));
        assert!(!holds_role(["dm", "DMs"].into_iter(), "DM"));
        assert!(!holds_role(std::iter::empty(), "DM"));
    }
}
