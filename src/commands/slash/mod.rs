//! # Slash Commands (/)
//!
//! Discord native slash commands with autocomplete and validation.
//!
//! - **Version**: 3.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 3.1.0: Campaign, recap and skyhook commands
//! - 3.0.0: Reminder commands only; plugin and context menu commands removed
//! - 2.0.0: Consolidate plugins into single /plugins command with subcommands
//! - 1.0.0: Reorganized from monolithic slash_commands.rs

mod campaigns;
mod recaps;
mod reminders;
mod skyhooks;
mod utility;

use anyhow::Result;
use log::info;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::Command;
use serenity::model::application::interaction::application_command::CommandDataOption;
use serenity::model::id::GuildId;
use serenity::prelude::Context;

/// Creates all slash command definitions
pub fn create_slash_commands() -> Vec<CreateApplicationCommand> {
    let mut commands = Vec::new();

    // Utility commands
    commands.extend(utility::create_commands());

    // Reminder commands
    commands.extend(reminders::create_commands());

    // Campaign pages and recaps
    commands.extend(campaigns::create_commands());
    commands.extend(recaps::create_commands());

    // Skyhook timers
    commands.extend(skyhooks::create_commands());

    commands
}

/// Registers all slash commands globally
pub async fn register_global_commands(ctx: &Context) -> Result<()> {
    let slash_commands = create_slash_commands();
    let count = slash_commands.len();

    Command::set_global_application_commands(&ctx.http, |commands| {
        for command in slash_commands {
            commands.add_application_command(command);
        }
        commands
    })
    .await?;

    info!("Global slash commands registered successfully ({count} commands)");
    Ok(())
}

/// Registers all slash commands for a specific guild (instant update, for testing)
pub async fn register_guild_commands(ctx: &Context, guild_id: GuildId) -> Result<()> {
    let slash_commands = create_slash_commands();
    let count = slash_commands.len();

    guild_id
        .set_application_commands(&ctx.http, |commands| {
            for command in slash_commands {
                commands.add_application_command(command);
            }
            commands
        })
        .await?;

    info!("Guild slash commands registered for guild {guild_id} ({count} commands)");
    Ok(())
}

/// Utility function to get string option from slash command
pub fn get_string_option(options: &[CommandDataOption], name: &str) -> Option<String> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

/// Utility function to get channel option from slash command
pub fn get_channel_option(options: &[CommandDataOption], name: &str) -> Option<u64> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .and_then(|s| s.parse().ok())
}

/// Utility function to get role option from slash command
pub fn get_role_option(options: &[CommandDataOption], name: &str) -> Option<u64> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .and_then(|s| s.parse().ok())
}

/// Utility function to get boolean option from slash command
pub fn get_bool_option(options: &[CommandDataOption], name: &str) -> Option<bool> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_bool())
}

/// Utility function to get integer option from slash command
pub fn get_integer_option(options: &[CommandDataOption], name: &str) -> Option<i64> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_i64())
}

/// Name and current text of the option the user is typing into
pub fn get_focused_option(options: &[CommandDataOption]) -> Option<(&str, &str)> {
    options.iter().find(|opt| opt.focused).map(|opt| {
        let value = opt.value.as_ref().and_then(|v| v.as_str()).unwrap_or("");
        (opt.name.as_str(), value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command_names() -> Vec<String> {
        create_slash_commands()
            .iter()
            .map(|cmd| cmd.0.get("name").unwrap().as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_create_slash_commands() {
        let names = command_names();
        let expected_commands = vec![
            "ping",
            "help",
            "add-reminder",
            "start-stop-reminder",
            "delete-reminder",
            "reminders",
            "create-campaign",
            "campaigns",
            "delete-campaign",
            "update-info",
            "delete-info",
            "create-recap",
            "recap",
            "recaps",
            "delete-recap",
            "skyhook",
            "skyhooks",
            "delete-skyhook",
        ];

        assert_eq!(names.len(), expected_commands.len());
        for expected in expected_commands {
            assert!(
                names.contains(&expected.to_string()),
                "Missing command: {expected}"
            );
        }
    }

    fn option<'a>(command: &'a CreateApplicationCommand, name: &str) -> Option<&'a serde_json::Value> {
        command
            .0
            .get("options")
            .and_then(|v| v.as_array())?
            .iter()
            .find(|o| o.get("name").and_then(|n| n.as_str()) == Some(name))
    }

    #[test]
    fn test_campaign_name_options_autocomplete() {
        for command in create_slash_commands() {
            let name = command.0.get("name").unwrap().as_str().unwrap();
            let Some(campaign_name) = option(&command, "campaign_name") else {
                continue;
            };
            assert_eq!(
                campaign_name.get("autocomplete").and_then(|v| v.as_bool()),
                Some(true),
                "/{name}"
            );
        }
    }

    #[test]
    fn test_skyhooks_limit_is_bounded() {
        let commands = create_slash_commands();
        let skyhooks = commands
            .iter()
            .find(|c| c.0.get("name").and_then(|n| n.as_str()) == Some("skyhooks"))
            .unwrap();
        let limit = option(skyhooks, "limit").unwrap();
        assert_eq!(limit.get("min_value").and_then(|v| v.as_u64()), Some(1));
        assert_eq!(limit.get("max_value").and_then(|v| v.as_u64()), Some(50));
    }

    #[test]
    fn test_name_options_autocomplete() {
        for command in create_slash_commands() {
            let name = command.0.get("name").unwrap().as_str().unwrap();
            if name != "start-stop-reminder" && name != "delete-reminder" {
                continue;
            }
            let options = command.0.get("options").unwrap().as_array().unwrap();
            let name_option = options
                .iter()
                .find(|o| o.get("name").and_then(|n| n.as_str()) == Some("name"))
                .unwrap();
            assert_eq!(name_option.get("autocomplete").and_then(|v| v.as_bool()), Some(true));
            assert_eq!(name_option.get("required").and_then(|v| v.as_bool()), Some(true));
        }
    }
}
