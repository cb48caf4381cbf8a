//! Routes slash commands and autocomplete requests to their handler module
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 2.0.0: Route by command group; handler trait and registry removed
//! - 1.0.0: Registry-based dispatch

use crate::commands::context::CommandContext;
use crate::commands::handlers::{campaigns, recaps, remind, skyhooks, utility};
use anyhow::Result;
use log::{debug, info, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::autocomplete::AutocompleteInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

/// The handler module a command belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Utility,
    Reminders,
    Campaigns,
    Recaps,
    Skyhooks,
}

impl CommandGroup {
    pub const ALL: [CommandGroup; 5] = [
        CommandGroup::Utility,
        CommandGroup::Reminders,
        CommandGroup::Campaigns,
        CommandGroup::Recaps,
        CommandGroup::Skyhooks,
    ];

    pub fn commands(self) -> &'static [&'static str] {
        match self {
            CommandGroup::Utility => utility::COMMANDS,
            CommandGroup::Reminders => remind::COMMANDS,
            CommandGroup::Campaigns => campaigns::COMMANDS,
            CommandGroup::Recaps => recaps::COMMANDS,
            CommandGroup::Skyhooks => skyhooks::COMMANDS,
        }
    }

    pub fn for_command(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|group| group.commands().contains(&name))
    }
}

/// Routes slash commands and autocomplete requests to their handlers
#[derive(Clone)]
pub struct CommandHandler {
    context: Arc<CommandContext>,
}

impl CommandHandler {
    pub fn new(context: CommandContext) -> Self {
        CommandHandler {
            context: Arc::new(context),
        }
    }

    pub fn context(&self) -> Arc<CommandContext> {
        Arc::clone(&self.context)
    }

    pub async fn handle_slash_command(&self, ctx: &Context, command: &ApplicationCommandInteraction) -> Result<()> {
        let guild_id = command.guild_id.map(|id| id.to_string()).unwrap_or_else(|| "DM".to_string());
        info!(
            "📥 Slash command received | Command: {} | User: {} | Channel: {} | Guild: {}",
            command.data.name, command.user.id, command.channel_id, guild_id
        );

        let context = &self.context;
        match CommandGroup::for_command(&command.data.name) {
            Some(CommandGroup::Utility) => utility::handle(context, ctx, command).await?,
            Some(CommandGroup::Reminders) => remind::handle(context, ctx, command).await?,
            Some(CommandGroup::Campaigns) => campaigns::handle(context, ctx, command).await?,
            Some(CommandGroup::Recaps) => recaps::handle(context, ctx, command).await?,
            Some(CommandGroup::Skyhooks) => skyhooks::handle(context, ctx, command).await?,
            None => {
                warn!("No handler for /{}", command.data.name);
                command
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| {
                                message.content("Unknown command.").ephemeral(true)
                            })
                    })
                    .await?;
                return Ok(());
            }
        }

        debug!("✅ /{} handled", command.data.name);
        Ok(())
    }

    pub async fn handle_autocomplete(&self, ctx: &Context, autocomplete: &AutocompleteInteraction) -> Result<()> {
        let context = &self.context;
        match CommandGroup::for_command(&autocomplete.data.name) {
            Some(CommandGroup::Reminders) => remind::autocomplete(context, ctx, autocomplete).await,
            // Recap commands pick a campaign by name too
            Some(CommandGroup::Campaigns | CommandGroup::Recaps) => {
                campaigns::autocomplete(context, ctx, autocomplete).await
            }
            _ => {
                debug!("Autocomplete for /{} has no suggestions", autocomplete.data.name);
                Ok(())
            }
        }
    }
}
