//! Per-command handler implementations
//!
//! Each module exposes the names it answers to in `COMMANDS`, a `handle`
//! entry point and, where options autocomplete, an `autocomplete` one.
//!
//! - **Version**: 4.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 4.0.0: Plain handler modules routed by `CommandGroup`; campaign, recap and skyhook handlers
//! - 3.0.0: Reminder handlers only; AI, persona and admin handlers removed
//! - 2.0.0: Remove AiChatHandler (hey, explain, simple, steps, recipe) - consolidated into /ask
//! - 1.0.0: Initial extraction from monolithic command_handler.rs

pub mod campaigns;
pub mod recaps;
pub mod remind;
pub mod skyhooks;
pub mod utility;

use anyhow::Result;
use serenity::builder::CreateEmbed;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::autocomplete::AutocompleteInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::id::GuildId;
use serenity::prelude::Context;

use crate::commands::context::CommandContext;
use crate::core::embeds::error_embed;

pub const GUILD_ONLY_MESSAGE: &str = "This command can only be used in a guild.";
pub const DM_ONLY_MESSAGE: &str = "This command can only be used by a DM.";

/// Send a single-embed reply
pub async fn reply(
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
    embed: CreateEmbed,
    ephemeral: bool,
) -> Result<()> {
    command
        .create_interaction_response(&serenity_ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.add_embed(embed).ephemeral(ephemeral))
        })
        .await?;
    Ok(())
}

/// Answer an autocomplete request with `names` as both label and value
pub async fn reply_choices(
    serenity_ctx: &Context,
    interaction: &AutocompleteInteraction,
    names: &[String],
) -> Result<()> {
    interaction
        .create_autocomplete_response(&serenity_ctx.http, |response| {
            for name in names {
                response.add_string_choice(name, name);
            }
            response
        })
        .await?;
    Ok(())
}

/// The invoking guild, or None after telling the user the command is guild-only
pub async fn require_guild(
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<Option<GuildId>> {
    match command.guild_id {
        Some(guild_id) => Ok(Some(guild_id)),
        None => {
            reply(serenity_ctx, command, error_embed(GUILD_ONLY_MESSAGE), true).await?;
            Ok(None)
        }
    }
}

/// The invoking guild when the user holds the DM role; otherwise replies and returns None
pub async fn require_dungeon_master(
    ctx: &CommandContext,
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<Option<GuildId>> {
    let Some(guild_id) = require_guild(serenity_ctx, command).await? else {
        return Ok(None);
    };
    if !ctx
        .is_dungeon_master(serenity_ctx, guild_id, command.member.as_ref())
        .await?
    {
        reply(serenity_ctx, command, error_embed(DM_ONLY_MESSAGE), true).await?;
        return Ok(None);
    }
    Ok(Some(guild_id))
}
