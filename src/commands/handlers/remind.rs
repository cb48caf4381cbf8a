//! Reminder command handlers
//!
//! Handles: add-reminder, start-stop-reminder, delete-reminder, reminders
//!
//! - **Version**: 2.1.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.1.0: Reminders start on create unless told otherwise; long listings continue in follow-ups
//! - 2.0.0: Cron reminders per guild with DM role gate and autocomplete
//! - 1.0.0: Extracted from command_handler.rs

use anyhow::Result;
use log::{debug, error, info, warn};
use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::model::application::component::ButtonStyle;
use serenity::model::application::interaction::application_command::{
    ApplicationCommandInteraction, CommandDataOption,
};
use serenity::model::application::interaction::autocomplete::AutocompleteInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::id::GuildId;
use serenity::prelude::Context;

use super::{reply, reply_choices, require_dungeon_master, require_guild};
use crate::commands::context::CommandContext;
use crate::commands::slash::{
    get_bool_option, get_channel_option, get_focused_option, get_role_option, get_string_option,
};
use crate::core::embeds::{error_embed, success_embed, with_footer, REMINDER_COLOR};
use crate::core::{paginate_lines, EMBED_LIMIT, MAX_EMBEDS_PER_MESSAGE};
use crate::features::reminders::{
    describe_next, parse_reactions, JobState, NewReminder, ReminderError, ReminderListing,
};

pub const COMMANDS: &[&str] = &[
    "add-reminder",
    "start-stop-reminder",
    "delete-reminder",
    "reminders",
];

/// Button that opens the add-reminder modal
pub const OPEN_ADD_MODAL_ID: &str = "reminders:open-add-modal";

pub async fn handle(
    ctx: &CommandContext,
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    match command.data.name.as_str() {
        "add-reminder" => handle_add(ctx, serenity_ctx, command).await,
        "start-stop-reminder" => handle_start_stop(ctx, serenity_ctx, command).await,
        "delete-reminder" => handle_delete(ctx, serenity_ctx, command).await,
        "reminders" => handle_list(ctx, serenity_ctx, command).await,
        _ => Ok(()),
    }
}

pub async fn autocomplete(
    ctx: &CommandContext,
    serenity_ctx: &Context,
    interaction: &AutocompleteInteraction,
) -> Result<()> {
    let names = match (interaction.guild_id, get_focused_option(&interaction.data.options)) {
        (Some(guild_id), Some(("name", partial))) => ctx
            .reminders
            .autocomplete(&guild_id.to_string(), partial)
            .await
            .unwrap_or_else(|e| {
                warn!("Reminder autocomplete failed: {e}");
                Vec::new()
            }),
        _ => Vec::new(),
    };

    debug!(
        "Autocomplete for /{} returned {} names",
        interaction.data.name,
        names.len()
    );
    reply_choices(serenity_ctx, interaction, &names).await
}

/// Build a reminder from /add-reminder options; None when a required field is missing.
///
/// Reminders start unless `start-on-create:false` is passed.
pub fn reminder_from_options(guild_id: GuildId, options: &[CommandDataOption]) -> Option<NewReminder> {
    let name = get_string_option(options, "name")?;
    let cron = get_string_option(options, "cron")?;
    let description = get_string_option(options, "description")?;
    let channel_id = get_channel_option(options, "channel")?;

    Some(NewReminder {
        guild_id: guild_id.to_string(),
        name: name.trim().to_string(),
        description,
        channel_id: channel_id.to_string(),
        cron_expression: cron.trim().to_string(),
        reactions: get_string_option(options, "reactions")
            .map(|r| parse_reactions(&r))
            .unwrap_or_default(),
        ping_role: get_role_option(options, "ping-role").map(|id| id.to_string()),
        start_on_create: get_bool_option(options, "start-on-create").unwrap_or(true),
    })
}

/// Handle /add-reminder command
async fn handle_add(
    ctx: &CommandContext,
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let Some(guild_id) = require_dungeon_master(ctx, serenity_ctx, command).await? else {
        return Ok(());
    };

    let options = &command.data.options;
    if get_bool_option(options, "use-modal").unwrap_or(false) {
        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message
                            .content("Click the button below to add a new reminder:")
                            .set_components(open_modal_button())
                            .ephemeral(true)
                    })
            })
            .await?;
        return Ok(());
    }

    let Some(new) = reminder_from_options(guild_id, options) else {
        return reply(
            serenity_ctx,
            command,
            error_embed("All required fields (name, description, cron, channel) must be provided."),
            true,
        )
        .await;
    };

    let embed = add_reminder(ctx, new).await;
    reply(serenity_ctx, command, with_footer(embed, ctx.footer()), false).await?;
    info!("add-reminder completed for user {}", command.user.id);
    Ok(())
}

/// Handle /start-stop-reminder command
async fn handle_start_stop(
    ctx: &CommandContext,
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let Some(guild_id) = require_dungeon_master(ctx, serenity_ctx, command).await? else {
        return Ok(());
    };

    let name = get_string_option(&command.data.options, "name")
        .ok_or_else(|| anyhow::anyhow!("Missing name parameter"))?;
    let start = get_bool_option(&command.data.options, "start")
        .ok_or_else(|| anyhow::anyhow!("Missing start parameter"))?;

    let embed = match ctx
        .reminders
        .set_status(&guild_id.to_string(), &name, start)
        .await
    {
        Ok(()) => success_embed(
            if start { "Reminder started" } else { "Reminder stopped" },
            &format!(
                "Reminder \"{name}\" has been {}.",
                if start { "started" } else { "stopped" }
            ),
        ),
        Err(e) => rejection_embed(&e),
    };

    reply(serenity_ctx, command, with_footer(embed, ctx.footer()), false).await?;
    info!("start-stop-reminder completed for user {}", command.user.id);
    Ok(())
}

/// Handle /delete-reminder command
async fn handle_delete(
    ctx: &CommandContext,
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let Some(guild_id) = require_dungeon_master(ctx, serenity_ctx, command).await? else {
        return Ok(());
    };

    let name = get_string_option(&command.data.options, "name")
        .ok_or_else(|| anyhow::anyhow!("Missing name parameter"))?;

    let embed = match ctx.reminders.delete(&guild_id.to_string(), &name).await {
        Ok(()) => success_embed(
            "Reminder deleted",
            &format!("Reminder \"{name}\" successfully deleted."),
        ),
        Err(e) => rejection_embed(&e),
    };

    reply(serenity_ctx, command, with_footer(embed, ctx.footer()), false).await?;
    info!("delete-reminder completed for user {}", command.user.id);
    Ok(())
}

/// Handle /reminders command; pages beyond the first message go out as follow-ups
async fn handle_list(
    ctx: &CommandContext,
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let Some(guild_id) = require_guild(serenity_ctx, command).await? else {
        return Ok(());
    };

    let messages = match ctx.reminders.list(&guild_id.to_string()).await {
        Ok(listing) => listing_messages(&listing, ctx.footer()),
        Err(e) => vec![vec![rejection_embed(&e)]],
    };
    let mut messages = messages.into_iter();

    let first = messages.next().unwrap_or_default();
    command
        .create_interaction_response(&serenity_ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| {
                    for embed in first {
                        message.add_embed(embed);
                    }
                    message
                })
        })
        .await?;

    for embeds in messages {
        command
            .create_followup_message(&serenity_ctx.http, |message| message.add_embeds(embeds))
            .await?;
    }
    Ok(())
}

/// Add a reminder and build the reply embed; shared with the modal form
pub async fn add_reminder(ctx: &CommandContext, new: NewReminder) -> CreateEmbed {
    let name = new.name.clone();
    let started = new.start_on_create;
    match ctx.reminders.add(new).await {
        Ok(reminder) => {
            let next = describe_next(&reminder.cron_expression, ctx.reminders.registry().timezone());
            success_embed(
                "Reminder added",
                &format!(
                    "Reminder \"{name}\" successfully added.\n`{}` in <#{}>, next run: {next}{}",
                    reminder.cron_expression,
                    reminder.channel_id,
                    if started {
                        ""
                    } else {
                        "\nIt is stopped; use /start-stop-reminder to start it."
                    }
                ),
            )
        }
        Err(e) => rejection_embed(&e),
    }
}

/// Error embed for a rejected operation, logging store failures
pub fn rejection_embed(err: &ReminderError) -> CreateEmbed {
    match err {
        ReminderError::StoreUnavailable(_) => error!("Reminder operation failed: {err}"),
        _ => debug!("Reminder operation rejected: {err}"),
    }
    error_embed(&err.user_message())
}

/// Button row for opening the add-reminder modal
pub fn open_modal_button() -> CreateComponents {
    CreateComponents::default()
        .create_action_row(|row| {
            row.create_button(|button| {
                button
                    .custom_id(OPEN_ADD_MODAL_ID)
                    .label("Add Reminder")
                    .style(ButtonStyle::Primary)
            })
        })
        .to_owned()
}

fn state_label(state: Option<JobState>) -> &'static str {
    match state {
        Some(JobState::Running) => "🟢 Running",
        Some(JobState::Stopped) => "🔴 Stopped",
        None => "⚠️ Not scheduled",
    }
}

/// One display line per reminder
pub fn format_listing_line(listing: &ReminderListing) -> String {
    let reminder = &listing.reminder;
    format!(
        "**{}** `{}` in <#{}>\nNext: {} | {}",
        reminder.name,
        reminder.cron_expression,
        reminder.channel_id,
        listing.next_run,
        state_label(listing.state)
    )
}

/// Build the /reminders pages, splitting across embeds when it grows too long
pub fn listing_embeds(listing: &[ReminderListing], footer: Option<&str>) -> Vec<CreateEmbed> {
    if listing.is_empty() {
        return vec![with_footer(
            success_embed(
                "Reminders",
                "No reminders yet. Use /add-reminder to create one.",
            ),
            footer,
        )];
    }

    let lines: Vec<String> = listing.iter().map(format_listing_line).collect();
    let pages = paginate_lines(lines.iter().map(String::as_str), EMBED_LIMIT);
    let total = pages.len();

    pages
        .into_iter()
        .enumerate()
        .map(|(i, page)| {
            let mut embed = CreateEmbed::default();
            if total > 1 {
                embed.title(format!("Reminders ({}/{total})", i + 1));
            } else {
                embed.title(format!("Reminders ({})", listing.len()));
            }
            embed.color(REMINDER_COLOR);
            embed.description(page);
            with_footer(embed, footer)
        })
        .collect()
}

/// Group listing pages into messages Discord will accept
pub fn listing_messages(listing: &[ReminderListing], footer: Option<&str>) -> Vec<Vec<CreateEmbed>> {
    listing_embeds(listing, footer)
        .chunks(MAX_EMBEDS_PER_MESSAGE)
        .map(<[CreateEmbed]>::to_vec)
        .collect()
}
