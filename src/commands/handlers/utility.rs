//! Utility command handlers
//!
//! Handles: ping, help
//!
//! - **Version**: 2.1.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.1.0: Help covers campaigns, recaps and skyhooks
//! - 2.0.0: Reminder-focused help embed; status/version/uptime removed
//! - 1.0.0: Extracted from command_handler.rs

use anyhow::Result;
use log::info;
use serenity::builder::CreateEmbed;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;

use crate::commands::context::CommandContext;
use crate::core::embeds::{with_footer, REMINDER_COLOR};

pub const COMMANDS: &[&str] = &["ping", "help"];

/// (command, usage, description) rows of the help embed
const HELP_ENTRIES: &[(&str, &str, &str)] = &[
    (
        "/add-reminder",
        "/add-reminder name:<name> cron:<expression> description:<text> channel:<#channel> [reactions:<emoji,emoji>] [start-on-create:<bool>] [ping-role:<@role>]",
        "Creates a recurring reminder (DM only). It starts right away unless `start-on-create:false` is passed. Pass `use-modal:true` to fill in a form instead.",
    ),
    (
        "/start-stop-reminder",
        "/start-stop-reminder name:<name> start:<bool>",
        "Starts or stops a reminder without deleting it (DM only).",
    ),
    (
        "/delete-reminder",
        "/delete-reminder name:<name>",
        "Deletes a reminder permanently (DM only).",
    ),
    (
        "/reminders",
        "/reminders",
        "Lists this server's reminders, their next run and whether they are running.",
    ),
    (
        "/create-campaign",
        "/create-campaign campaign_name:<name> description:<text> recap_master_link:<url>",
        "Creates a campaign page (DM only).",
    ),
    (
        "/campaigns",
        "/campaigns [campaign_name:<name>] [show_ids:<bool>]",
        "Lists campaigns, or shows one campaign's page with its info blocks.",
    ),
    (
        "/delete-campaign",
        "/delete-campaign campaign_id:<id>",
        "Deletes a campaign with its info blocks and recaps after confirmation (DM only).",
    ),
    (
        "/update-info",
        "/update-info campaign_name:<name> info_title:<title> [info_desc:<text>] [info_link:<url>] [sort_order:<n>] [existing_info_title:<title>]",
        "Adds an info block to a campaign page, or edits the one named by `existing_info_title`. Sort order -1 puts a block last (DM only).",
    ),
    (
        "/delete-info",
        "/delete-info info_id:<id>",
        "Deletes an info block (DM only).",
    ),
    (
        "/create-recap",
        "/create-recap campaign_name:<name> recap_title:<title> recap_link:<url>",
        "Posts a session recap; the newest ten are kept (DM only).",
    ),
    ("/recap", "/recap campaign_name:<name>", "Shows the latest recap of a campaign."),
    ("/recaps", "/recaps campaign_name:<name>", "Lists the latest recaps of a campaign."),
    (
        "/delete-recap",
        "/delete-recap recap_id:<id>",
        "Deletes a recap (DM only).",
    ),
    (
        "/skyhook",
        "/skyhook system:<name> moon_type:<Lava|Ice> time_until:<1d23h45m>",
        "Records when a skyhook becomes vulnerable, up to four days ahead.",
    ),
    (
        "/skyhooks",
        "/skyhooks [limit:<1-50>]",
        "Lists upcoming skyhook timers, soonest first.",
    ),
    (
        "/delete-skyhook",
        "/delete-skyhook skyhook_id:<id>",
        "Deletes a skyhook timer.",
    ),
    ("/ping", "/ping", "Checks that the bot is responsive."),
    ("/help", "/help", "Displays this help message."),
];

pub async fn handle(
    ctx: &CommandContext,
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    match command.data.name.as_str() {
        "ping" => handle_ping(ctx, serenity_ctx, command).await,
        "help" => handle_help(ctx, serenity_ctx, command).await,
        _ => Ok(()),
    }
}

/// Handle /ping command
async fn handle_ping(
    ctx: &CommandContext,
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let uptime = ctx.start_time.elapsed().as_secs();
    let running = ctx.reminders.registry().len();

    command
        .create_interaction_response(&serenity_ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| {
                    message.content(format!(
                        "Pong! Up for {}h {}m, tracking {running} reminder jobs.",
                        uptime / 3600,
                        (uptime % 3600) / 60
                    ))
                })
        })
        .await?;

    info!("Ping command completed for user {}", command.user.id);
    Ok(())
}

/// Handle /help command
async fn handle_help(
    ctx: &CommandContext,
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let embed = with_footer(help_embed(&ctx.config.dm_role_name), ctx.footer());

    command
        .create_interaction_response(&serenity_ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.add_embed(embed))
        })
        .await?;

    Ok(())
}

/// Help embed listing every command with its usage
pub fn help_embed(dm_role_name: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.title("Bot Commands");
    embed.description(format!(
        "Here are some commands you can use. Commands marked DM only need the **{dm_role_name}** role.\n\
         Cron expressions use five fields: `minute hour day-of-month month day-of-week`."
    ));
    embed.color(REMINDER_COLOR);
    for (name, usage, description) in HELP_ENTRIES {
        embed.field(*name, format!("{description}\n**Usage:**\n```{usage}```"), false);
    }
    embed
}
