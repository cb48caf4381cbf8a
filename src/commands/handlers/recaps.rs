//! Recap command handlers
//!
//! Handles: create-recap, recap, recaps, delete-recap
//!
//! - **Version**: 1.0.0
//! - **Since**: 3.40.0

use anyhow::Result;
use log::info;
use serenity::builder::CreateEmbed;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;

use super::campaigns::campaign_rejection;
use super::{reply, require_dungeon_master, require_guild};
use crate::commands::context::CommandContext;
use crate::commands::slash::{get_integer_option, get_string_option};
use crate::core::embeds::{discord_timestamp, success_embed, with_footer, CAMPAIGN_COLOR};
use crate::core::{truncate_for_embed, truncate_for_title};
use crate::features::campaigns::{validate_link, Campaign, NewRecap, Recap, RECAP_HISTORY_LIMIT};

pub const COMMANDS: &[&str] = &["create-recap", "recap", "recaps", "delete-recap"];

pub async fn handle(
    ctx: &CommandContext,
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    match command.data.name.as_str() {
        "create-recap" => handle_create(ctx, serenity_ctx, command).await,
        "recap" | "recaps" => handle_show(ctx, serenity_ctx, command).await,
        "delete-recap" => handle_delete(ctx, serenity_ctx, command).await,
        _ => Ok(()),
    }
}

/// Handle /create-recap command
async fn handle_create(
    ctx: &CommandContext,
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let Some(guild_id) = require_dungeon_master(ctx, serenity_ctx, command).await? else {
        return Ok(());
    };

    let options = &command.data.options;
    let campaign_name = get_string_option(options, "campaign_name")
        .ok_or_else(|| anyhow::anyhow!("Missing campaign_name parameter"))?;
    let title = get_string_option(options, "recap_title")
        .ok_or_else(|| anyhow::anyhow!("Missing recap_title parameter"))?;
    let link = get_string_option(options, "recap_link")
        .ok_or_else(|| anyhow::anyhow!("Missing recap_link parameter"))?;

    let result = match validate_link(&link) {
        Ok(link) => {
            let new = NewRecap {
                guild_id: guild_id.to_string(),
                campaign_name,
                title: title.trim().to_string(),
                link,
            };
            ctx.database.insert_recap(&new).await
        }
        Err(e) => Err(e),
    };

    let embed = match result {
        Ok((campaign, recap)) => success_embed(
            "Recap posted",
            &format!(
                "Recap \"{}\" added to campaign \"{}\" (ID {}).",
                recap.title, campaign.name, recap.id
            ),
        ),
        Err(e) => campaign_rejection(&e),
    };
    reply(serenity_ctx, command, with_footer(embed, ctx.footer()), false).await?;
    info!("create-recap completed for user {}", command.user.id);
    Ok(())
}

/// Handle /recap (latest only) and /recaps (history)
async fn handle_show(
    ctx: &CommandContext,
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let Some(guild_id) = require_guild(serenity_ctx, command).await? else {
        return Ok(());
    };
    let campaign_name = get_string_option(&command.data.options, "campaign_name")
        .ok_or_else(|| anyhow::anyhow!("Missing campaign_name parameter"))?;
    let latest_only = command.data.name == "recap";

    let campaign = match ctx
        .database
        .campaign_by_name(&guild_id.to_string(), &campaign_name)
        .await
    {
        Ok(campaign) => campaign,
        Err(e) => return reply(serenity_ctx, command, campaign_rejection(&e), false).await,
    };

    let limit = if latest_only { 1 } else { RECAP_HISTORY_LIMIT };
    let embed = match ctx.database.latest_recaps(campaign.id, limit).await {
        Ok(recaps) if latest_only => match recaps.first() {
            Some(recap) => recap_embed(&campaign, recap),
            None => no_recaps_embed(&campaign),
        },
        Ok(recaps) => history_embed(&campaign, &recaps),
        Err(e) => campaign_rejection(&e),
    };
    reply(serenity_ctx, command, with_footer(embed, ctx.footer()), false).await
}

/// Handle /delete-recap command
async fn handle_delete(
    ctx: &CommandContext,
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let Some(guild_id) = require_dungeon_master(ctx, serenity_ctx, command).await? else {
        return Ok(());
    };
    let id = get_integer_option(&command.data.options, "recap_id")
        .ok_or_else(|| anyhow::anyhow!("Missing recap_id parameter"))?;

    let embed = match ctx.database.delete_recap(&guild_id.to_string(), id).await {
        Ok(()) => success_embed("Recap deleted", &format!("Recap {id} deleted.")),
        Err(e) => campaign_rejection(&e),
    };
    reply(serenity_ctx, command, with_footer(embed, ctx.footer()), false).await?;
    info!("delete-recap completed for user {}", command.user.id);
    Ok(())
}

fn posted(recap: &Recap) -> String {
    recap
        .created_unix()
        .map(|unix| discord_timestamp(unix, 'R'))
        .unwrap_or_else(|| recap.created_at.clone())
}

fn no_recaps_embed(campaign: &Campaign) -> CreateEmbed {
    success_embed(
        &truncate_for_title(&format!("Recaps for {}", campaign.name)),
        "No recaps yet. A DM can post one with /create-recap.",
    )
}

/// The latest recap, linked in the title
pub fn recap_embed(campaign: &Campaign, recap: &Recap) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.title(truncate_for_title(&recap.title));
    embed.url(&recap.link);
    embed.color(CAMPAIGN_COLOR);
    embed.author(|a| a.name(truncate_for_title(&format!("Campaign: {}", campaign.name))));
    embed.description(format!("Posted {}", posted(recap)));
    embed.field(
        "Metadata",
        format!(
            "[See all recaps]({})\nID: {}",
            campaign.recap_master_link, recap.id
        ),
        false,
    );
    embed
}

/// Newest recaps first, one line each
pub fn history_embed(campaign: &Campaign, recaps: &[Recap]) -> CreateEmbed {
    if recaps.is_empty() {
        return no_recaps_embed(campaign);
    }

    let lines: Vec<String> = recaps
        .iter()
        .map(|recap| {
            format!(
                "**{}**: [Link]({}) • {} • ID {}",
                recap.title,
                recap.link,
                posted(recap),
                recap.id
            )
        })
        .collect();

    let mut embed = CreateEmbed::default();
    embed.title(truncate_for_title(&format!("Recaps for {}", campaign.name)));
    embed.color(CAMPAIGN_COLOR);
    embed.description(truncate_for_embed(&format!(
        "{}\n\n[See all recaps]({})",
        lines.join("\n"),
        campaign.recap_master_link
    )));
    embed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign() -> Campaign {
        Campaign {
            id: 3,
            guild_id: "G1".to_string(),
            name: "Saltmarsh".to_string(),
            description: "Smugglers and sahuagin".to_string(),
            recap_master_link: "https://example.com/recaps".to_string(),
        }
    }

    fn recap(id: i64, title: &str) -> Recap {
        Recap {
            id,
            guild_id: "G1".to_string(),
            campaign_id: 3,
            title: title.to_string(),
            link: format!("https://example.com/{id}"),
            created_at: "2025-02-09 17:00:00".to_string(),
        }
    }

    fn text(embed: &CreateEmbed, key: &str) -> String {
        embed.0.get(key).and_then(|v| v.as_str()).unwrap().to_string()
    }

    #[test]
    fn test_latest_recap_links_archive_and_id() {
        let embed = recap_embed(&campaign(), &recap(9, "Session 12"));
        assert_eq!(text(&embed, "title"), "Session 12");
        assert_eq!(text(&embed, "url"), "https://example.com/9");
        assert_eq!(text(&embed, "description"), "Posted <t:1739120400:R>");

        let field = &embed.0.get("fields").and_then(|v| v.as_array()).unwrap()[0];
        let value = field.get("value").and_then(|v| v.as_str()).unwrap();
        assert!(value.contains("[See all recaps](https://example.com/recaps)"));
        assert!(value.ends_with("ID: 9"));
    }

    #[test]
    fn test_history_lines() {
        let embed = history_embed(&campaign(), &[recap(2, "Session 2"), recap(1, "Session 1")]);
        let description = text(&embed, "description");
        let mut lines = description.lines();
        assert_eq!(
            lines.next(),
            Some("**Session 2**: [Link](https://example.com/2) • <t:1739120400:R> • ID 2")
        );
        assert!(description.ends_with("[See all recaps](https://example.com/recaps)"));

        let empty = history_embed(&campaign(), &[]);
        assert!(text(&empty, "description").contains("/create-recap"));
    }
}
