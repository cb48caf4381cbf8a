//! Campaign command handlers
//!
//! Handles: create-campaign, campaigns, delete-campaign, update-info, delete-info,
//! plus the view and delete-confirmation buttons those commands post.
//!
//! - **Version**: 1.0.0
//! - **Since**: 3.40.0

use anyhow::Result;
use log::{debug, error, info, warn};
use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::model::application::component::ButtonStyle;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::autocomplete::AutocompleteInteraction;
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;

use super::{reply, reply_choices, require_dungeon_master, require_guild, DM_ONLY_MESSAGE};
use crate::commands::context::CommandContext;
use crate::commands::slash::{
    get_bool_option, get_focused_option, get_integer_option, get_string_option,
};
use crate::core::embeds::{error_embed, success_embed, with_footer, CAMPAIGN_COLOR};
use crate::core::{truncate_for_embed, truncate_for_field, truncate_for_title, MAX_FIELDS_PER_EMBED};
use crate::features::campaigns::{
    validate_link, Campaign, CampaignError, InfoBlock, InfoUpdate, NewCampaign,
};
use crate::features::reminders::AUTOCOMPLETE_LIMIT;

pub const COMMANDS: &[&str] = &[
    "create-campaign",
    "campaigns",
    "delete-campaign",
    "update-info",
    "delete-info",
];

/// Prefix shared by every campaign button id
pub const CAMPAIGN_BUTTON_PREFIX: &str = "campaigns:";

/// Buttons attached to campaign replies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignButton {
    View(i64),
    ConfirmDelete(i64),
    CancelDelete,
}

impl CampaignButton {
    pub fn custom_id(&self) -> String {
        match self {
            CampaignButton::View(id) => format!("{CAMPAIGN_BUTTON_PREFIX}view:{id}"),
            CampaignButton::ConfirmDelete(id) => format!("{CAMPAIGN_BUTTON_PREFIX}confirm-delete:{id}"),
            CampaignButton::CancelDelete => format!("{CAMPAIGN_BUTTON_PREFIX}cancel-delete"),
        }
    }

    pub fn parse(custom_id: &str) -> Option<Self> {
        let rest = custom_id.strip_prefix(CAMPAIGN_BUTTON_PREFIX)?;
        if rest == "cancel-delete" {
            return Some(CampaignButton::CancelDelete);
        }
        let (action, id) = rest.split_once(':')?;
        let id = id.parse().ok()?;
        match action {
            "view" => Some(CampaignButton::View(id)),
            "confirm-delete" => Some(CampaignButton::ConfirmDelete(id)),
            _ => None,
        }
    }
}

pub async fn handle(
    ctx: &CommandContext,
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    match command.data.name.as_str() {
        "create-campaign" => handle_create(ctx, serenity_ctx, command).await,
        "campaigns" => handle_campaigns(ctx, serenity_ctx, command).await,
        "delete-campaign" => handle_delete(ctx, serenity_ctx, command).await,
        "update-info" => handle_update_info(ctx, serenity_ctx, command).await,
        "delete-info" => handle_delete_info(ctx, serenity_ctx, command).await,
        _ => Ok(()),
    }
}

/// Suggest campaign names, or info titles of the chosen campaign
pub async fn autocomplete(
    ctx: &CommandContext,
    serenity_ctx: &Context,
    interaction: &AutocompleteInteraction,
) -> Result<()> {
    let options = &interaction.data.options;
    let names = match (interaction.guild_id, get_focused_option(options)) {
        (Some(guild_id), Some(("campaign_name", partial))) => {
            ctx.database
                .search_campaign_names(&guild_id.to_string(), partial, AUTOCOMPLETE_LIMIT)
                .await
        }
        (Some(guild_id), Some(("info_title" | "existing_info_title", partial))) => {
            let campaign = get_string_option(options, "campaign_name").unwrap_or_default();
            ctx.database
                .search_info_titles(&guild_id.to_string(), &campaign, partial, AUTOCOMPLETE_LIMIT)
                .await
        }
        _ => Ok(Vec::new()),
    }
    .unwrap_or_else(|e| {
        warn!("Campaign autocomplete failed: {e}");
        Vec::new()
    });

    debug!(
        "Autocomplete for /{} returned {} names",
        interaction.data.name,
        names.len()
    );
    reply_choices(serenity_ctx, interaction, &names).await
}

/// Handle /create-campaign command
async fn handle_create(
    ctx: &CommandContext,
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let Some(guild_id) = require_dungeon_master(ctx, serenity_ctx, command).await? else {
        return Ok(());
    };

    let options = &command.data.options;
    let name = get_string_option(options, "campaign_name")
        .ok_or_else(|| anyhow::anyhow!("Missing campaign_name parameter"))?;
    let description = get_string_option(options, "description")
        .ok_or_else(|| anyhow::anyhow!("Missing description parameter"))?;
    let link = get_string_option(options, "recap_master_link")
        .ok_or_else(|| anyhow::anyhow!("Missing recap_master_link parameter"))?;

    let result = match validate_link(&link) {
        Ok(recap_master_link) => {
            let new = NewCampaign {
                guild_id: guild_id.to_string(),
                name: name.trim().to_string(),
                description,
                recap_master_link,
            };
            ctx.database.insert_campaign(&new).await
        }
        Err(e) => Err(e),
    };

    let embed = match result {
        Ok(campaign) => success_embed(
            "Campaign created",
            &format!(
                "Campaign \"{}\" created. Add info blocks with /update-info and recaps with /create-recap.",
                campaign.name
            ),
        ),
        Err(e) => campaign_rejection(&e),
    };
    reply(serenity_ctx, command, with_footer(embed, ctx.footer()), false).await?;
    info!("create-campaign completed for user {}", command.user.id);
    Ok(())
}

/// Handle /campaigns command
async fn handle_campaigns(
    ctx: &CommandContext,
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let Some(guild_id) = require_guild(serenity_ctx, command).await? else {
        return Ok(());
    };
    let guild_id = guild_id.to_string();
    let show_ids = get_bool_option(&command.data.options, "show_ids").unwrap_or(false);

    if let Some(name) = get_string_option(&command.data.options, "campaign_name") {
        let embed = match ctx.database.campaign_by_name(&guild_id, &name).await {
            Ok(campaign) => campaign_page(ctx, &campaign, show_ids).await,
            Err(e) => campaign_rejection(&e),
        };
        return reply(serenity_ctx, command, with_footer(embed, ctx.footer()), false).await;
    }

    let campaigns = match ctx.database.campaigns(&guild_id).await {
        Ok(campaigns) => campaigns,
        Err(e) => {
            return reply(serenity_ctx, command, campaign_rejection(&e), true).await;
        }
    };
    if campaigns.is_empty() {
        let embed = success_embed("Campaigns", "No campaigns yet. A DM can add one with /create-campaign.");
        return reply(serenity_ctx, command, with_footer(embed, ctx.footer()), false).await;
    }

    command
        .create_interaction_response(&serenity_ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| {
                    message.content(format!("Found {} campaigns:", campaigns.len()))
                })
        })
        .await?;

    // One message per campaign so each carries its own button
    for campaign in &campaigns {
        let embed = with_footer(summary_embed(campaign, show_ids), ctx.footer());
        command
            .create_followup_message(&serenity_ctx.http, |message| {
                message
                    .add_embed(embed)
                    .set_components(view_button(campaign))
            })
            .await?;
    }
    Ok(())
}

/// Handle /delete-campaign command; the deletion waits for a confirmation click
async fn handle_delete(
    ctx: &CommandContext,
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let Some(guild_id) = require_dungeon_master(ctx, serenity_ctx, command).await? else {
        return Ok(());
    };
    let id = get_integer_option(&command.data.options, "campaign_id")
        .ok_or_else(|| anyhow::anyhow!("Missing campaign_id parameter"))?;

    let campaign = match ctx.database.campaign_by_id(&guild_id.to_string(), id).await {
        Ok(campaign) => campaign,
        Err(e) => return reply(serenity_ctx, command, campaign_rejection(&e), true).await,
    };

    command
        .create_interaction_response(&serenity_ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| {
                    message
                        .content(format!(
                            "Delete campaign \"{}\" with all of its info blocks and recaps?",
                            campaign.name
                        ))
                        .set_components(confirm_delete_buttons(campaign.id))
                        .ephemeral(true)
                })
        })
        .await?;
    Ok(())
}

/// Handle /update-info command
async fn handle_update_info(
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
    let title = get_string_option(options, "info_title")
        .ok_or_else(|| anyhow::anyhow!("Missing info_title parameter"))?;

    let link = match get_string_option(options, "info_link").filter(|l| !l.trim().is_empty()) {
        Some(link) => match validate_link(&link) {
            Ok(link) => Some(link),
            Err(e) => {
                let embed = with_footer(campaign_rejection(&e), ctx.footer());
                return reply(serenity_ctx, command, embed, false).await;
            }
        },
        None => None,
    };

    let update = InfoUpdate {
        guild_id: guild_id.to_string(),
        campaign_name,
        title: title.trim().to_string(),
        description: get_string_option(options, "info_desc"),
        link,
        sort_order: get_integer_option(options, "sort_order").unwrap_or(0),
        existing_title: get_string_option(options, "existing_info_title"),
    };

    let embed = match ctx.database.upsert_info(&update).await {
        Ok((block, created)) => success_embed(
            if created { "Info added" } else { "Info updated" },
            &format!(
                "Info block \"{}\" {} on campaign \"{}\".",
                block.title,
                if created { "added" } else { "updated" },
                update.campaign_name
            ),
        ),
        Err(e) => campaign_rejection(&e),
    };
    reply(serenity_ctx, command, with_footer(embed, ctx.footer()), false).await?;
    info!("update-info completed for user {}", command.user.id);
    Ok(())
}

/// Handle /delete-info command
async fn handle_delete_info(
    ctx: &CommandContext,
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let Some(guild_id) = require_dungeon_master(ctx, serenity_ctx, command).await? else {
        return Ok(());
    };
    let id = get_integer_option(&command.data.options, "info_id")
        .ok_or_else(|| anyhow::anyhow!("Missing info_id parameter"))?;

    let embed = match ctx.database.delete_info(&guild_id.to_string(), id).await {
        Ok(()) => success_embed("Info deleted", &format!("Info block {id} deleted.")),
        Err(e) => campaign_rejection(&e),
    };
    reply(serenity_ctx, command, with_footer(embed, ctx.footer()), false).await?;
    info!("delete-info completed for user {}", command.user.id);
    Ok(())
}

/// Handle a click on a campaign button
pub async fn handle_component(
    ctx: &CommandContext,
    serenity_ctx: &Context,
    interaction: &MessageComponentInteraction,
) -> Result<()> {
    let (Some(button), Some(guild_id)) = (
        CampaignButton::parse(&interaction.data.custom_id),
        interaction.guild_id,
    ) else {
        debug!("Ignoring campaign button {}", interaction.data.custom_id);
        return Ok(());
    };
    let guild = guild_id.to_string();

    match button {
        CampaignButton::View(id) => {
            let embed = match ctx.database.campaign_by_id(&guild, id).await {
                Ok(campaign) => campaign_page(ctx, &campaign, false).await,
                Err(e) => campaign_rejection(&e),
            };
            let embed = with_footer(embed, ctx.footer());
            interaction
                .create_interaction_response(&serenity_ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|message| message.add_embed(embed).ephemeral(true))
                })
                .await?;
        }
        CampaignButton::ConfirmDelete(id) => {
            let embed = if ctx
                .is_dungeon_master(serenity_ctx, guild_id, interaction.member.as_ref())
                .await?
            {
                match ctx.database.delete_campaign(&guild, id).await {
                    Ok(()) => {
                        info!("Campaign {id} deleted by {}", interaction.user.id);
                        success_embed("Campaign deleted", &format!("Campaign {id} and its pages were deleted."))
                    }
                    Err(e) => campaign_rejection(&e),
                }
            } else {
                error_embed(DM_ONLY_MESSAGE)
            };
            update_without_buttons(serenity_ctx, interaction, with_footer(embed, ctx.footer())).await?;
        }
        CampaignButton::CancelDelete => {
            let embed = success_embed("Deletion cancelled", "Nothing was deleted.");
            update_without_buttons(serenity_ctx, interaction, embed).await?;
        }
    }
    Ok(())
}

async fn update_without_buttons(
    serenity_ctx: &Context,
    interaction: &MessageComponentInteraction,
    embed: CreateEmbed,
) -> Result<()> {
    interaction
        .create_interaction_response(&serenity_ctx.http, |response| {
            response
                .kind(InteractionResponseType::UpdateMessage)
                .interaction_response_data(|message| {
                    message
                        .content("")
                        .add_embed(embed)
                        .set_components(CreateComponents::default())
                })
        })
        .await?;
    Ok(())
}

/// Load the info blocks of `campaign` and render its page
async fn campaign_page(ctx: &CommandContext, campaign: &Campaign, show_ids: bool) -> CreateEmbed {
    match ctx.database.info_blocks(campaign.id).await {
        Ok(blocks) => campaign_embed(campaign, &blocks, show_ids),
        Err(e) => campaign_rejection(&e),
    }
}

/// Error embed for a rejected campaign operation, logging store failures
pub fn campaign_rejection(err: &CampaignError) -> CreateEmbed {
    match err {
        CampaignError::StoreUnavailable(_) => error!("Campaign operation failed: {err}"),
        _ => debug!("Campaign operation rejected: {err}"),
    }
    error_embed(&err.user_message())
}

/// Full campaign page: description, recap archive and info blocks in display order
pub fn campaign_embed(campaign: &Campaign, blocks: &[InfoBlock], show_ids: bool) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.title(truncate_for_title(&campaign.name));
    embed.color(CAMPAIGN_COLOR);

    let mut description = campaign.description.clone();
    if show_ids {
        description.push_str(&format!("\nID: {}", campaign.id));
    }
    embed.description(truncate_for_embed(&description));
    embed.field("Recaps", format!("[All recaps]({})", campaign.recap_master_link), false);

    if blocks.is_empty() {
        embed.field("No Information", "No info blocks yet. A DM can add some with /update-info.", false);
    }
    // One field is taken by the recap link
    for block in blocks.iter().take(MAX_FIELDS_PER_EMBED - 1) {
        embed.field(
            truncate_for_title(&block.title),
            truncate_for_field(&block.field_value(show_ids)),
            false,
        );
    }
    embed
}

/// Short campaign card used in the /campaigns listing
pub fn summary_embed(campaign: &Campaign, show_ids: bool) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.title(truncate_for_title(&campaign.name));
    embed.color(CAMPAIGN_COLOR);
    embed.description(truncate_for_embed(&campaign.description));
    if show_ids {
        embed.field("ID", campaign.id, true);
    }
    embed
}

fn view_button(campaign: &Campaign) -> CreateComponents {
    let label = format!("View {}", campaign.name);
    let label: String = label.chars().take(80).collect();
    CreateComponents::default()
        .create_action_row(|row| {
            row.create_button(|button| {
                button
                    .custom_id(CampaignButton::View(campaign.id).custom_id())
                    .label(label)
                    .style(ButtonStyle::Primary)
            })
        })
        .to_owned()
}

fn confirm_delete_buttons(campaign_id: i64) -> CreateComponents {
    CreateComponents::default()
        .create_action_row(|row| {
            row.create_button(|button| {
                button
                    .custom_id(CampaignButton::ConfirmDelete(campaign_id).custom_id())
                    .label("Delete")
                    .style(ButtonStyle::Danger)
            })
            .create_button(|button| {
                button
                    .custom_id(CampaignButton::CancelDelete.custom_id())
                    .label("Cancel")
                    .style(ButtonStyle::Secondary)
            })
        })
        .to_owned()
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

    fn block(id: i64, title: &str) -> InfoBlock {
        InfoBlock {
            id,
            campaign_id: 3,
            title: title.to_string(),
            description: Some(format!("{title} notes")),
            link: None,
            sort_order: 0,
        }
    }

    fn fields(embed: &CreateEmbed) -> Vec<(String, String)> {
        embed
            .0
            .get("fields")
            .and_then(|v| v.as_array())
            .unwrap()
            .iter()
            .map(|f| {
                (
                    f.get("name").and_then(|v| v.as_str()).unwrap().to_string(),
                    f.get("value").and_then(|v| v.as_str()).unwrap().to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn test_button_ids_round_trip() {
        for button in [
            CampaignButton::View(12),
            CampaignButton::ConfirmDelete(7),
            CampaignButton::CancelDelete,
        ] {
            assert_eq!(CampaignButton::parse(&button.custom_id()), Some(button));
        }
        assert_eq!(CampaignButton::parse("campaigns:view:abc"), None);
        assert_eq!(CampaignButton::parse("campaigns:explode:1"), None);
        assert_eq!(CampaignButton::parse("reminders:open-add-modal"), None);
    }

    #[test]
    fn test_empty_campaign_page() {
        let embed = campaign_embed(&campaign(), &[], false);
        let fields = fields(&embed);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].1, "[All recaps](https://example.com/recaps)");
        assert_eq!(fields[1].0, "No Information");
    }

    #[test]
    fn test_campaign_page_lists_blocks_with_ids() {
        let embed = campaign_embed(&campaign(), &[block(1, "Setting"), block(2, "Party")], true);
        let description = embed.0.get("description").and_then(|v| v.as_str()).unwrap();
        assert!(description.ends_with("ID: 3"));

        let fields = fields(&embed);
        assert_eq!(fields[1], ("Setting".to_string(), "Setting notes\nID: 1".to_string()));
        assert_eq!(fields[2].0, "Party");
    }

    #[test]
    fn test_campaign_page_respects_field_limit() {
        let blocks: Vec<InfoBlock> = (0..40).map(|i| block(i, &format!("Block {i}"))).collect();
        let embed = campaign_embed(&campaign(), &blocks, false);
        assert_eq!(fields(&embed).len(), MAX_FIELDS_PER_EMBED);
    }

    #[test]
    fn test_commands_are_routed_here() {
        assert!(COMMANDS.contains(&"update-info"));
        assert_eq!(COMMANDS.len(), 5);
    }
}
