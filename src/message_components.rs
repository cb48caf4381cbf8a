use anyhow::Result;
use log::{debug, info};
use serenity::builder::CreateEmbed;
use serenity::model::application::component::{ActionRowComponent, InputTextStyle};
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::modal::ModalSubmitInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::collections::HashMap;

use crate::commands::handlers::campaigns::{self, CAMPAIGN_BUTTON_PREFIX};
use crate::commands::handlers::remind::{add_reminder, OPEN_ADD_MODAL_ID};
use crate::commands::handlers::{DM_ONLY_MESSAGE, GUILD_ONLY_MESSAGE};
use crate::commands::CommandHandler;
use crate::core::embeds::{error_embed, with_footer};
use crate::features::reminders::{apply_vote, parse_reactions, parse_vote_id, NewReminder, VOTE_BUTTON_PREFIX};

/// Custom id of the add-reminder modal form
pub const ADD_REMINDER_MODAL_ID: &str = "reminders:add-modal";

/// Handler for all message component interactions
pub struct MessageComponentHandler {
    command_handler: CommandHandler,
}

impl MessageComponentHandler {
    pub fn new(command_handler: CommandHandler) -> Self {
        Self { command_handler }
    }

    /// Handle all types of component interactions
    pub async fn handle_component_interaction(&self, ctx: &Context, interaction: &MessageComponentInteraction) -> Result<()> {
        let custom_id = &interaction.data.custom_id;
        let user_id = interaction.user.id.to_string();

        info!("Processing component interaction: {custom_id} from user: {user_id}");

        match custom_id.as_str() {
            OPEN_ADD_MODAL_ID => {
                self.show_add_reminder_modal(ctx, interaction).await?;
            }
            id if id.starts_with(VOTE_BUTTON_PREFIX) => {
                self.handle_vote(ctx, interaction).await?;
            }
            id if id.starts_with(CAMPAIGN_BUTTON_PREFIX) => {
                campaigns::handle_component(&self.command_handler.context(), ctx, interaction).await?;
            }
            _ => {
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| {
                                message
                                    .content("This button interaction is not recognized.")
                                    .ephemeral(true)
                            })
                    })
                    .await?;
            }
        }

        Ok(())
    }

    /// Handle modal submit interactions
    pub async fn handle_modal_submit(&self, ctx: &Context, interaction: &ModalSubmitInteraction) -> Result<()> {
        let custom_id = &interaction.data.custom_id;
        let user_id = interaction.user.id.to_string();

        info!("Processing modal submit: {custom_id} from user: {user_id}");

        match custom_id.as_str() {
            ADD_REMINDER_MODAL_ID => {
                self.handle_add_reminder_modal(ctx, interaction).await?;
            }
            _ => {
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| {
                                message.content("Unknown modal submission.").ephemeral(true)
                            })
                    })
                    .await?;
            }
        }

        Ok(())
    }

    /// Show the add-reminder form
    async fn show_add_reminder_modal(&self, ctx: &Context, interaction: &MessageComponentInteraction) -> Result<()> {
        let allowed = match interaction.guild_id {
            Some(guild_id) => {
                self.command_handler
                    .context()
                    .is_dungeon_master(ctx, guild_id, interaction.member.as_ref())
                    .await?
            }
            None => false,
        };
        if !allowed {
            interaction
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|message| {
                            message.add_embed(error_embed(DM_ONLY_MESSAGE)).ephemeral(true)
                        })
                })
                .await?;
            return Ok(());
        }

        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::Modal)
                    .interaction_response_data(|modal| {
                        modal
                            .custom_id(ADD_REMINDER_MODAL_ID)
                            .title("Add Reminder")
                            .components(|c| {
                                c.create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("name")
                                            .label("Reminder Name")
                                            .style(InputTextStyle::Short)
                                            .required(true)
                                            .max_length(100)
                                    })
                                })
                                .create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("cron")
                                            .label("Cron Expression")
                                            .style(InputTextStyle::Short)
                                            .placeholder("0 17 * * 1")
                                            .required(true)
                                    })
                                })
                                .create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("description")
                                            .label("Description")
                                            .style(InputTextStyle::Paragraph)
                                            .required(true)
                                    })
                                })
                                .create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("channel")
                                            .label("Channel ID")
                                            .style(InputTextStyle::Short)
                                            .required(true)
                                    })
                                })
                                .create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("reactions")
                                            .label("Reactions (comma-separated, optional)")
                                            .style(InputTextStyle::Short)
                                            .required(false)
                                    })
                                })
                            })
                    })
            })
            .await?;

        Ok(())
    }

    /// Handle add-reminder form submission; reminders created here start immediately
    async fn handle_add_reminder_modal(&self, ctx: &Context, interaction: &ModalSubmitInteraction) -> Result<()> {
        let command_ctx = self.command_handler.context();

        let embed = match interaction.guild_id {
            None => error_embed(GUILD_ONLY_MESSAGE),
            Some(guild_id) => {
                if command_ctx
                    .is_dungeon_master(ctx, guild_id, interaction.member.as_ref())
                    .await?
                {
                    let fields = collect_inputs(interaction);
                    let field = |key: &str| fields.get(key).map(|v| v.trim().to_string()).unwrap_or_default();

                    match parse_channel_input(&field("channel")) {
                        Some(channel_id) => {
                            let new = NewReminder {
                                guild_id: guild_id.to_string(),
                                name: field("name"),
                                description: field("description"),
                                channel_id: channel_id.to_string(),
                                cron_expression: field("cron"),
                                reactions: parse_reactions(&field("reactions")),
                                ping_role: None,
                                start_on_create: true,
                            };
                            add_reminder(&command_ctx, new).await
                        }
                        None => error_embed("Channel must be a channel id or a #channel mention."),
                    }
                } else {
                    error_embed(DM_ONLY_MESSAGE)
                }
            }
        };

        let embed = with_footer(embed, command_ctx.footer());
        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| message.add_embed(embed))
            })
            .await?;
        Ok(())
    }

    /// Record a vote button click in the reminder's embed
    async fn handle_vote(&self, ctx: &Context, interaction: &MessageComponentInteraction) -> Result<()> {
        let Some(vote) = parse_vote_id(&interaction.data.custom_id) else {
            debug!("Ignoring malformed vote id {}", interaction.data.custom_id);
            return Ok(());
        };
        let Some(original) = interaction.message.embeds.first() else {
            debug!("Vote on message {} without embeds", interaction.message.id);
            return Ok(());
        };

        let tally = apply_vote(
            original.description.as_deref().unwrap_or_default(),
            &vote.emoji,
            &interaction.user.tag(),
        );
        let mut embed = CreateEmbed::from(original.clone());
        embed.description(tally);

        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::UpdateMessage)
                    .interaction_response_data(|message| message.add_embed(embed))
            })
            .await?;

        debug!(
            "Vote {} (button {}) recorded for {}",
            vote.emoji, vote.index, interaction.user.id
        );
        Ok(())
    }
}

/// Text inputs of a modal submission keyed by custom id
fn collect_inputs(interaction: &ModalSubmitInteraction) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for action_row in &interaction.data.components {
        for component in &action_row.components {
            if let ActionRowComponent::InputText(input) = component {
                fields.insert(input.custom_id.clone(), input.value.clone());
            }
        }
    }
    fields
}

/// Accept a raw channel id or a `<#id>` mention
pub fn parse_channel_input(input: &str) -> Option<u64> {
    let trimmed = input.trim();
    let raw = trimmed
        .strip_prefix("<#")
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(trimmed);
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_channel_input() {
        assert_eq!(parse_channel_input("1330192482813874217"), Some(1330192482813874217));
        assert_eq!(parse_channel_input(" <#1330192482813874217> "), Some(1330192482813874217));
        assert_eq!(parse_channel_input("#general"), None);
        assert_eq!(parse_channel_input(""), None);
    }

    #[test]
    fn test_modal_and_button_ids_are_distinct() {
        assert_ne!(ADD_REMINDER_MODAL_ID, OPEN_ADD_MODAL_ID);
        assert!(!OPEN_ADD_MODAL_ID.starts_with(VOTE_BUTTON_PREFIX));
        assert!(!OPEN_ADD_MODAL_ID.starts_with(CAMPAIGN_BUTTON_PREFIX));
        assert!(!VOTE_BUTTON_PREFIX.starts_with(CAMPAIGN_BUTTON_PREFIX));
    }
}
