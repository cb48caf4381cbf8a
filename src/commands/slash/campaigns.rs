//! Campaign slash commands: /create-campaign, /campaigns, /delete-campaign, /update-info, /delete-info

use serenity::builder::{CreateApplicationCommand, CreateApplicationCommandOption};
use serenity::model::application::command::CommandOptionType;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        create_campaign_command(),
        create_campaigns_command(),
        create_delete_campaign_command(),
        create_update_info_command(),
        create_delete_info_command(),
    ]
}

/// Required, autocompleted `campaign_name` option shared with the recap commands
pub(super) fn campaign_name_option(
    option: &mut CreateApplicationCommandOption,
    required: bool,
) -> &mut CreateApplicationCommandOption {
    option
        .name("campaign_name")
        .description("Name of the campaign")
        .kind(CommandOptionType::String)
        .required(required)
        .set_autocomplete(true)
}

fn create_campaign_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("create-campaign")
        .description("Create a new campaign (DM only)")
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("campaign_name")
                .description("Name of the campaign")
                .kind(CommandOptionType::String)
                .required(true)
                .max_length(100)
        })
        .create_option(|option| {
            option
                .name("description")
                .description("What the campaign is about")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("recap_master_link")
                .description("Link to the document holding every recap")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .to_owned()
}

fn create_campaigns_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("campaigns")
        .description("List campaigns, or show one campaign's page")
        .dm_permission(false)
        .create_option(|option| campaign_name_option(option, false))
        .create_option(|option| {
            option
                .name("show_ids")
                .description("Show ids for deleting campaigns and info blocks")
                .kind(CommandOptionType::Boolean)
                .required(false)
        })
        .to_owned()
}

fn create_delete_campaign_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("delete-campaign")
        .description("Delete a campaign with its info blocks and recaps (DM only)")
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("campaign_id")
                .description("Id shown by /campaigns show_ids:true")
                .kind(CommandOptionType::Integer)
                .required(true)
        })
        .to_owned()
}

fn create_update_info_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("update-info")
        .description("Add or update an info block on a campaign page (DM only)")
        .dm_permission(false)
        .create_option(|option| campaign_name_option(option, true))
        .create_option(|option| {
            option
                .name("info_title")
                .description("Title of the info block")
                .kind(CommandOptionType::String)
                .required(true)
                .max_length(256)
                .set_autocomplete(true)
        })
        .create_option(|option| {
            option
                .name("info_desc")
                .description("Text of the info block")
                .kind(CommandOptionType::String)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("info_link")
                .description("Link shown under the text")
                .kind(CommandOptionType::String)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("sort_order")
                .description("Position on the page; -1 puts the block last")
                .kind(CommandOptionType::Integer)
                .required(false)
                .min_int_value(-1)
        })
        .create_option(|option| {
            option
                .name("existing_info_title")
                .description("Title of the block to update, when renaming or editing")
                .kind(CommandOptionType::String)
                .required(false)
                .set_autocomplete(true)
        })
        .to_owned()
}

fn create_delete_info_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("delete-info")
        .description("Delete an info block (DM only)")
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("info_id")
                .description("Id shown by /campaigns show_ids:true")
                .kind(CommandOptionType::Integer)
                .required(true)
        })
        .to_owned()
}
