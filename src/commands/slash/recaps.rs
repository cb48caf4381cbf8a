//! Recap slash commands: /create-recap, /recap, /recaps, /delete-recap

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

use super::campaigns::campaign_name_option;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        CreateApplicationCommand::default()
            .name("create-recap")
            .description("Post a session recap (DM only)")
            .dm_permission(false)
            .create_option(|option| campaign_name_option(option, true))
            .create_option(|option| {
                option
                    .name("recap_title")
                    .description("Title of the recap")
                    .kind(CommandOptionType::String)
                    .required(true)
                    .max_length(256)
            })
            .create_option(|option| {
                option
                    .name("recap_link")
                    .description("Link to the recap")
                    .kind(CommandOptionType::String)
                    .required(true)
            })
            .to_owned(),
        CreateApplicationCommand::default()
            .name("recap")
            .description("Show the latest recap of a campaign")
            .dm_permission(false)
            .create_option(|option| campaign_name_option(option, true))
            .to_owned(),
        CreateApplicationCommand::default()
            .name("recaps")
            .description("List the latest recaps of a campaign")
            .dm_permission(false)
            .create_option(|option| campaign_name_option(option, true))
            .to_owned(),
        CreateApplicationCommand::default()
            .name("delete-recap")
            .description("Delete a recap (DM only)")
            .dm_permission(false)
            .create_option(|option| {
                option
                    .name("recap_id")
                    .description("Id shown by /recap and /recaps")
                    .kind(CommandOptionType::Integer)
                    .required(true)
            })
            .to_owned(),
    ]
}
