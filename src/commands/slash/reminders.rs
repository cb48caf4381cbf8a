//! Reminder slash commands: /add-reminder, /start-stop-reminder, /delete-reminder, /reminders

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;
use serenity::model::channel::ChannelType;

/// Creates reminder commands
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        create_add_reminder_command(),
        create_start_stop_reminder_command(),
        create_delete_reminder_command(),
        create_reminders_command(),
    ]
}

/// Creates the add-reminder command (DM only)
///
/// Every field is optional so `use-modal` can be sent on its own; the handler
/// requires name, cron, description and channel otherwise.
fn create_add_reminder_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("add-reminder")
        .description("Add a new reminder")
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("use-modal")
                .description("Use modal to add reminder")
                .kind(CommandOptionType::Boolean)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("name")
                .description("Name of the reminder")
                .kind(CommandOptionType::String)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("cron")
                .description("Cron expression, e.g. 0 17 * * 1 for Mondays at 17:00")
                .kind(CommandOptionType::String)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("description")
                .description("Description for the reminder")
                .kind(CommandOptionType::String)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("channel")
                .description("Channel to send the reminder to")
                .kind(CommandOptionType::Channel)
                .channel_types(&[ChannelType::Text, ChannelType::News])
                .required(false)
        })
        .create_option(|option| {
            option
                .name("reactions")
                .description("Comma-separated list of emoji reactions")
                .kind(CommandOptionType::String)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("start-on-create")
                .description("Start reminder on create")
                .kind(CommandOptionType::Boolean)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("ping-role")
                .description("Role to mention when the reminder fires")
                .kind(CommandOptionType::Role)
                .required(false)
        })
        .to_owned()
}

fn create_start_stop_reminder_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("start-stop-reminder")
        .description("Start or stop a reminder")
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("name")
                .description("Name of the reminder")
                .kind(CommandOptionType::String)
                .required(true)
                .set_autocomplete(true)
        })
        .create_option(|option| {
            option
                .name("start")
                .description("Set to true to start, false to stop the reminder")
                .kind(CommandOptionType::Boolean)
                .required(true)
        })
        .to_owned()
}

fn create_delete_reminder_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("delete-reminder")
        .description("Delete an existing reminder")
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("name")
                .description("Name of the reminder to delete")
                .kind(CommandOptionType::String)
                .required(true)
                .set_autocomplete(true)
        })
        .to_owned()
}

fn create_reminders_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("reminders")
        .description("List this server's reminders and when they fire next")
        .dm_permission(false)
        .to_owned()
}
