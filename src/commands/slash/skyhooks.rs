//! Skyhook slash commands: /skyhook, /skyhooks, /delete-skyhook

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        CreateApplicationCommand::default()
            .name("skyhook")
            .description("Record when a skyhook becomes vulnerable")
            .dm_permission(false)
            .create_option(|option| {
                option
                    .name("system")
                    .description("System name, e.g. J115405")
                    .kind(CommandOptionType::String)
                    .required(true)
                    .max_length(20)
            })
            .create_option(|option| {
                option
                    .name("moon_type")
                    .description("Moon the skyhook orbits")
                    .kind(CommandOptionType::String)
                    .required(true)
                    .add_string_choice("Lava", "Lava")
                    .add_string_choice("Ice", "Ice")
            })
            .create_option(|option| {
                option
                    .name("time_until")
                    .description("e.g. 1d23h45m, or paste \"Secure (vulnerable in 2d 4h 33m)\"")
                    .kind(CommandOptionType::String)
                    .required(true)
            })
            .to_owned(),
        CreateApplicationCommand::default()
            .name("skyhooks")
            .description("List upcoming skyhook timers")
            .dm_permission(false)
            .create_option(|option| {
                option
                    .name("limit")
                    .description("How many timers to show (default 10)")
                    .kind(CommandOptionType::Integer)
                    .required(false)
                    .min_int_value(1)
                    .max_int_value(50)
            })
            .to_owned(),
        CreateApplicationCommand::default()
            .name("delete-skyhook")
            .description("Delete a skyhook timer")
            .dm_permission(false)
            .create_option(|option| {
                option
                    .name("skyhook_id")
                    .description("Id shown by /skyhook and /skyhooks")
                    .kind(CommandOptionType::Integer)
                    .required(true)
            })
            .to_owned(),
    ]
}
