//! Utility slash commands: /ping, /help

use serenity::builder::CreateApplicationCommand;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        CreateApplicationCommand::default()
            .name("ping")
            .description("Check that the bot is responsive")
            .to_owned(),
        CreateApplicationCommand::default()
            .name("help")
            .description("Displays information about available commands")
            .to_owned(),
    ]
}
