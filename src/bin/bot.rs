use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info, warn};
use serenity::async_trait;
use serenity::http::Http;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::model::gateway::Ready;
use serenity::model::guild::Guild;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;

use milesbot::commands::{
    register_global_commands, register_guild_commands, CommandContext, CommandHandler,
};
use milesbot::core::embeds::TEST_ENV_WARNING;
use milesbot::core::Config;
use milesbot::database::Database;
use milesbot::features::reminders::{DiscordNotifier, JobRegistry, ReminderManager};
use milesbot::features::skyhooks::{start_cleanup_job, CLEANUP_SCHEDULE};
use milesbot::message_components::MessageComponentHandler;

const COMMAND_ERROR_MESSAGE: &str =
    "❌ Sorry, I encountered an error processing your command. Please try again.";

struct Handler {
    command_handler: Arc<CommandHandler>,
    component_handler: Arc<MessageComponentHandler>,
    guild_id: Option<GuildId>,
}

impl Handler {
    fn new(
        command_handler: CommandHandler,
        component_handler: MessageComponentHandler,
        guild_id: Option<GuildId>,
    ) -> Self {
        Handler {
            command_handler: Arc::new(command_handler),
            component_handler: Arc::new(component_handler),
            guild_id,
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);

        if let Some(shard) = ready.shard {
            info!("⚡ Shard: {}/{}", shard[0] + 1, shard[1]);
        }

        // Guild commands update instantly; global commands can take up to an hour
        if let Some(guild_id) = self.guild_id {
            info!("🔧 Registering commands for guild {guild_id}");
            if let Err(e) = register_guild_commands(&ctx, guild_id).await {
                error!("❌ Failed to register guild slash commands: {e}");
            }
        } else {
            info!("🌍 Registering commands globally");
            if let Err(e) = register_global_commands(&ctx).await {
                error!("❌ Failed to register global slash commands: {e}");
            }
        }
    }

    async fn guild_create(&self, _ctx: Context, guild: Guild, is_new: bool) {
        if is_new {
            info!("🆕 Joined new guild: {} ({})", guild.name, guild.id);
        } else {
            info!("📥 Guild available: {} ({})", guild.name, guild.id);
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::ApplicationCommand(command) => {
                if let Err(e) = self
                    .command_handler
                    .handle_slash_command(&ctx, &command)
                    .await
                {
                    error!(
                        "Error handling slash command '{}': {}",
                        command.data.name, e
                    );

                    // The handler may already have responded; fall back to a follow-up
                    if command
                        .create_interaction_response(&ctx.http, |response| {
                            response
                                .kind(InteractionResponseType::ChannelMessageWithSource)
                                .interaction_response_data(|message| {
                                    message.content(COMMAND_ERROR_MESSAGE).ephemeral(true)
                                })
                        })
                        .await
                        .is_err()
                    {
                        let _ = command
                            .create_followup_message(&ctx.http, |message| {
                                message.content(COMMAND_ERROR_MESSAGE).ephemeral(true)
                            })
                            .await;
                    }
                }
            }
            Interaction::MessageComponent(component) => {
                if let Err(e) = self
                    .component_handler
                    .handle_component_interaction(&ctx, &component)
                    .await
                {
                    error!(
                        "Error handling component interaction '{}': {}",
                        component.data.custom_id, e
                    );

                    let _ = component
                        .create_interaction_response(&ctx.http, |response| {
                            response
                                .kind(InteractionResponseType::ChannelMessageWithSource)
                                .interaction_response_data(|message| {
                                    message
                                        .content("❌ Sorry, I encountered an error processing your interaction. Please try again.")
                                        .ephemeral(true)
                                })
                        })
                        .await;
                }
            }
            Interaction::ModalSubmit(modal) => {
                if let Err(e) = self
                    .component_handler
                    .handle_modal_submit(&ctx, &modal)
                    .await
                {
                    error!(
                        "Error handling modal submit '{}': {}",
                        modal.data.custom_id, e
                    );

                    let _ = modal
                        .create_interaction_response(&ctx.http, |response| {
                            response
                                .kind(InteractionResponseType::ChannelMessageWithSource)
                                .interaction_response_data(|message| {
                                    message
                                        .content("❌ Sorry, I encountered an error processing your submission. Please try again.")
                                        .ephemeral(true)
                                })
                        })
                        .await;
                }
            }
            Interaction::Autocomplete(autocomplete) => {
                if let Err(e) = self
                    .command_handler
                    .handle_autocomplete(&ctx, &autocomplete)
                    .await
                {
                    warn!(
                        "Error answering autocomplete for '{}': {}",
                        autocomplete.data.name, e
                    );
                }
            }
            _ => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting MilesBot reminders...");
    if config.is_development() {
        warn!("🧪 Running in development mode; embeds carry a maintenance footer");
    }

    let database = Database::new(&config.database_path).await?;

    // Jobs are armed before the gateway connects so reconnects never reload them
    let registry = Arc::new(JobRegistry::new(config.timezone));
    let notifier = Arc::new(DiscordNotifier::new(Arc::new(Http::new(&config.discord_token))));
    let mut manager = ReminderManager::new(Arc::new(database.clone()), Arc::clone(&registry), notifier);
    if config.is_development() {
        manager = manager.with_footer(TEST_ENV_WARNING);
    }
    let manager = Arc::new(manager);

    let summary = manager.load_all().await.map_err(|e| {
        error!("Failed to load reminders: {e}");
        anyhow::anyhow!("Reminder load failed: {}", e)
    })?;
    info!(
        "⏰ Reminder scheduler ready in {} ({} running, {} stopped, {} skipped)",
        config.timezone, summary.running, summary.stopped, summary.skipped
    );

    // Maintenance jobs run in UTC on their own registry
    let maintenance = JobRegistry::new(chrono_tz::UTC);
    start_cleanup_job(&maintenance, database.clone()).map_err(|e| {
        error!("Failed to schedule skyhook cleanup: {e}");
        anyhow::anyhow!("Skyhook cleanup scheduling failed: {}", e)
    })?;
    info!("🧹 Skyhook cleanup scheduled ({CLEANUP_SCHEDULE} UTC)");

    let guild_id = config.guild_id.map(GuildId);
    let discord_token = config.discord_token.clone();
    let config = Arc::new(config);

    let command_handler = CommandHandler::new(CommandContext::new(database, manager, config));
    let component_handler = MessageComponentHandler::new(command_handler.clone());
    let handler = Handler::new(command_handler, component_handler, guild_id);

    // Interactions arrive regardless of intents; GUILDS keeps guild metadata cached
    let intents = GatewayIntents::GUILDS;

    let mut client = Client::builder(&discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {e}");
            return;
        }
        info!("🛑 Shutdown signal received");
        shard_manager.lock().await.shutdown_all().await;
    });

    info!("Establishing WebSocket connection to Discord gateway...");
    let result = client.start().await;

    registry.shutdown();
    maintenance.shutdown();
    info!("Reminder and maintenance jobs stopped");

    if let Err(why) = result {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
