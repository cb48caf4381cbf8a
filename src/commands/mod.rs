//! # Command System
//!
//! Slash command (/) handling for Discord interactions.
//!
//! - **Version**: 4.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 4.0.0: Handler modules routed by command group; trait and registry removed
//! - 3.0.0: Reminder commands with autocomplete dispatch through the registry
//! - 2.1.0: Add modular handler infrastructure (handler trait, context, registry)
//! - 2.0.0: Remove bang commands, slash-only command system
//! - 1.0.0: Initial reorganization with modular command structure

pub mod context;
pub mod handlers;
pub mod slash;

// Re-export the CommandHandler from the handler module
pub use crate::command_handler::{CommandGroup, CommandHandler};

pub use context::CommandContext;

// Re-export commonly used items from submodules
pub use slash::{
    create_slash_commands, get_bool_option, get_channel_option, get_focused_option,
    get_integer_option, get_role_option, get_string_option, register_global_commands,
    register_guild_commands,
};
