//! # Core Module
//!
//! Configuration and Discord presentation helpers shared across the bot.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.7.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Embeds for reminder replies; message chunking removed
//! - 1.1.0: Add response module with Discord message chunking utilities
//! - 1.0.0: Initial creation with config module

pub mod config;
pub mod embeds;
pub mod response;

// Re-export commonly used items
pub use config::{BotEnvironment, Config};
pub use response::{
    paginate_lines, truncate_for_embed, truncate_for_field, truncate_for_title, truncate_to,
    EMBED_LIMIT, FIELD_LIMIT, MAX_EMBEDS_PER_MESSAGE, MAX_FIELDS_PER_EMBED, TITLE_LIMIT,
};
