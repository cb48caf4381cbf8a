//! Embed builders shared by command replies and fired reminders
//!
//! - **Version**: 2.1.0
//! - **Since**: 1.4.0
//!
//! ## Changelog
//! - 2.1.0: Campaign accent and Discord timestamp markup
//! - 2.0.0: Success/error reply embeds and the development footer
//! - 1.0.0: Extracted from duplicate implementations across command handlers

use crate::core::truncate_for_embed;
use serenity::builder::CreateEmbed;

/// Accent of fired reminder notifications
pub const REMINDER_COLOR: u32 = 0x5865f2;
pub const SUCCESS_COLOR: u32 = 0x23ce6b;
pub const ERROR_COLOR: u32 = 0xd80032;
/// Accent of campaign pages and recaps
pub const CAMPAIGN_COLOR: u32 = 0x00ae86;

/// Footer attached to every embed when running in development mode
pub const TEST_ENV_WARNING: &str =
    "⚠️ MAINTENANCE MODE: This data is from a test database and is not accurate";

/// Green reply embed
pub fn success_embed(title: &str, text: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.title(title);
    embed.color(SUCCESS_COLOR);
    embed.description(truncate_for_embed(text));
    embed
}

/// Red reply embed
pub fn error_embed(text: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.title("Error");
    embed.color(ERROR_COLOR);
    embed.description(truncate_for_embed(text));
    embed
}

/// Discord timestamp markup; `style` is one of Discord's format letters (`F`, `R`, ...)
pub fn discord_timestamp(unix: i64, style: char) -> String {
    format!("<t:{unix}:{style}>")
}

/// Add the development footer when `footer` is set
pub fn with_footer(mut embed: CreateEmbed, footer: Option<&str>) -> CreateEmbed {
    if let Some(text) = footer {
        embed.footer(|f| f.text(text));
    }
    embed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_embed_fields() {
        let embed = success_embed("Reminder added", "standup");
        assert_eq!(embed.0.get("title").and_then(|v| v.as_str()), Some("Reminder added"));
        assert_eq!(embed.0.get("color").and_then(|v| v.as_u64()), Some(SUCCESS_COLOR as u64));
    }

    #[test]
    fn test_error_embed_truncates_long_text() {
        let embed = error_embed(&"x".repeat(5000));
        let description = embed.0.get("description").and_then(|v| v.as_str()).unwrap();
        assert!(description.len() <= crate::core::EMBED_LIMIT);
        assert_eq!(embed.0.get("color").and_then(|v| v.as_u64()), Some(ERROR_COLOR as u64));
    }

    #[test]
    fn test_discord_timestamp() {
        assert_eq!(discord_timestamp(1739120400, 'R'), "<t:1739120400:R>");
    }

    #[test]
    fn test_footer_only_when_set() {
        assert!(with_footer(success_embed("a", "b"), None).0.get("footer").is_none());
        let embed = with_footer(success_embed("a", "b"), Some(TEST_ENV_WARNING));
        assert!(embed.0.get("footer").is_some());
    }
}
