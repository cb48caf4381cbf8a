//! Delivery of fired reminders to Discord
//!
//! - **Version**: 1.1.0
//! - **Since**: 2.0.0
//!
//! ## Changelog
//! - 1.1.0: Vote buttons alongside emoji reactions
//! - 1.0.0: Embed notifications with emoji reactions

use async_trait::async_trait;
use log::{debug, warn};
use serenity::builder::CreateComponents;
use serenity::http::Http;
use serenity::model::application::component::ButtonStyle;
use serenity::model::channel::ReactionType;
use serenity::model::id::ChannelId;
use std::sync::Arc;

use super::error::TransportError;
use super::tally::{vote_custom_id, MAX_VOTE_BUTTONS};
use crate::core::embeds::REMINDER_COLOR;
use crate::core::{truncate_for_embed, truncate_for_title};

/// A rendered reminder ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub channel_id: String,
    pub title: String,
    pub body: String,
    pub reactions: Vec<String>,
    pub ping_role: Option<String>,
    pub footer: Option<String>,
}

/// Messaging collaborator used when a reminder fires
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_notification(&self, notification: &Notification) -> Result<(), TransportError>;
}

/// Sends notifications through the Discord REST API
pub struct DiscordNotifier {
    http: Arc<Http>,
}

impl DiscordNotifier {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send_notification(&self, notification: &Notification) -> Result<(), TransportError> {
        let channel_id = notification
            .channel_id
            .trim()
            .parse::<u64>()
            .map(ChannelId)
            .map_err(|_| TransportError::InvalidChannel(notification.channel_id.clone()))?;

        let message = channel_id
            .send_message(&self.http, |m| {
                if let Some(role) = &notification.ping_role {
                    m.content(format!("<@&{role}>"));
                }
                m.embed(|e| {
                    e.title(truncate_for_title(&notification.title))
                        .description(truncate_for_embed(&notification.body))
                        .color(REMINDER_COLOR);
                    if let Some(footer) = &notification.footer {
                        e.footer(|f| f.text(footer));
                    }
                    e
                });
                if !notification.reactions.is_empty() {
                    m.set_components(vote_buttons(&notification.reactions));
                }
                m
            })
            .await?;

        for emoji in &notification.reactions {
            let Ok(reaction) = ReactionType::try_from(emoji.as_str()) else {
                warn!("Skipping unrecognised reaction '{emoji}' for {}", notification.title);
                continue;
            };
            if let Err(e) = self
                .http
                .create_reaction(channel_id.0, message.id.0, &reaction)
                .await
            {
                warn!("Failed to react with '{emoji}' on reminder {}: {e}", notification.title);
            }
        }

        debug!(
            "Delivered reminder '{}' to channel {}",
            notification.title, channel_id
        );
        Ok(())
    }
}

/// One secondary button per reaction emoji, capped at a single action row
pub fn vote_buttons(reactions: &[String]) -> CreateComponents {
    let mut components = CreateComponents::default();
    components.create_action_row(|row| {
        for (index, emoji) in reactions.iter().take(MAX_VOTE_BUTTONS).enumerate() {
            row.create_button(|button| {
                button
                    .custom_id(vote_custom_id(index, emoji))
                    .style(ButtonStyle::Secondary);
                match ReactionType::try_from(emoji.as_str()) {
                    Ok(reaction) => button.emoji(reaction),
                    Err(_) => button.label(emoji),
                }
            });
        }
        row
    });
    components
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_buttons_cap_at_one_row() {
        let reactions: Vec<String> = ["1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣", "6️⃣"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let components = vote_buttons(&reactions);
        let rows = components.0.len();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_notifier_is_object_safe() {
        fn _assert_object_safe(_: &dyn Notifier) {}
    }
}
