//! Reminder rows as stored in the `reminders` table

use serde::{Deserialize, Serialize};

/// A persisted reminder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Surrogate id assigned by the store
    pub id: i64,
    pub guild_id: String,
    /// Unique within the guild
    pub name: String,
    pub description: String,
    pub channel_id: String,
    pub cron_expression: String,
    /// Whether the job should be armed (`started` column)
    pub enabled: bool,
    pub created_at: String,
    /// Emoji attached to every fired notification, in order
    pub reactions: Vec<String>,
    /// Role mentioned when the reminder fires
    pub ping_role: Option<String>,
}

/// Input for creating a reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReminder {
    pub guild_id: String,
    pub name: String,
    pub description: String,
    pub channel_id: String,
    pub cron_expression: String,
    pub reactions: Vec<String>,
    pub ping_role: Option<String>,
    pub start_on_create: bool,
}

/// Split a comma-separated emoji list, trimming and dropping empty entries
pub fn parse_reactions(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect()
}
