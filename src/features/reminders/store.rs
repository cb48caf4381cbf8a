//! Persistence seam for the reminder lifecycle manager

use async_trait::async_trait;

use super::error::Result;
use super::model::{NewReminder, Reminder};

/// Row-level access to stored reminders.
///
/// Implementations report a `(guild_id, name)` uniqueness violation on insert
/// as [`ReminderError::Duplicate`](super::ReminderError::Duplicate) and any
/// other backend failure as
/// [`ReminderError::StoreUnavailable`](super::ReminderError::StoreUnavailable).
#[async_trait]
pub trait ReminderStore: Send + Sync {
    /// Every reminder across all guilds
    async fn all_reminders(&self) -> Result<Vec<Reminder>>;

    /// Reminders of one guild, ordered by name
    async fn guild_reminders(&self, guild_id: &str) -> Result<Vec<Reminder>>;

    async fn get_reminder(&self, guild_id: &str, name: &str) -> Result<Option<Reminder>>;

    /// Insert a row with `started = new.start_on_create`
    async fn insert_reminder(&self, new: &NewReminder) -> Result<Reminder>;

    /// Update the `started` column; false when no row matched
    async fn set_started(&self, guild_id: &str, name: &str, started: bool) -> Result<bool>;

    /// Delete a row; false when no row matched
    async fn delete_reminder(&self, guild_id: &str, name: &str) -> Result<bool>;

    /// Reminder names containing `partial` (case-insensitive), ordered, at most `limit`
    async fn search_names(&self, guild_id: &str, partial: &str, limit: usize) -> Result<Vec<String>>;
}
