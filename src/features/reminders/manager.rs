//! # Reminder Lifecycle Manager
//!
//! Owns every mutation of reminders: writes go to the store first, then the
//! job registry is updated. A crash between the two steps leaves the store
//! authoritative, and the next [`ReminderManager::load_all`] rebuilds the
//! registry from it.
//!
//! Interactions run on separate tasks, so each reminder key has an async
//! lock held across the store write and the registry update. Operations on
//! one key therefore apply in arrival order and never interleave.
//!
//! - **Version**: 1.3.0
//! - **Since**: 2.0.0
//!
//! ## Changelog
//! - 1.3.0: Per-key locking around store and registry writes
//! - 1.2.0: Development footer on fired notifications
//! - 1.1.0: Skip unparseable rows at boot instead of failing the whole load
//! - 1.0.0: Initial lifecycle (load, add, start/stop, delete)

use async_trait::async_trait;
use dashmap::DashMap;
use log::{error, info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::error::{ReminderError, Result};
use super::model::{NewReminder, Reminder};
use super::notifier::{Notification, Notifier};
use super::registry::{JobAction, JobRegistry, JobState, ReminderKey};
use super::schedule::{describe_next, ReminderSchedule};
use super::store::ReminderStore;

/// Maximum autocomplete choices Discord accepts
pub const AUTOCOMPLETE_LIMIT: usize = 25;

/// Outcome of a boot-time load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub running: usize,
    pub stopped: usize,
    pub skipped: usize,
}

/// A reminder row together with its live job state, for display
#[derive(Debug, Clone)]
pub struct ReminderListing {
    pub reminder: Reminder,
    pub state: Option<JobState>,
    pub next_run: String,
}

/// Fire callback bound to one reminder's rendered notification
struct FireReminder {
    key: ReminderKey,
    notification: Notification,
    notifier: Arc<dyn Notifier>,
}

#[async_trait]
impl JobAction for FireReminder {
    async fn fire(&self) {
        match self.notifier.send_notification(&self.notification).await {
            Ok(()) => info!(
                "⏰ Reminder {} fired into channel {}",
                self.key, self.notification.channel_id
            ),
            Err(e) => error!(
                "Failed to deliver reminder {} to channel {}: {e} (job stays armed)",
                self.key, self.notification.channel_id
            ),
        }
    }
}

/// The only component allowed to mutate both the store and the registry
pub struct ReminderManager {
    store: Arc<dyn ReminderStore>,
    registry: Arc<JobRegistry>,
    notifier: Arc<dyn Notifier>,
    footer: Option<String>,
    locks: DashMap<ReminderKey, Arc<Mutex<()>>>,
}

impl ReminderManager {
    pub fn new(
        store: Arc<dyn ReminderStore>,
        registry: Arc<JobRegistry>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            registry,
            notifier,
            footer: None,
            locks: DashMap::new(),
        }
    }

    /// Attach a footer to every notification sent by jobs registered after this call
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Read-only view of the registry
    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Register one job per stored reminder, honoring each row's enabled flag.
    ///
    /// A store failure aborts the load. Rows whose schedule no longer parses
    /// are logged and skipped so the remaining reminders still arm.
    pub async fn load_all(&self) -> Result<LoadSummary> {
        let reminders = self.store.all_reminders().await?;
        let mut summary = LoadSummary::default();

        for reminder in &reminders {
            let key = ReminderKey::new(&reminder.guild_id, &reminder.name);
            match self.registry.register(
                key.clone(),
                &reminder.cron_expression,
                self.fire_action(reminder),
                reminder.enabled,
            ) {
                Ok(()) if reminder.enabled => summary.running += 1,
                Ok(()) => summary.stopped += 1,
                Err(e) => {
                    warn!("Skipping reminder {key} at load: {e}");
                    summary.skipped += 1;
                }
            }
        }

        info!(
            "📅 Loaded {} reminders ({} running, {} stopped, {} skipped)",
            reminders.len(),
            summary.running,
            summary.stopped,
            summary.skipped
        );
        Ok(summary)
    }

    /// Validate, persist and register a new reminder
    pub async fn add(&self, new: NewReminder) -> Result<Reminder> {
        ReminderSchedule::parse(&new.cron_expression)?;

        let key = ReminderKey::new(&new.guild_id, &new.name);
        let lock = self.lock_for(&key);
        let _guard = lock.lock().await;

        let reminder = self.store.insert_reminder(&new).await?;
        self.registry.register(
            key.clone(),
            &reminder.cron_expression,
            self.fire_action(&reminder),
            reminder.enabled,
        )?;

        info!(
            "Added reminder {key} [{}] -> channel {}",
            reminder.cron_expression, reminder.channel_id
        );
        Ok(reminder)
    }

    /// Persist the enabled flag, then start or stop the job
    pub async fn set_status(&self, guild_id: &str, name: &str, start: bool) -> Result<()> {
        let key = ReminderKey::new(guild_id, name);
        let lock = self.lock_for(&key);
        let _guard = lock.lock().await;

        if !self.store.set_started(guild_id, name, start).await? {
            return Err(ReminderError::NotFound {
                name: name.to_string(),
            });
        }

        let applied = if start {
            self.registry.start(&key)
        } else {
            self.registry.stop(&key)
        };
        if !applied {
            warn!("Reminder {key} updated in store but has no live job");
        }
        Ok(())
    }

    /// Delete the row, then drop the job
    pub async fn delete(&self, guild_id: &str, name: &str) -> Result<()> {
        let key = ReminderKey::new(guild_id, name);
        let lock = self.lock_for(&key);
        let _guard = lock.lock().await;

        if !self.store.delete_reminder(guild_id, name).await? {
            return Err(ReminderError::NotFound {
                name: name.to_string(),
            });
        }

        self.registry.remove(&key);
        info!("Deleted reminder {key}");
        Ok(())
    }

    /// Reminders of a guild with live state and next run time
    pub async fn list(&self, guild_id: &str) -> Result<Vec<ReminderListing>> {
        let timezone = self.registry.timezone();
        let reminders = self.store.guild_reminders(guild_id).await?;

        Ok(reminders
            .into_iter()
            .map(|reminder| {
                let key = ReminderKey::new(&reminder.guild_id, &reminder.name);
                ReminderListing {
                    state: self.registry.state(&key),
                    next_run: describe_next(&reminder.cron_expression, timezone),
                    reminder,
                }
            })
            .collect())
    }

    /// Reminder names for autocomplete
    pub async fn autocomplete(&self, guild_id: &str, partial: &str) -> Result<Vec<String>> {
        self.store
            .search_names(guild_id, partial, AUTOCOMPLETE_LIMIT)
            .await
    }

    /// Lock serializing mutations of `key`; entries outlive deletes so a
    /// waiter and a later caller always share the same lock
    fn lock_for(&self, key: &ReminderKey) -> Arc<Mutex<()>> {
        self.locks.entry(key.clone()).or_default().value().clone()
    }

    fn fire_action(&self, reminder: &Reminder) -> Arc<dyn JobAction> {
        Arc::new(FireReminder {
            key: ReminderKey::new(&reminder.guild_id, &reminder.name),
            notification: self.render(reminder),
            notifier: Arc::clone(&self.notifier),
        })
    }

    fn render(&self, reminder: &Reminder) -> Notification {
        Notification {
            channel_id: reminder.channel_id.clone(),
            title: reminder.name.clone(),
            body: reminder.description.clone(),
            reactions: reminder.reactions.clone(),
            ping_role: reminder.ping_role.clone(),
            footer: self.footer.clone(),
        }
    }
}
