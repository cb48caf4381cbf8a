//! # Reminders Feature
//!
//! Cron-scheduled reminders posted into guild channels. The store is the
//! source of truth; the job registry mirrors it in memory and is rebuilt
//! from it at boot.
//!
//! - **Version**: 2.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 2.1.0: Vote buttons and tally on fired reminders
//! - 2.0.0: Persistent reminders with per-guild job registry
//! - 1.0.0: Initial in-memory scheduler

pub mod error;
pub mod manager;
pub mod model;
pub mod notifier;
pub mod registry;
pub mod schedule;
pub mod store;
pub mod tally;

pub use error::{ReminderError, TransportError};
pub use manager::{LoadSummary, ReminderListing, ReminderManager, AUTOCOMPLETE_LIMIT};
pub use model::{parse_reactions, NewReminder, Reminder};
pub use notifier::{DiscordNotifier, Notification, Notifier};
pub use registry::{JobAction, JobRegistry, JobState, ReminderKey};
pub use schedule::{describe_next, validate, ReminderSchedule, INVALID_CRON_LABEL};
pub use store::ReminderStore;
pub use tally::{apply_vote, parse_vote_id, vote_custom_id, Vote, VOTE_BUTTON_PREFIX};
