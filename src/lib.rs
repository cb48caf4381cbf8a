// Core layer - configuration and presentation helpers
pub mod core;

// Features layer - reminders, campaigns and skyhook timers
pub mod features;

// UI components
pub mod message_components;

// Infrastructure
pub mod database;

// Application layer
pub mod command_handler;
pub mod commands;

pub use core::Config;

pub use features::reminders::{
    JobRegistry, JobState, NewReminder, Notification, Notifier, Reminder, ReminderError,
    ReminderKey, ReminderManager, ReminderStore,
};
pub use features::{CampaignError, SkyhookError};
