//! # Features Module
//!
//! Self-contained feature modules. Each feature owns its domain types and
//! exposes a small surface to the command layer.
//!
//! - **Version**: 2.1.0
//! - **Since**: 0.7.0
//!
//! ## Changelog
//! - 2.1.0: Campaign pages, recaps and skyhook timers alongside reminders
//! - 2.0.0: Reminders with persistent jobs
//! - 1.0.0: Initial feature split

pub mod campaigns;
pub mod reminders;
pub mod skyhooks;

pub use campaigns::CampaignError;
pub use reminders::{JobRegistry, ReminderError, ReminderManager, ReminderStore};
pub use skyhooks::SkyhookError;
