//! Reminder error taxonomy
//!
//! - **Version**: 1.0.0
//! - **Since**: 2.0.0

use thiserror::Error;

/// Errors surfaced by reminder lifecycle operations.
///
/// Validation variants are always raised before any store or registry
/// mutation, so a caller receiving one of them can assume nothing changed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReminderError {
    /// The schedule expression could not be parsed.
    #[error("Invalid schedule `{expression}`: {reason}")]
    InvalidSchedule { expression: String, reason: String },

    /// A reminder with the same name already exists in the guild.
    #[error("Reminder already exists: {name}")]
    Duplicate { name: String },

    /// No reminder with the given name exists in the guild.
    #[error("Reminder not found: {name}")]
    NotFound { name: String },

    /// The persistence layer could not be reached or rejected the query.
    #[error("Reminder store unavailable: {0}")]
    StoreUnavailable(String),
}

impl ReminderError {
    /// Text shown to the Discord user who triggered the failing command
    pub fn user_message(&self) -> String {
        match self {
            ReminderError::InvalidSchedule { expression, .. } => format!(
                "`{expression}` is not a valid cron expression. Example: `0 9 * * 1-5` (weekdays at 9:00)."
            ),
            ReminderError::Duplicate { name } => {
                format!("A reminder named \"{name}\" already exists in this server.")
            }
            ReminderError::NotFound { name } => {
                format!("No reminder found with the name \"{name}\".")
            }
            ReminderError::StoreUnavailable(_) => {
                "Something went wrong while talking to the database. Please try again.".to_string()
            }
        }
    }
}

impl From<sqlite::Error> for ReminderError {
    fn from(err: sqlite::Error) -> Self {
        ReminderError::StoreUnavailable(err.to_string())
    }
}

/// Failure to deliver a fired reminder.
///
/// Never reaches a user: the job that fired logs it and stays armed.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid channel id: {0}")]
    InvalidChannel(String),

    #[error("Discord request failed: {0}")]
    Discord(#[from] serenity::Error),
}

pub type Result<T> = std::result::Result<T, ReminderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_names_the_reminder() {
        let err = ReminderError::NotFound {
            name: "standup".to_string(),
        };
        assert!(err.user_message().contains("standup"));

        let err = ReminderError::Duplicate {
            name: "standup".to_string(),
        };
        assert!(err.user_message().contains("already exists"));
    }

    #[test]
    fn test_store_message_hides_details() {
        let err = ReminderError::StoreUnavailable("disk I/O error".to_string());
        assert!(!err.user_message().contains("disk"));
        assert!(err.to_string().contains("disk I/O error"));
    }
}
