//! Skyhook error taxonomy
//!
//! - **Version**: 1.0.0
//! - **Since**: 2.4.0

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SkyhookError {
    #[error("Invalid system name `{0}`")]
    InvalidSystem(String),

    #[error("Invalid moon type `{0}`")]
    InvalidMoonType(String),

    #[error("Invalid time until vulnerable `{0}`")]
    InvalidDuration(String),

    #[error("Timer `{0}` is too far ahead")]
    TooFarAhead(String),

    #[error("Skyhook timer not found: {0}")]
    NotFound(i64),

    #[error("Skyhook store unavailable: {0}")]
    StoreUnavailable(String),
}

impl SkyhookError {
    /// Text shown to the Discord user who triggered the failing command
    pub fn user_message(&self) -> String {
        match self {
            SkyhookError::InvalidSystem(_) => {
                "System names may only contain letters, numbers, spaces and hyphens (at most 20 characters).".to_string()
            }
            SkyhookError::InvalidMoonType(value) => {
                format!("`{value}` is not a moon type. Use L/Lava or I/Ice.")
            }
            SkyhookError::InvalidDuration(value) => format!(
                "Could not read `{value}`. Use a duration like `1d23h45m` or paste `Secure (vulnerable in 2d 4h 33m)`."
            ),
            SkyhookError::TooFarAhead(value) => format!(
                "`{value}` is more than {} days away.",
                super::timer::MAX_LEAD_DAYS
            ),
            SkyhookError::NotFound(id) => format!("No skyhook timer found with ID {id}."),
            SkyhookError::StoreUnavailable(_) => {
                "Something went wrong while talking to the database. Please try again.".to_string()
            }
        }
    }
}

impl From<sqlite::Error> for SkyhookError {
    fn from(err: sqlite::Error) -> Self {
        SkyhookError::StoreUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SkyhookError>;
