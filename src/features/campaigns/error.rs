//! Campaign error taxonomy
//!
//! - **Version**: 1.0.0
//! - **Since**: 2.4.0

use thiserror::Error;

/// Errors surfaced by campaign, info block and recap operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CampaignError {
    #[error("Invalid link `{link}`")]
    InvalidLink { link: String },

    #[error("Campaign already exists: {name}")]
    DuplicateCampaign { name: String },

    #[error("Info block already exists: {title}")]
    DuplicateInfo { title: String },

    #[error("Campaign not found: {name}")]
    CampaignNotFound { name: String },

    #[error("Campaign id not found: {0}")]
    CampaignIdNotFound(i64),

    #[error("Info block not found: {title}")]
    InfoNotFound { title: String },

    #[error("Info block id not found: {0}")]
    InfoIdNotFound(i64),

    #[error("Recap id not found: {0}")]
    RecapNotFound(i64),

    #[error("Campaign store unavailable: {0}")]
    StoreUnavailable(String),
}

impl CampaignError {
    /// Text shown to the Discord user who triggered the failing command
    pub fn user_message(&self) -> String {
        match self {
            CampaignError::InvalidLink { link } => {
                format!("`{link}` is not a valid link. Links must start with http:// or https://.")
            }
            CampaignError::DuplicateCampaign { name } => {
                format!("A campaign named \"{name}\" already exists in this server.")
            }
            CampaignError::DuplicateInfo { title } => {
                format!("This campaign already has an info block titled \"{title}\".")
            }
            CampaignError::CampaignNotFound { name } => {
                format!("No campaign found with the name \"{name}\".")
            }
            CampaignError::CampaignIdNotFound(id) => format!("No campaign found with ID {id}."),
            CampaignError::InfoNotFound { title } => {
                format!("No info block found with the title \"{title}\".")
            }
            CampaignError::InfoIdNotFound(id) => format!("No info block found with ID {id}."),
            CampaignError::RecapNotFound(id) => format!("No recap found with ID {id}."),
            CampaignError::StoreUnavailable(_) => {
                "Something went wrong while talking to the database. Please try again.".to_string()
            }
        }
    }
}

impl From<sqlite::Error> for CampaignError {
    fn from(err: sqlite::Error) -> Self {
        CampaignError::StoreUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CampaignError>;
