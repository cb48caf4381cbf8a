//! # Campaigns Feature
//!
//! Per-guild campaign pages: a description and recap archive link, ordered
//! info blocks, and the latest session recaps.
//!
//! - **Version**: 1.0.0
//! - **Since**: 2.4.0
//! - **Toggleable**: true

pub mod error;
pub mod links;
pub mod model;

pub use error::CampaignError;
pub use links::validate_link;
pub use model::{
    display_order, Campaign, InfoBlock, InfoUpdate, NewCampaign, NewRecap, Recap,
    RECAP_HISTORY_LIMIT,
};
