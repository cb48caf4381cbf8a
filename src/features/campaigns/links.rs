//! Link validation for campaign archives, info blocks and recaps

use url::Url;

use super::error::{CampaignError, Result};

/// Accept absolute http(s) links, returned trimmed
pub fn validate_link(input: &str) -> Result<String> {
    let trimmed = input.trim();
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => {
            Ok(trimmed.to_string())
        }
        _ => Err(CampaignError::InvalidLink {
            link: input.to_string(),
        }),
    }
}
