//! Campaign, info block and recap types

/// Recaps kept per campaign; older ones are pruned on insert
pub const RECAP_HISTORY_LIMIT: usize = 10;

/// Info blocks with this sort order are shown after all others
pub const SORT_LAST: i64 = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Campaign {
    pub id: i64,
    pub guild_id: String,
    pub name: String,
    pub description: String,
    /// Document holding every recap of the campaign
    pub recap_master_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCampaign {
    pub guild_id: String,
    pub name: String,
    pub description: String,
    pub recap_master_link: String,
}

/// A titled section of a campaign page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoBlock {
    pub id: i64,
    pub campaign_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub sort_order: i64,
}

impl InfoBlock {
    /// Embed field text: description, link and optionally the id
    pub fn field_value(&self, show_ids: bool) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            parts.push(description.to_string());
        }
        if let Some(link) = self.link.as_deref().filter(|l| !l.is_empty()) {
            parts.push(link.to_string());
        }
        if show_ids {
            parts.push(format!("ID: {}", self.id));
        }
        if parts.is_empty() {
            return "No additional information.".to_string();
        }
        parts.join("\n")
    }
}

/// Create an info block, or rewrite the one titled `existing_title`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoUpdate {
    pub guild_id: String,
    pub campaign_name: String,
    pub title: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub sort_order: i64,
    pub existing_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recap {
    pub id: i64,
    pub guild_id: String,
    pub campaign_id: i64,
    pub title: String,
    pub link: String,
    /// SQLite `CURRENT_TIMESTAMP` text, UTC
    pub created_at: String,
}

impl Recap {
    /// Creation time as unix seconds, for Discord timestamp markup
    pub fn created_unix(&self) -> Option<i64> {
        chrono::NaiveDateTime::parse_from_str(&self.created_at, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|t| t.and_utc().timestamp())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecap {
    pub guild_id: String,
    pub campaign_name: String,
    pub title: String,
    pub link: String,
}

/// Sort key for info blocks: ascending sort order, with [`SORT_LAST`] at the end
pub fn display_order(sort_order: i64) -> (bool, i64) {
    (sort_order == SORT_LAST, sort_order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(title: &str, sort_order: i64) -> InfoBlock {
        InfoBlock {
            id: 7,
            campaign_id: 1,
            title: title.to_string(),
            description: None,
            link: None,
            sort_order,
        }
    }

    #[test]
    fn test_sort_last_goes_after_everything() {
        let mut blocks = vec![block("Map", -1), block("Party", 2), block("Setting", 0), block("House rules", 1)];
        blocks.sort_by_key(|b| display_order(b.sort_order));
        let titles: Vec<&str> = blocks.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Setting", "House rules", "Party", "Map"]);
    }

    #[test]
    fn test_field_value() {
        let mut info = block("Setting", 0);
        assert_eq!(info.field_value(false), "No additional information.");
        assert_eq!(info.field_value(true), "ID: 7");

        info.description = Some("The Sword Coast".to_string());
        info.link = Some("https://example.com/map".to_string());
        assert_eq!(info.field_value(false), "The Sword Coast\nhttps://example.com/map");
        assert!(info.field_value(true).ends_with("\nID: 7"));
    }

    #[test]
    fn test_recap_timestamp() {
        let recap = Recap {
            id: 1,
            guild_id: "G1".to_string(),
            campaign_id: 1,
            title: "Session 12".to_string(),
            link: "https://example.com".to_string(),
            created_at: "2025-02-09 17:00:00".to_string(),
        };
        assert_eq!(recap.created_unix(), Some(1739120400));
    }
}
