//! Campaign, info block and recap rows

use log::debug;
use sqlite::{Connection, State, Statement};

use super::{in_transaction, is_unique_violation, last_insert_id, sql_limit, Database};
use crate::features::campaigns::error::{CampaignError, Result};
use crate::features::campaigns::model::{
    display_order, Campaign, InfoBlock, InfoUpdate, NewCampaign, NewRecap, Recap,
    RECAP_HISTORY_LIMIT,
};

const CAMPAIGN_COLUMNS: &str = "id, guild_id, campaign_name, description, recap_master_link";
const INFO_COLUMNS: &str = "id, campaign_id, title, description, link, sort_order";
const RECAP_COLUMNS: &str = "id, guild_id, campaign_id, recap_title, recap_link, created_at";

fn read_campaign(stmt: &Statement<'_>) -> Result<Campaign> {
    Ok(Campaign {
        id: stmt.read::<i64, _>("id")?,
        guild_id: stmt.read::<String, _>("guild_id")?,
        name: stmt.read::<String, _>("campaign_name")?,
        description: stmt.read::<String, _>("description")?,
        recap_master_link: stmt.read::<String, _>("recap_master_link")?,
    })
}

fn read_info(stmt: &Statement<'_>) -> Result<InfoBlock> {
    Ok(InfoBlock {
        id: stmt.read::<i64, _>("id")?,
        campaign_id: stmt.read::<i64, _>("campaign_id")?,
        title: stmt.read::<String, _>("title")?,
        description: stmt.read::<Option<String>, _>("description")?,
        link: stmt.read::<Option<String>, _>("link")?,
        sort_order: stmt.read::<i64, _>("sort_order")?,
    })
}

fn read_recap(stmt: &Statement<'_>) -> Result<Recap> {
    Ok(Recap {
        id: stmt.read::<i64, _>("id")?,
        guild_id: stmt.read::<String, _>("guild_id")?,
        campaign_id: stmt.read::<i64, _>("campaign_id")?,
        title: stmt.read::<String, _>("recap_title")?,
        link: stmt.read::<String, _>("recap_link")?,
        created_at: stmt.read::<String, _>("created_at")?,
    })
}

fn select_campaign(conn: &Connection, guild_id: &str, name: &str) -> Result<Campaign> {
    let mut stmt = conn.prepare(format!(
        "SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE guild_id = ? AND campaign_name = ?"
    ))?;
    stmt.bind((1, guild_id))?;
    stmt.bind((2, name))?;
    match stmt.next()? {
        State::Row => read_campaign(&stmt),
        State::Done => Err(CampaignError::CampaignNotFound {
            name: name.to_string(),
        }),
    }
}

fn select_info(conn: &Connection, campaign_id: i64, title: &str) -> Result<Option<InfoBlock>> {
    let mut stmt = conn.prepare(format!(
        "SELECT {INFO_COLUMNS} FROM campaign_info WHERE campaign_id = ? AND title = ?"
    ))?;
    stmt.bind((1, campaign_id))?;
    stmt.bind((2, title))?;
    match stmt.next()? {
        State::Row => Ok(Some(read_info(&stmt)?)),
        State::Done => Ok(None),
    }
}

/// Run a single-row DELETE/UPDATE and report whether it matched
fn execute_counted(conn: &Connection, sql: &str, guild_id: &str, id: i64) -> Result<bool> {
    let mut stmt = conn.prepare(sql)?;
    stmt.bind((1, guild_id))?;
    stmt.bind((2, id))?;
    stmt.next()?;
    drop(stmt);
    Ok(conn.change_count() > 0)
}

fn search(conn: &Connection, sql: &str, scope: &[&str], partial: &str, limit: usize) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(sql)?;
    for (i, value) in scope.iter().enumerate() {
        stmt.bind((i + 1, *value))?;
    }
    stmt.bind((scope.len() + 1, partial))?;
    stmt.bind((scope.len() + 2, sql_limit(limit)))?;

    let mut names = Vec::new();
    while let State::Row = stmt.next()? {
        names.push(stmt.read::<String, _>(0)?);
    }
    Ok(names)
}

impl Database {
    pub async fn insert_campaign(&self, new: &NewCampaign) -> Result<Campaign> {
        let conn = self.connection.lock().await;
        let mut stmt = conn.prepare(
            "INSERT INTO campaigns (guild_id, campaign_name, description, recap_master_link)
             VALUES (?, ?, ?, ?)",
        )?;
        stmt.bind((1, new.guild_id.as_str()))?;
        stmt.bind((2, new.name.as_str()))?;
        stmt.bind((3, new.description.as_str()))?;
        stmt.bind((4, new.recap_master_link.as_str()))?;
        if let Err(e) = stmt.next() {
            if is_unique_violation(&e) {
                return Err(CampaignError::DuplicateCampaign {
                    name: new.name.clone(),
                });
            }
            return Err(e.into());
        }
        drop(stmt);

        debug!("Inserted campaign {}/{}", new.guild_id, new.name);
        select_campaign(&conn, &new.guild_id, &new.name)
    }

    /// Every campaign of a guild, by name
    pub async fn campaigns(&self, guild_id: &str) -> Result<Vec<Campaign>> {
        let conn = self.connection.lock().await;
        let mut stmt = conn.prepare(format!(
            "SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE guild_id = ? ORDER BY campaign_name"
        ))?;
        stmt.bind((1, guild_id))?;
        let mut campaigns = Vec::new();
        while let State::Row = stmt.next()? {
            campaigns.push(read_campaign(&stmt)?);
        }
        Ok(campaigns)
    }

    pub async fn campaign_by_name(&self, guild_id: &str, name: &str) -> Result<Campaign> {
        let conn = self.connection.lock().await;
        select_campaign(&conn, guild_id, name)
    }

    pub async fn campaign_by_id(&self, guild_id: &str, id: i64) -> Result<Campaign> {
        let conn = self.connection.lock().await;
        let mut stmt = conn.prepare(format!(
            "SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE guild_id = ? AND id = ?"
        ))?;
        stmt.bind((1, guild_id))?;
        stmt.bind((2, id))?;
        match stmt.next()? {
            State::Row => read_campaign(&stmt),
            State::Done => Err(CampaignError::CampaignIdNotFound(id)),
        }
    }

    /// Delete a campaign together with its info blocks and recaps
    pub async fn delete_campaign(&self, guild_id: &str, id: i64) -> Result<()> {
        let conn = self.connection.lock().await;
        in_transaction(&conn, |conn| {
            if !execute_counted(conn, "DELETE FROM campaigns WHERE guild_id = ? AND id = ?", guild_id, id)? {
                return Err(CampaignError::CampaignIdNotFound(id));
            }
            execute_counted(conn, "DELETE FROM campaign_info WHERE guild_id = ? AND campaign_id = ?", guild_id, id)?;
            execute_counted(conn, "DELETE FROM recaps WHERE guild_id = ? AND campaign_id = ?", guild_id, id)?;
            Ok(())
        })?;
        debug!("Deleted campaign {guild_id}/{id}");
        Ok(())
    }

    pub async fn search_campaign_names(&self, guild_id: &str, partial: &str, limit: usize) -> Result<Vec<String>> {
        let conn = self.connection.lock().await;
        search(
            &conn,
            "SELECT campaign_name FROM campaigns
             WHERE guild_id = ? AND instr(LOWER(campaign_name), LOWER(?)) > 0
             ORDER BY campaign_name LIMIT ?",
            &[guild_id],
            partial,
            limit,
        )
    }

    /// Info blocks of a campaign in display order
    pub async fn info_blocks(&self, campaign_id: i64) -> Result<Vec<InfoBlock>> {
        let conn = self.connection.lock().await;
        let mut stmt = conn.prepare(format!(
            "SELECT {INFO_COLUMNS} FROM campaign_info WHERE campaign_id = ? ORDER BY title"
        ))?;
        stmt.bind((1, campaign_id))?;
        let mut blocks = Vec::new();
        while let State::Row = stmt.next()? {
            blocks.push(read_info(&stmt)?);
        }
        // Stable, so equal sort orders stay alphabetical
        blocks.sort_by_key(|b| display_order(b.sort_order));
        Ok(blocks)
    }

    /// Insert an info block, or rewrite `update.existing_title` when set.
    ///
    /// Returns the stored block and whether it was newly created.
    pub async fn upsert_info(&self, update: &InfoUpdate) -> Result<(InfoBlock, bool)> {
        let conn = self.connection.lock().await;
        let campaign = select_campaign(&conn, &update.guild_id, &update.campaign_name)?;
        let duplicate = |e: sqlite::Error| {
            if is_unique_violation(&e) {
                CampaignError::DuplicateInfo {
                    title: update.title.clone(),
                }
            } else {
                e.into()
            }
        };

        let created = match update.existing_title.as_deref() {
            Some(existing) => {
                let mut stmt = conn.prepare(
                    "UPDATE campaign_info SET title = ?, description = ?, link = ?, sort_order = ?
                     WHERE campaign_id = ? AND title = ?",
                )?;
                stmt.bind((1, update.title.as_str()))?;
                stmt.bind((2, update.description.as_deref()))?;
                stmt.bind((3, update.link.as_deref()))?;
                stmt.bind((4, update.sort_order))?;
                stmt.bind((5, campaign.id))?;
                stmt.bind((6, existing))?;
                stmt.next().map_err(duplicate)?;
                drop(stmt);
                if conn.change_count() == 0 {
                    return Err(CampaignError::InfoNotFound {
                        title: existing.to_string(),
                    });
                }
                false
            }
            None => {
                let mut stmt = conn.prepare(
                    "INSERT INTO campaign_info (guild_id, campaign_id, title, description, link, sort_order)
                     VALUES (?, ?, ?, ?, ?, ?)",
                )?;
                stmt.bind((1, update.guild_id.as_str()))?;
                stmt.bind((2, campaign.id))?;
                stmt.bind((3, update.title.as_str()))?;
                stmt.bind((4, update.description.as_deref()))?;
                stmt.bind((5, update.link.as_deref()))?;
                stmt.bind((6, update.sort_order))?;
                stmt.next().map_err(duplicate)?;
                true
            }
        };

        let block = select_info(&conn, campaign.id, &update.title)?.ok_or_else(|| {
            CampaignError::StoreUnavailable(format!("info block {} vanished", update.title))
        })?;
        Ok((block, created))
    }

    pub async fn delete_info(&self, guild_id: &str, id: i64) -> Result<()> {
        let conn = self.connection.lock().await;
        if execute_counted(&conn, "DELETE FROM campaign_info WHERE guild_id = ? AND id = ?", guild_id, id)? {
            Ok(())
        } else {
            Err(CampaignError::InfoIdNotFound(id))
        }
    }

    pub async fn search_info_titles(
        &self,
        guild_id: &str,
        campaign_name: &str,
        partial: &str,
        limit: usize,
    ) -> Result<Vec<String>> {
        let conn = self.connection.lock().await;
        search(
            &conn,
            "SELECT i.title FROM campaign_info i
             JOIN campaigns c ON c.id = i.campaign_id
             WHERE c.guild_id = ? AND c.campaign_name = ? AND instr(LOWER(i.title), LOWER(?)) > 0
             ORDER BY i.title LIMIT ?",
            &[guild_id, campaign_name],
            partial,
            limit,
        )
    }

    /// Store a recap and prune the campaign's history to the newest entries
    pub async fn insert_recap(&self, new: &NewRecap) -> Result<(Campaign, Recap)> {
        let conn = self.connection.lock().await;
        let campaign = select_campaign(&conn, &new.guild_id, &new.campaign_name)?;

        let recap = in_transaction(&conn, |conn| {
            let mut stmt = conn.prepare(
                "INSERT INTO recaps (guild_id, campaign_id, recap_title, recap_link) VALUES (?, ?, ?, ?)",
            )?;
            stmt.bind((1, new.guild_id.as_str()))?;
            stmt.bind((2, campaign.id))?;
            stmt.bind((3, new.title.as_str()))?;
            stmt.bind((4, new.link.as_str()))?;
            stmt.next()?;
            drop(stmt);
            let id = last_insert_id(conn)?;

            let mut stmt = conn.prepare(
                "DELETE FROM recaps WHERE campaign_id = ? AND id NOT IN (
                    SELECT id FROM recaps WHERE campaign_id = ?
                    ORDER BY created_at DESC, id DESC LIMIT ?
                 )",
            )?;
            stmt.bind((1, campaign.id))?;
            stmt.bind((2, campaign.id))?;
            stmt.bind((3, sql_limit(RECAP_HISTORY_LIMIT)))?;
            stmt.next()?;
            drop(stmt);
            let pruned = conn.change_count();
            if pruned > 0 {
                debug!("Pruned {pruned} old recaps of campaign {}", campaign.id);
            }

            let mut stmt = conn.prepare(format!("SELECT {RECAP_COLUMNS} FROM recaps WHERE id = ?"))?;
            stmt.bind((1, id))?;
            match stmt.next()? {
                State::Row => read_recap(&stmt),
                State::Done => Err(CampaignError::StoreUnavailable(format!("recap {id} vanished"))),
            }
        })?;
        Ok((campaign, recap))
    }

    /// Newest recaps of a campaign first
    pub async fn latest_recaps(&self, campaign_id: i64, limit: usize) -> Result<Vec<Recap>> {
        let conn = self.connection.lock().await;
        let mut stmt = conn.prepare(format!(
            "SELECT {RECAP_COLUMNS} FROM recaps WHERE campaign_id = ?
             ORDER BY created_at DESC, id DESC LIMIT ?"
        ))?;
        stmt.bind((1, campaign_id))?;
        stmt.bind((2, sql_limit(limit)))?;
        let mut recaps = Vec::new();
        while let State::Row = stmt.next()? {
            recaps.push(read_recap(&stmt)?);
        }
        Ok(recaps)
    }

    pub async fn delete_recap(&self, guild_id: &str, id: i64) -> Result<()> {
        let conn = self.connection.lock().await;
        if execute_counted(&conn, "DELETE FROM recaps WHERE guild_id = ? AND id = ?", guild_id, id)? {
            Ok(())
        } else {
            Err(CampaignError::RecapNotFound(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_campaign(guild: &str, name: &str) -> NewCampaign {
        NewCampaign {
            guild_id: guild.to_string(),
            name: name.to_string(),
            description: "Pirates of the Sword Coast".to_string(),
            recap_master_link: "https://docs.google.com/document/d/recaps".to_string(),
        }
    }

    fn info(title: &str, sort_order: i64, existing: Option<&str>) -> InfoUpdate {
        InfoUpdate {
            guild_id: "G1".to_string(),
            campaign_name: "Saltmarsh".to_string(),
            title: title.to_string(),
            description: Some(format!("{title} notes")),
            link: None,
            sort_order,
            existing_title: existing.map(str::to_string),
        }
    }

    fn recap(title: &str) -> NewRecap {
        NewRecap {
            guild_id: "G1".to_string(),
            campaign_name: "Saltmarsh".to_string(),
            title: title.to_string(),
            link: format!("https://example.com/{title}"),
        }
    }

    #[tokio::test]
    async fn test_campaign_names_are_unique_per_guild() {
        let db = Database::new(":memory:").await.unwrap();
        let created = db.insert_campaign(&new_campaign("G1", "Saltmarsh")).await.unwrap();
        assert!(created.id > 0);

        assert_eq!(
            db.insert_campaign(&new_campaign("G1", "Saltmarsh")).await.unwrap_err(),
            CampaignError::DuplicateCampaign {
                name: "Saltmarsh".to_string()
            }
        );
        db.insert_campaign(&new_campaign("G2", "Saltmarsh")).await.unwrap();
        assert_eq!(db.campaign_by_id("G1", created.id).await.unwrap(), created);
        assert_eq!(
            db.campaign_by_id("G2", created.id).await.unwrap_err(),
            CampaignError::CampaignIdNotFound(created.id)
        );
        assert_eq!(db.campaigns("G1").await.unwrap(), vec![created]);
        assert_eq!(
            db.search_campaign_names("G1", "SALT", 25).await.unwrap(),
            vec!["Saltmarsh"]
        );
    }

    #[tokio::test]
    async fn test_info_blocks_insert_rename_and_order() {
        let db = Database::new(":memory:").await.unwrap();
        db.insert_campaign(&new_campaign("G1", "Saltmarsh")).await.unwrap();

        let (_, created) = db.upsert_info(&info("Map", -1, None)).await.unwrap();
        assert!(created);
        db.upsert_info(&info("Setting", 0, None)).await.unwrap();
        db.upsert_info(&info("Party", 1, None)).await.unwrap();
        assert_eq!(
            db.upsert_info(&info("Party", 3, None)).await.unwrap_err(),
            CampaignError::DuplicateInfo {
                title: "Party".to_string()
            }
        );

        let (renamed, created) = db.upsert_info(&info("Heroes", 2, Some("Party"))).await.unwrap();
        assert!(!created);
        assert_eq!(renamed.title, "Heroes");
        assert_eq!(
            db.upsert_info(&info("Villains", 0, Some("Party"))).await.unwrap_err(),
            CampaignError::InfoNotFound {
                title: "Party".to_string()
            }
        );

        let campaign = db.campaign_by_name("G1", "Saltmarsh").await.unwrap();
        let titles: Vec<String> = db
            .info_blocks(campaign.id)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["Setting", "Heroes", "Map"]);
        assert_eq!(
            db.search_info_titles("G1", "Saltmarsh", "e", 25).await.unwrap(),
            vec!["Heroes", "Setting"]
        );

        assert_eq!(db.delete_info("G2", renamed.id).await.unwrap_err(), CampaignError::InfoIdNotFound(renamed.id));
        db.delete_info("G1", renamed.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_info_for_unknown_campaign() {
        let db = Database::new(":memory:").await.unwrap();
        assert_eq!(
            db.upsert_info(&info("Map", 0, None)).await.unwrap_err(),
            CampaignError::CampaignNotFound {
                name: "Saltmarsh".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_recap_history_is_pruned() {
        let db = Database::new(":memory:").await.unwrap();
        db.insert_campaign(&new_campaign("G1", "Saltmarsh")).await.unwrap();

        for session in 1..=RECAP_HISTORY_LIMIT + 2 {
            db.insert_recap(&recap(&format!("session-{session}"))).await.unwrap();
        }
        let (campaign, latest) = db.insert_recap(&recap("finale")).await.unwrap();

        let recaps = db.latest_recaps(campaign.id, 50).await.unwrap();
        assert_eq!(recaps.len(), RECAP_HISTORY_LIMIT);
        assert_eq!(recaps[0], latest);
        assert!(recaps.iter().all(|r| r.title != "session-1" && r.title != "session-3"));

        assert_eq!(db.delete_recap("G1", -5).await.unwrap_err(), CampaignError::RecapNotFound(-5));
        db.delete_recap("G1", latest.id).await.unwrap();
        assert_eq!(db.latest_recaps(campaign.id, 1).await.unwrap()[0].title, format!("session-{}", RECAP_HISTORY_LIMIT + 2));
    }

    #[tokio::test]
    async fn test_delete_campaign_removes_children() {
        let db = Database::new(":memory:").await.unwrap();
        let campaign = db.insert_campaign(&new_campaign("G1", "Saltmarsh")).await.unwrap();
        db.upsert_info(&info("Setting", 0, None)).await.unwrap();
        db.insert_recap(&recap("session-1")).await.unwrap();

        assert_eq!(
            db.delete_campaign("G2", campaign.id).await.unwrap_err(),
            CampaignError::CampaignIdNotFound(campaign.id)
        );
        db.delete_campaign("G1", campaign.id).await.unwrap();

        assert!(db.campaigns("G1").await.unwrap().is_empty());
        assert!(db.info_blocks(campaign.id).await.unwrap().is_empty());
        assert!(db.latest_recaps(campaign.id, 10).await.unwrap().is_empty());
    }
}
