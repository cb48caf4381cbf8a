//! Skyhook timer rows
//!
//! `due_at` is stored as fixed-width UTC text so string comparison orders
//! timers chronologically.

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use sqlite::{State, Statement};

use super::{last_insert_id, sql_limit, Database};
use crate::features::skyhooks::error::{Result, SkyhookError};
use crate::features::skyhooks::model::{MoonType, NewSkyhook, Skyhook};

const DUE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

fn format_due(at: DateTime<Utc>) -> String {
    at.format(DUE_FORMAT).to_string()
}

fn read_skyhook(stmt: &Statement<'_>) -> Result<Skyhook> {
    let due_text = stmt.read::<String, _>("due_at")?;
    let due_at = NaiveDateTime::parse_from_str(&due_text, DUE_FORMAT)
        .map_err(|e| SkyhookError::StoreUnavailable(format!("bad due_at {due_text:?}: {e}")))?
        .and_utc();
    let moon_text = stmt.read::<String, _>("moon_type")?;

    Ok(Skyhook {
        id: stmt.read::<i64, _>("id")?,
        guild_id: stmt.read::<String, _>("guild_id")?,
        system: stmt.read::<String, _>("system")?,
        moon_type: moon_text.parse::<MoonType>()?,
        due_at,
    })
}

impl Database {
    pub async fn insert_skyhook(&self, new: &NewSkyhook) -> Result<Skyhook> {
        let conn = self.connection.lock().await;
        let mut stmt = conn.prepare(
            "INSERT INTO skyhooks (guild_id, system, moon_type, due_at) VALUES (?, ?, ?, ?)",
        )?;
        stmt.bind((1, new.guild_id.as_str()))?;
        stmt.bind((2, new.system.as_str()))?;
        stmt.bind((3, new.moon_type.to_string().as_str()))?;
        stmt.bind((4, format_due(new.due_at).as_str()))?;
        stmt.next()?;
        drop(stmt);

        Ok(Skyhook {
            id: last_insert_id(&conn)?,
            guild_id: new.guild_id.clone(),
            system: new.system.clone(),
            moon_type: new.moon_type,
            // Stored at whole seconds
            due_at: new.due_at.with_nanosecond(0).unwrap_or(new.due_at),
        })
    }

    /// Timers of a guild due at or after `now`, soonest first
    pub async fn upcoming_skyhooks(&self, guild_id: &str, now: DateTime<Utc>, limit: usize) -> Result<Vec<Skyhook>> {
        let conn = self.connection.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, guild_id, system, moon_type, due_at FROM skyhooks
             WHERE guild_id = ? AND due_at >= ?
             ORDER BY due_at, id LIMIT ?",
        )?;
        stmt.bind((1, guild_id))?;
        stmt.bind((2, format_due(now).as_str()))?;
        stmt.bind((3, sql_limit(limit)))?;

        let mut skyhooks = Vec::new();
        while let State::Row = stmt.next()? {
            skyhooks.push(read_skyhook(&stmt)?);
        }
        Ok(skyhooks)
    }

    pub async fn delete_skyhook(&self, guild_id: &str, id: i64) -> Result<()> {
        let conn = self.connection.lock().await;
        let mut stmt = conn.prepare("DELETE FROM skyhooks WHERE guild_id = ? AND id = ?")?;
        stmt.bind((1, guild_id))?;
        stmt.bind((2, id))?;
        stmt.next()?;
        drop(stmt);
        if conn.change_count() > 0 {
            Ok(())
        } else {
            Err(SkyhookError::NotFound(id))
        }
    }

    /// Remove timers of every guild that came due at or before `cutoff`
    pub async fn delete_skyhooks_due_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let conn = self.connection.lock().await;
        let mut stmt = conn.prepare("DELETE FROM skyhooks WHERE due_at <= ?")?;
        stmt.bind((1, format_due(cutoff).as_str()))?;
        stmt.next()?;
        drop(stmt);
        Ok(conn.change_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 5, 1, hour, 0, 0).unwrap()
    }

    fn timer(guild: &str, system: &str, due_at: DateTime<Utc>) -> NewSkyhook {
        NewSkyhook {
            guild_id: guild.to_string(),
            system: system.to_string(),
            moon_type: MoonType::Ice,
            due_at,
        }
    }

    #[tokio::test]
    async fn test_upcoming_only_and_soonest_first() {
        let db = Database::new(":memory:").await.unwrap();
        db.insert_skyhook(&timer("G1", "LATE", at(20))).await.unwrap();
        db.insert_skyhook(&timer("G1", "PAST", at(8))).await.unwrap();
        let soon = db.insert_skyhook(&timer("G1", "SOON", at(12))).await.unwrap();
        db.insert_skyhook(&timer("G2", "OTHER", at(13))).await.unwrap();

        let upcoming = db.upcoming_skyhooks("G1", at(10), 10).await.unwrap();
        let systems: Vec<&str> = upcoming.iter().map(|s| s.system.as_str()).collect();
        assert_eq!(systems, vec!["SOON", "LATE"]);
        assert_eq!(upcoming[0], soon);
        assert_eq!(db.upcoming_skyhooks("G1", at(10), 1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_is_scoped_to_guild() {
        let db = Database::new(":memory:").await.unwrap();
        let skyhook = db.insert_skyhook(&timer("G1", "J115405", at(12))).await.unwrap();

        assert_eq!(
            db.delete_skyhook("G2", skyhook.id).await.unwrap_err(),
            SkyhookError::NotFound(skyhook.id)
        );
        db.delete_skyhook("G1", skyhook.id).await.unwrap();
        assert!(db.upcoming_skyhooks("G1", at(0), 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired() {
        let db = Database::new(":memory:").await.unwrap();
        db.insert_skyhook(&timer("G1", "OLD", at(2))).await.unwrap();
        db.insert_skyhook(&timer("G2", "EDGE", at(5))).await.unwrap();
        db.insert_skyhook(&timer("G1", "FRESH", at(6))).await.unwrap();

        assert_eq!(db.delete_skyhooks_due_before(at(5)).await.unwrap(), 2);
        let left = db.upcoming_skyhooks("G1", at(0), 10).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].due_at, at(6));
        assert_eq!(left[0].due_at - at(0), Duration::hours(6));
    }
}
