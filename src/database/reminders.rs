//! Reminder rows

use async_trait::async_trait;
use log::{debug, warn};
use sqlite::{Connection, State, Statement};

use super::{is_unique_violation, sql_limit, Database};
use crate::features::reminders::error::{ReminderError, Result};
use crate::features::reminders::model::{NewReminder, Reminder};
use crate::features::reminders::store::ReminderStore;

const REMINDER_COLUMNS: &str =
    "id, guild_id, name, description, channel_id, cron_expression, started, created_at, reactions, ping_role";

fn read_reminder(stmt: &Statement<'_>) -> Result<Reminder> {
    let reactions_json = stmt.read::<String, _>("reactions")?;
    let reactions = serde_json::from_str::<Vec<String>>(&reactions_json).unwrap_or_else(|e| {
        warn!("Unreadable reactions column {reactions_json:?}: {e}");
        Vec::new()
    });

    Ok(Reminder {
        id: stmt.read::<i64, _>("id")?,
        guild_id: stmt.read::<String, _>("guild_id")?,
        name: stmt.read::<String, _>("name")?,
        description: stmt.read::<String, _>("description")?,
        channel_id: stmt.read::<String, _>("channel_id")?,
        cron_expression: stmt.read::<String, _>("cron_expression")?,
        enabled: stmt.read::<i64, _>("started")? != 0,
        created_at: stmt.read::<String, _>("created_at")?,
        reactions,
        ping_role: stmt.read::<Option<String>, _>("ping_role")?,
    })
}

fn collect_reminders(stmt: &mut Statement<'_>) -> Result<Vec<Reminder>> {
    let mut reminders = Vec::new();
    while let State::Row = stmt.next()? {
        reminders.push(read_reminder(stmt)?);
    }
    Ok(reminders)
}

fn select_reminder(conn: &Connection, guild_id: &str, name: &str) -> Result<Option<Reminder>> {
    let mut stmt = conn.prepare(format!(
        "SELECT {REMINDER_COLUMNS} FROM reminders WHERE guild_id = ? AND name = ?"
    ))?;
    stmt.bind((1, guild_id))?;
    stmt.bind((2, name))?;
    match stmt.next()? {
        State::Row => Ok(Some(read_reminder(&stmt)?)),
        State::Done => Ok(None),
    }
}

#[async_trait]
impl ReminderStore for Database {
    async fn all_reminders(&self) -> Result<Vec<Reminder>> {
        let conn = self.connection.lock().await;
        let mut stmt = conn.prepare(format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders ORDER BY guild_id, name"
        ))?;
        collect_reminders(&mut stmt)
    }

    async fn guild_reminders(&self, guild_id: &str) -> Result<Vec<Reminder>> {
        let conn = self.connection.lock().await;
        let mut stmt = conn.prepare(format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders WHERE guild_id = ? ORDER BY name"
        ))?;
        stmt.bind((1, guild_id))?;
        collect_reminders(&mut stmt)
    }

    async fn get_reminder(&self, guild_id: &str, name: &str) -> Result<Option<Reminder>> {
        let conn = self.connection.lock().await;
        select_reminder(&conn, guild_id, name)
    }

    async fn insert_reminder(&self, new: &NewReminder) -> Result<Reminder> {
        let reactions = serde_json::to_string(&new.reactions)
            .map_err(|e| ReminderError::StoreUnavailable(e.to_string()))?;

        let conn = self.connection.lock().await;
        let mut stmt = conn.prepare(
            "INSERT INTO reminders
                (guild_id, name, description, channel_id, cron_expression, started, reactions, ping_role)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )?;
        stmt.bind((1, new.guild_id.as_str()))?;
        stmt.bind((2, new.name.as_str()))?;
        stmt.bind((3, new.description.as_str()))?;
        stmt.bind((4, new.channel_id.as_str()))?;
        stmt.bind((5, new.cron_expression.as_str()))?;
        stmt.bind((6, i64::from(new.start_on_create)))?;
        stmt.bind((7, reactions.as_str()))?;
        stmt.bind((8, new.ping_role.as_deref()))?;

        if let Err(e) = stmt.next() {
            if is_unique_violation(&e) {
                return Err(ReminderError::Duplicate {
                    name: new.name.clone(),
                });
            }
            return Err(e.into());
        }
        drop(stmt);

        debug!("Inserted reminder {}/{}", new.guild_id, new.name);
        select_reminder(&conn, &new.guild_id, &new.name)?.ok_or_else(|| {
            ReminderError::StoreUnavailable(format!("inserted reminder {} vanished", new.name))
        })
    }

    async fn set_started(&self, guild_id: &str, name: &str, started: bool) -> Result<bool> {
        let conn = self.connection.lock().await;
        let mut stmt =
            conn.prepare("UPDATE reminders SET started = ? WHERE guild_id = ? AND name = ?")?;
        stmt.bind((1, i64::from(started)))?;
        stmt.bind((2, guild_id))?;
        stmt.bind((3, name))?;
        stmt.next()?;
        drop(stmt);
        Ok(conn.change_count() > 0)
    }

    async fn delete_reminder(&self, guild_id: &str, name: &str) -> Result<bool> {
        let conn = self.connection.lock().await;
        let mut stmt = conn.prepare("DELETE FROM reminders WHERE guild_id = ? AND name = ?")?;
        stmt.bind((1, guild_id))?;
        stmt.bind((2, name))?;
        stmt.next()?;
        drop(stmt);
        Ok(conn.change_count() > 0)
    }

    async fn search_names(&self, guild_id: &str, partial: &str, limit: usize) -> Result<Vec<String>> {
        let conn = self.connection.lock().await;
        let mut stmt = conn.prepare(
            "SELECT name FROM reminders
             WHERE guild_id = ? AND instr(LOWER(name), LOWER(?)) > 0
             ORDER BY name LIMIT ?",
        )?;
        stmt.bind((1, guild_id))?;
        stmt.bind((2, partial))?;
        stmt.bind((3, sql_limit(limit)))?;

        let mut names = Vec::new();
        while let State::Row = stmt.next()? {
            names.push(stmt.read::<String, _>("name")?);
        }
        Ok(names)
    }
}
