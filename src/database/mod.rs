//! # Database
//!
//! SQLite persistence for reminders, campaigns and skyhook timers. One
//! connection per process, shared behind an async mutex; clones of
//! [`Database`] share it. Queries live next to the feature they serve.
//!
//! - **Version**: 3.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 3.0.0: Campaign, info block, recap and skyhook tables; reminders start enabled by default
//! - 2.0.0: Versioned migrations via `PRAGMA user_version`, reactions and ping role columns
//! - 1.0.0: Initial reminders table

mod campaigns;
mod reminders;
mod skyhooks;

use log::{info, warn};
use sqlite::{Connection, State};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::features::reminders::error::{ReminderError, Result};

/// Ordered schema migrations; entry `n` upgrades `user_version` from `n` to `n + 1`
const MIGRATIONS: &[&str] = &[
    // v1: reminders
    "CREATE TABLE IF NOT EXISTS reminders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        guild_id TEXT NOT NULL,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        channel_id TEXT NOT NULL,
        cron_expression TEXT NOT NULL,
        started BOOLEAN NOT NULL DEFAULT 0,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        reactions TEXT NOT NULL DEFAULT '[]',
        ping_role TEXT,
        UNIQUE(guild_id, name)
    );
    CREATE INDEX IF NOT EXISTS idx_reminders_guild ON reminders(guild_id);",
    // v2: reminders are enabled unless created stopped; SQLite cannot alter a default in place
    "CREATE TABLE reminders_v2 (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        guild_id TEXT NOT NULL,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        channel_id TEXT NOT NULL,
        cron_expression TEXT NOT NULL,
        started BOOLEAN NOT NULL DEFAULT 1,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        reactions TEXT NOT NULL DEFAULT '[]',
        ping_role TEXT,
        UNIQUE(guild_id, name)
    );
    INSERT INTO reminders_v2 (id, guild_id, name, description, channel_id, cron_expression, started, created_at, reactions, ping_role)
        SELECT id, guild_id, name, description, channel_id, cron_expression, started, created_at, reactions, ping_role FROM reminders;
    DROP TABLE reminders;
    ALTER TABLE reminders_v2 RENAME TO reminders;
    CREATE INDEX IF NOT EXISTS idx_reminders_guild ON reminders(guild_id);",
    // v3: campaigns with their info blocks and recaps
    "CREATE TABLE IF NOT EXISTS campaigns (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        guild_id TEXT NOT NULL,
        campaign_name TEXT NOT NULL,
        description TEXT NOT NULL,
        recap_master_link TEXT NOT NULL,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        UNIQUE(guild_id, campaign_name)
    );
    CREATE TABLE IF NOT EXISTS campaign_info (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        guild_id TEXT NOT NULL,
        campaign_id INTEGER NOT NULL,
        title TEXT NOT NULL,
        description TEXT,
        link TEXT,
        sort_order INTEGER NOT NULL DEFAULT 0,
        UNIQUE(campaign_id, title)
    );
    CREATE TABLE IF NOT EXISTS recaps (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        guild_id TEXT NOT NULL,
        campaign_id INTEGER NOT NULL,
        recap_title TEXT NOT NULL,
        recap_link TEXT NOT NULL,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
    CREATE INDEX IF NOT EXISTS idx_recaps_campaign ON recaps(campaign_id, created_at);",
    // v4: skyhook vulnerability timers
    "CREATE TABLE IF NOT EXISTS skyhooks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        guild_id TEXT NOT NULL,
        system TEXT NOT NULL,
        moon_type TEXT NOT NULL,
        due_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_skyhooks_due ON skyhooks(guild_id, due_at);",
];

/// SQLite constraint violation result code
const SQLITE_CONSTRAINT: isize = 19;

#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database at `path` and bring the schema up to date.
    ///
    /// `":memory:"` opens a private in-memory database.
    pub async fn new(path: &str) -> Result<Self> {
        if path != ":memory:" {
            if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ReminderError::StoreUnavailable(e.to_string()))?;
            }
        }

        let connection = sqlite::open(path)?;
        migrate(&connection)?;
        info!("Database ready at {path}");

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Insert a row without validating its schedule, to simulate legacy data
    #[cfg(test)]
    pub(crate) async fn insert_raw_for_tests(&self, guild_id: &str, name: &str, cron: &str) {
        let conn = self.connection.lock().await;
        let mut stmt = conn
            .prepare(
                "INSERT INTO reminders (guild_id, name, description, channel_id, cron_expression, started)
                 VALUES (?, ?, 'raw', '1', ?, 1)",
            )
            .unwrap();
        stmt.bind((1, guild_id)).unwrap();
        stmt.bind((2, name)).unwrap();
        stmt.bind((3, cron)).unwrap();
        stmt.next().unwrap();
    }
}

fn migrate(conn: &Connection) -> Result<()> {
    let current = schema_version(conn)?;
    for (version, migration) in MIGRATIONS.iter().enumerate().skip(current) {
        let next = version + 1;
        conn.execute(format!(
            "BEGIN; {migration} PRAGMA user_version = {next}; COMMIT;"
        ))?;
        info!("Applied database migration v{next}");
    }
    Ok(())
}

fn schema_version(conn: &Connection) -> Result<usize> {
    let mut stmt = conn.prepare("PRAGMA user_version")?;
    let version = match stmt.next()? {
        State::Row => stmt.read::<i64, _>(0)?,
        State::Done => 0,
    };
    Ok(usize::try_from(version).unwrap_or(0))
}

fn is_unique_violation(err: &sqlite::Error) -> bool {
    err.code == Some(SQLITE_CONSTRAINT)
        || err
            .message
            .as_deref()
            .is_some_and(|m| m.contains("UNIQUE constraint failed"))
}

/// Row id of the last successful INSERT on this connection
fn last_insert_id(conn: &Connection) -> std::result::Result<i64, sqlite::Error> {
    let mut stmt = conn.prepare("SELECT last_insert_rowid()")?;
    stmt.next()?;
    stmt.read::<i64, _>(0)
}

/// Run `work` inside BEGIN/COMMIT, rolling back when it fails
fn in_transaction<T, E>(
    conn: &Connection,
    work: impl FnOnce(&Connection) -> std::result::Result<T, E>,
) -> std::result::Result<T, E>
where
    E: From<sqlite::Error>,
{
    conn.execute("BEGIN")?;
    match work(conn) {
        Ok(value) => {
            conn.execute("COMMIT")?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = conn.execute("ROLLBACK") {
                warn!("Rollback failed: {rollback}");
            }
            Err(e)
        }
    }
}

/// Clamp a row limit into SQLite's integer range
fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reopen_keeps_schema_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bot.db");
        let path = path.to_str().unwrap();

        drop(Database::new(path).await.unwrap());
        let db = Database::new(path).await.unwrap();

        let conn = db.connection.lock().await;
        assert_eq!(schema_version(&conn).unwrap(), MIGRATIONS.len());
    }

    #[tokio::test]
    async fn test_v1_rows_survive_default_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.db");
        let path = path.to_str().unwrap();

        // A database last opened by a build that only knew the first migration
        {
            let conn = sqlite::open(path).unwrap();
            conn.execute(format!("{} PRAGMA user_version = 1;", MIGRATIONS[0]))
                .unwrap();
            conn.execute(
                "INSERT INTO reminders (guild_id, name, description, channel_id, cron_expression, started)
                 VALUES ('G1', 'paused', 'old', '1', '0 9 * * 1', 0)",
            )
            .unwrap();
        }

        let db = Database::new(path).await.unwrap();
        let conn = db.connection.lock().await;
        let mut stmt = conn
            .prepare("SELECT started FROM reminders WHERE name = 'paused'")
            .unwrap();
        assert_eq!(stmt.next().unwrap(), State::Row);
        assert_eq!(stmt.read::<i64, _>(0).unwrap(), 0);
        drop(stmt);

        conn.execute(
            "INSERT INTO reminders (guild_id, name, description, channel_id, cron_expression)
             VALUES ('G1', 'fresh', 'new', '1', '0 9 * * 1')",
        )
        .unwrap();
        let mut stmt = conn
            .prepare("SELECT started FROM reminders WHERE name = 'fresh'")
            .unwrap();
        assert_eq!(stmt.next().unwrap(), State::Row);
        assert_eq!(stmt.read::<i64, _>(0).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failed_transaction_rolls_back() {
        let db = Database::new(":memory:").await.unwrap();
        let conn = db.connection.lock().await;

        let result: std::result::Result<(), ReminderError> = in_transaction(&conn, |conn| {
            conn.execute(
                "INSERT INTO skyhooks (guild_id, system, moon_type, due_at)
                 VALUES ('G1', 'J115405', 'Lava', '2030-01-01T00:00:00Z')",
            )?;
            conn.execute("INSERT INTO no_such_table VALUES (1)")?;
            Ok(())
        });
        assert!(result.is_err());

        let mut stmt = conn.prepare("SELECT COUNT(*) FROM skyhooks").unwrap();
        stmt.next().unwrap();
        assert_eq!(stmt.read::<i64, _>(0).unwrap(), 0);
    }
}
