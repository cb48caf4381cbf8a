//! Periodic sweep of expired skyhook timers
//!
//! Runs on its own [`JobRegistry`] evaluated in UTC, separate from guild
//! reminders, so it never shows up in reminder listings or counts.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::{debug, error, info};
use std::sync::Arc;

use super::error::Result;
use crate::database::Database;
use crate::features::reminders::{JobAction, JobRegistry, ReminderError, ReminderKey};

/// Every six hours, on the hour
pub const CLEANUP_SCHEDULE: &str = "0 */6 * * *";

/// Timers stay listed in the database this long after coming due
pub const EXPIRY_GRACE_HOURS: i64 = 5;

/// Registry key of the sweep job
pub const CLEANUP_KEY: (&str, &str) = ("maintenance", "skyhook-cleanup");

struct SkyhookCleanup {
    database: Database,
}

#[async_trait]
impl JobAction for SkyhookCleanup {
    async fn fire(&self) {
        match run_cleanup(&self.database, Utc::now()).await {
            Ok(0) => debug!("Skyhook cleanup found nothing to remove"),
            Ok(removed) => info!("🧹 Removed {removed} expired skyhook timers"),
            Err(e) => error!("Skyhook cleanup failed: {e}"),
        }
    }
}

/// Delete timers that came due at least [`EXPIRY_GRACE_HOURS`] before `now`
pub async fn run_cleanup(database: &Database, now: DateTime<Utc>) -> Result<usize> {
    database
        .delete_skyhooks_due_before(now - Duration::hours(EXPIRY_GRACE_HOURS))
        .await
}

/// Arm the sweep on `registry`
pub fn start_cleanup_job(registry: &JobRegistry, database: Database) -> std::result::Result<(), ReminderError> {
    let (scope, name) = CLEANUP_KEY;
    registry.register(
        ReminderKey::new(scope, name),
        CLEANUP_SCHEDULE,
        Arc::new(SkyhookCleanup { database }),
        true,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reminders::JobState;
    use crate::features::skyhooks::model::{MoonType, NewSkyhook};
    use chrono_tz::Tz;

    fn timer(system: &str, due_at: DateTime<Utc>) -> NewSkyhook {
        NewSkyhook {
            guild_id: "G1".to_string(),
            system: system.to_string(),
            moon_type: MoonType::Lava,
            due_at,
        }
    }

    #[tokio::test]
    async fn test_sweep_keeps_recent_timers() {
        let db = Database::new(":memory:").await.unwrap();
        let now = Utc::now();
        db.insert_skyhook(&timer("STALE", now - Duration::hours(6))).await.unwrap();
        db.insert_skyhook(&timer("JUST-DUE", now - Duration::hours(1))).await.unwrap();
        db.insert_skyhook(&timer("AHEAD", now + Duration::hours(1))).await.unwrap();

        SkyhookCleanup { database: db.clone() }.fire().await;

        let left = db
            .upcoming_skyhooks("G1", now - Duration::hours(24), 10)
            .await
            .unwrap();
        let systems: Vec<&str> = left.iter().map(|s| s.system.as_str()).collect();
        assert_eq!(systems, vec!["JUST-DUE", "AHEAD"]);
        assert_eq!(run_cleanup(&db, now + Duration::hours(7)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_sweep_job_is_armed() {
        let db = Database::new(":memory:").await.unwrap();
        let registry = JobRegistry::new(Tz::UTC);

        start_cleanup_job(&registry, db).unwrap();
        let (scope, name) = CLEANUP_KEY;
        assert_eq!(
            registry.state(&ReminderKey::new(scope, name)),
            Some(JobState::Running)
        );
        registry.shutdown();
    }
}
