//! End-to-end reminder lifecycle against a file-backed database

use async_trait::async_trait;
use chrono_tz::Tz;
use milesbot::database::Database;
use milesbot::features::reminders::{
    JobRegistry, JobState, NewReminder, Notification, Notifier, ReminderError, ReminderKey,
    ReminderManager, ReminderStore, TransportError,
};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_notification(&self, notification: &Notification) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

struct Bot {
    database: Database,
    manager: ReminderManager,
}

/// Open the database at `path` and build a fresh manager, as the binary does at boot
async fn boot(path: &str) -> Bot {
    let database = Database::new(path).await.unwrap();
    let manager = ReminderManager::new(
        Arc::new(database.clone()),
        Arc::new(JobRegistry::new(Tz::UTC)),
        Arc::new(RecordingNotifier::default()),
    );
    Bot { database, manager }
}

fn db_path(dir: &TempDir) -> String {
    dir.path().join("milesbot.db").to_str().unwrap().to_string()
}

fn reminder(guild: &str, name: &str, cron: &str, start: bool) -> NewReminder {
    NewReminder {
        guild_id: guild.to_string(),
        name: name.to_string(),
        description: format!("{name} reminder"),
        channel_id: "1324872162259107931".to_string(),
        cron_expression: cron.to_string(),
        reactions: vec!["✅".to_string(), "❌".to_string()],
        ping_role: None,
        start_on_create: start,
    }
}

fn state(bot: &Bot, guild: &str, name: &str) -> Option<JobState> {
    bot.manager.registry().state(&ReminderKey::new(guild, name))
}

#[tokio::test]
async fn standup_stays_stopped_across_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);

    let bot = boot(&path).await;
    bot.manager
        .add(reminder("G1", "standup", "0 9 * * 1-5", true))
        .await
        .unwrap();
    assert_eq!(state(&bot, "G1", "standup"), Some(JobState::Running));

    bot.manager.set_status("G1", "standup", false).await.unwrap();
    let row = bot.database.get_reminder("G1", "standup").await.unwrap().unwrap();
    assert!(!row.enabled);
    assert_eq!(state(&bot, "G1", "standup"), Some(JobState::Stopped));
    bot.manager.registry().shutdown();
    drop(bot);

    let restarted = boot(&path).await;
    restarted.manager.load_all().await.unwrap();
    assert_eq!(state(&restarted, "G1", "standup"), Some(JobState::Stopped));
}

#[tokio::test]
async fn restart_reproduces_running_flags_across_guilds() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);

    let bot = boot(&path).await;
    let cases = [
        ("G1", "session-vote", "0 17 * * 1", true),
        ("G1", "recap", "30 20 * * 4", false),
        ("G2", "session-vote", "0 0 12 * * *", false),
        ("G2", "loot", "*/15 * * * *", true),
    ];
    for (guild, name, cron, start) in cases {
        bot.manager.add(reminder(guild, name, cron, start)).await.unwrap();
    }
    bot.manager.registry().shutdown();
    drop(bot);

    let restarted = boot(&path).await;
    let summary = restarted.manager.load_all().await.unwrap();
    assert_eq!(summary.running, 2);
    assert_eq!(summary.stopped, 2);
    for (guild, name, _, start) in cases {
        let expected = if start { JobState::Running } else { JobState::Stopped };
        assert_eq!(state(&restarted, guild, name), Some(expected), "{guild}/{name}");
    }
    restarted.manager.registry().shutdown();
}

#[tokio::test]
async fn toggling_ends_in_last_requested_state() {
    let dir = tempfile::tempdir().unwrap();
    let bot = boot(&db_path(&dir)).await;
    bot.manager
        .add(reminder("G1", "tick", "* * * * * *", false))
        .await
        .unwrap();

    bot.manager.set_status("G1", "tick", true).await.unwrap();
    // Let it fire at least once while running
    tokio::time::sleep(std::time::Duration::from_millis(1200)).await;
    bot.manager.set_status("G1", "tick", false).await.unwrap();

    assert!(!bot.database.get_reminder("G1", "tick").await.unwrap().unwrap().enabled);
    assert_eq!(state(&bot, "G1", "tick"), Some(JobState::Stopped));
}

#[tokio::test]
async fn delete_removes_row_and_job_and_repeats_are_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let bot = boot(&db_path(&dir)).await;
    bot.manager
        .add(reminder("G1", "standup", "0 9 * * 1-5", true))
        .await
        .unwrap();

    bot.manager.delete("G1", "standup").await.unwrap();
    assert!(bot.database.get_reminder("G1", "standup").await.unwrap().is_none());
    assert_eq!(state(&bot, "G1", "standup"), None);

    assert!(matches!(
        bot.manager.set_status("G1", "standup", true).await,
        Err(ReminderError::NotFound { .. })
    ));
    assert!(matches!(
        bot.manager.delete("G1", "standup").await,
        Err(ReminderError::NotFound { .. })
    ));
    assert!(bot.manager.registry().is_empty());
}

#[tokio::test]
async fn duplicate_add_is_rejected_without_side_effects() {
    let dir = tempfile::tempdir().unwrap();
    let bot = boot(&db_path(&dir)).await;
    let original = bot
        .manager
        .add(reminder("G1", "standup", "0 9 * * 1-5", true))
        .await
        .unwrap();

    let result = bot
        .manager
        .add(reminder("G1", "standup", "0 10 * * *", false))
        .await;
    assert!(matches!(result, Err(ReminderError::Duplicate { .. })));

    assert_eq!(
        bot.database.get_reminder("G1", "standup").await.unwrap(),
        Some(original)
    );
    assert_eq!(state(&bot, "G1", "standup"), Some(JobState::Running));
    assert_eq!(bot.manager.registry().len(), 1);
    bot.manager.registry().shutdown();
}

#[tokio::test]
async fn invalid_cron_is_rejected_before_anything_changes() {
    let dir = tempfile::tempdir().unwrap();
    let bot = boot(&db_path(&dir)).await;

    let result = bot
        .manager
        .add(reminder("G1", "broken", "not-a-cron", true))
        .await;
    assert!(matches!(result, Err(ReminderError::InvalidSchedule { .. })));
    assert!(bot.database.all_reminders().await.unwrap().is_empty());
    assert!(bot.manager.registry().is_empty());
}

#[tokio::test]
async fn malformed_row_does_not_block_other_reminders_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);

    let bot = boot(&path).await;
    bot.manager
        .add(reminder("G1", "standup", "0 9 * * 1-5", true))
        .await
        .unwrap();
    bot.manager
        .add(reminder("G1", "recap", "30 20 * * 4", false))
        .await
        .unwrap();
    bot.manager.registry().shutdown();
    drop(bot);

    // A row written by an older build without schedule validation
    {
        let conn = sqlite::open(&path).unwrap();
        conn.execute(
            "INSERT INTO reminders (guild_id, name, description, channel_id, cron_expression, started)
             VALUES ('G1', 'legacy', 'old', '1', 'every other tuesday', 1)",
        )
        .unwrap();
    }

    let restarted = boot(&path).await;
    let summary = restarted.manager.load_all().await.unwrap();
    assert_eq!(summary.skipped, 1);
    assert_eq!(state(&restarted, "G1", "standup"), Some(JobState::Running));
    assert_eq!(state(&restarted, "G1", "recap"), Some(JobState::Stopped));
    assert_eq!(state(&restarted, "G1", "legacy"), None);

    // Still listed so it can be deleted from Discord
    let listing = restarted.manager.list("G1").await.unwrap();
    let legacy = listing.iter().find(|l| l.reminder.name == "legacy").unwrap();
    assert_eq!(legacy.state, None);
    assert_eq!(legacy.next_run, "Invalid cron");
    restarted.manager.delete("G1", "legacy").await.unwrap();
    restarted.manager.registry().shutdown();
}
