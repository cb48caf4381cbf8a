//! # Reminder Job Registry
//!
//! In-memory table of armed reminder timers, keyed by guild and reminder name.
//! The registry is the single source of truth for whether a reminder's timer
//! is currently running. Only [`ReminderManager`](super::ReminderManager)
//! mutates it, so store rows and live jobs move together.
//!
//! - **Version**: 1.2.0
//! - **Since**: 2.0.0
//!
//! ## Changelog
//! - 1.2.0: Key jobs by (guild, name) so guilds can reuse reminder names
//! - 1.1.0: Fire callbacks run in their own task; stopping never cuts a send short
//! - 1.0.0: Initial registry

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use dashmap::DashMap;
use log::{debug, info, warn};
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use super::error::Result;
use super::schedule::ReminderSchedule;

/// Registry key: reminder names are unique per guild, not globally
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReminderKey {
    pub guild_id: String,
    pub name: String,
}

impl ReminderKey {
    pub fn new(guild_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            guild_id: guild_id.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ReminderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.guild_id, self.name)
    }
}

/// Whether a registered job's timer is armed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Stopped,
    Running,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Stopped => write!(f, "Stopped"),
            JobState::Running => write!(f, "Running"),
        }
    }
}

/// Work performed each time a job's schedule comes due.
///
/// Implementations must handle their own failures; nothing a callback does
/// can unregister or stop the job that invoked it.
#[async_trait]
pub trait JobAction: Send + Sync {
    async fn fire(&self);
}

struct ScheduledJob {
    schedule: ReminderSchedule,
    action: Arc<dyn JobAction>,
    task: Option<JoinHandle<()>>,
}

impl ScheduledJob {
    fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Process-wide map from reminder key to its job handle
pub struct JobRegistry {
    jobs: DashMap<ReminderKey, ScheduledJob>,
    timezone: Tz,
}

impl JobRegistry {
    /// Create an empty registry evaluating schedules in `timezone`
    pub fn new(timezone: Tz) -> Self {
        Self {
            jobs: DashMap::new(),
            timezone,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Create a job for `key`, armed only when `start` is true.
    ///
    /// An existing entry under the same key is disarmed and replaced.
    pub(crate) fn register(
        &self,
        key: ReminderKey,
        expression: &str,
        action: Arc<dyn JobAction>,
        start: bool,
    ) -> Result<()> {
        let schedule = ReminderSchedule::parse(expression)?;

        let task = if start {
            Some(spawn_job(
                key.clone(),
                schedule.clone(),
                self.timezone,
                Arc::clone(&action),
            ))
        } else {
            None
        };

        let job = ScheduledJob {
            schedule,
            action,
            task,
        };

        if let Some(mut previous) = self.jobs.insert(key.clone(), job) {
            warn!("Replaced existing job for reminder {key}");
            previous.disarm();
        }

        info!(
            "Registered reminder job {key} ({})",
            if start { "running" } else { "stopped" }
        );
        Ok(())
    }

    /// Arm the job for `key`. Returns false when no such job is registered.
    pub(crate) fn start(&self, key: &ReminderKey) -> bool {
        let Some(mut job) = self.jobs.get_mut(key) else {
            warn!("Cannot start reminder {key}: no job registered");
            return false;
        };

        if job.is_running() {
            debug!("Reminder {key} is already running");
            return true;
        }

        let task = spawn_job(
            key.clone(),
            job.schedule.clone(),
            self.timezone,
            Arc::clone(&job.action),
        );
        job.task = Some(task);
        info!("Started reminder job {key}");
        true
    }

    /// Disarm the job for `key`. Returns false when no such job is registered.
    pub(crate) fn stop(&self, key: &ReminderKey) -> bool {
        let Some(mut job) = self.jobs.get_mut(key) else {
            warn!("Cannot stop reminder {key}: no job registered");
            return false;
        };

        job.disarm();
        info!("Stopped reminder job {key}");
        true
    }

    /// Disarm and forget the job for `key`. Returns false when nothing was registered.
    pub(crate) fn remove(&self, key: &ReminderKey) -> bool {
        match self.jobs.remove(key) {
            Some((_, mut job)) => {
                job.disarm();
                info!("Removed reminder job {key}");
                true
            }
            None => {
                debug!("Remove for unknown reminder {key} ignored");
                false
            }
        }
    }

    /// Current state of `key`, or None when it is not registered
    pub fn state(&self, key: &ReminderKey) -> Option<JobState> {
        self.jobs.get(key).map(|job| {
            if job.is_running() {
                JobState::Running
            } else {
                JobState::Stopped
            }
        })
    }

    /// Number of registered jobs
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Disarm every job; used at process exit
    pub fn shutdown(&self) {
        for mut job in self.jobs.iter_mut() {
            job.disarm();
        }
        info!("Reminder registry shut down ({} jobs)", self.jobs.len());
    }
}

async fn wait_until(datetime: DateTime<Utc>) {
    // to_std fails for negative durations, in which case the time has passed
    if let Ok(remaining) = datetime.signed_duration_since(Utc::now()).to_std() {
        sleep(remaining).await;
    }
}

fn spawn_job(
    key: ReminderKey,
    schedule: ReminderSchedule,
    timezone: Tz,
    action: Arc<dyn JobAction>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut from = Utc::now();
        loop {
            let Some(next) = schedule.next_after(from, timezone) else {
                info!("Reminder {key} has no further occurrences");
                break;
            };
            let next = next.with_timezone(&Utc);
            debug!("Reminder {key} next fires at {next}");

            wait_until(next).await;

            let action = Arc::clone(&action);
            tokio::spawn(async move {
                action.fire().await;
            });

            from = next.max(Utc::now());
        }
    })
}
