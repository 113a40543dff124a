//! Retention cleanup.
//!
//! Three record kinds expire after fixed windows and are deleted for good.
//! Each kind runs on its own: a failing kind is reported next to the counts
//! of the kinds that succeeded.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Duration as Days, Utc};
use log::{debug, error, info, warn};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::store::{Store, StoreResult};

pub const MEETING_RETENTION_DAYS: i64 = 1;
pub const COMPLETED_TASK_RETENTION_DAYS: i64 = 30;
pub const DAILY_UPDATE_RETENTION_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordKind {
    Meetings,
    CompletedTasks,
    DailyUpdates,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Meetings => "meetings",
            RecordKind::CompletedTasks => "completed tasks",
            RecordKind::DailyUpdates => "daily updates",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupCounts {
    pub deleted_meetings: u64,
    pub deleted_completed_tasks: u64,
    pub deleted_old_updates: u64,
}

impl CleanupCounts {
    pub fn total(&self) -> u64 {
        self.deleted_meetings + self.deleted_completed_tasks + self.deleted_old_updates
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct KindFailure {
    pub kind: RecordKind,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct CleanupReport {
    pub counts: CleanupCounts,
    pub failures: Vec<KindFailure>,
}

impl CleanupReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Deletes every record past its retention window as of `now`.
///
/// Meetings carry a date only: a meeting stays through its scheduled day and
/// is eligible from the following midnight. Completed tasks and daily updates
/// compare full timestamps. Incomplete and recurring tasks are never deleted.
/// Each kind gets the full `budget` on its own.
pub async fn run_cleanup(store: &dyn Store, now: DateTime<Utc>, budget: Duration) -> CleanupReport {
    let mut report = CleanupReport::default();

    let meeting_cutoff = now.date_naive() - Days::days(MEETING_RETENTION_DAYS - 1);
    let task_cutoff = now - Days::days(COMPLETED_TASK_RETENTION_DAYS);
    let update_cutoff = now - Days::days(DAILY_UPDATE_RETENTION_DAYS);

    if let Some(n) = attempt(
        &mut report,
        RecordKind::Meetings,
        budget,
        store.delete_meetings_before(meeting_cutoff),
    )
    .await
    {
        report.counts.deleted_meetings = n;
    }

    if let Some(n) = attempt(
        &mut report,
        RecordKind::CompletedTasks,
        budget,
        store.delete_completed_tasks_before(task_cutoff),
    )
    .await
    {
        report.counts.deleted_completed_tasks = n;
    }

    if let Some(n) = attempt(
        &mut report,
        RecordKind::DailyUpdates,
        budget,
        store.delete_daily_updates_before(update_cutoff),
    )
    .await
    {
        report.counts.deleted_old_updates = n;
    }

    if report.is_success() {
        info!(
            "cleanup removed {} meetings, {} completed tasks, {} daily updates",
            report.counts.deleted_meetings,
            report.counts.deleted_completed_tasks,
            report.counts.deleted_old_updates
        );
    } else {
        warn!(
            "cleanup finished with {} failed kinds; partial counts {:?}",
            report.failures.len(),
            report.counts
        );
    }

    report
}

async fn attempt<F>(
    report: &mut CleanupReport,
    kind: RecordKind,
    budget: Duration,
    delete: F,
) -> Option<u64>
where
    F: std::future::Future<Output = StoreResult<u64>>,
{
    let message = match tokio::time::timeout(budget, delete).await {
        Ok(Ok(n)) => return Some(n),
        Ok(Err(e)) => e.to_string(),
        Err(_) => "timed out".to_string(),
    };
    error!("cleanup of {} failed: {}", kind, message);
    report.failures.push(KindFailure { kind, message });
    None
}

/// In-process fallback trigger for the cleanup job.
///
/// Owned by the application state. Only the first call to [`start`] spawns
/// the timer; later calls are no-ops.
///
/// [`start`]: CleanupTimer::start
#[derive(Debug, Default)]
pub struct CleanupTimer {
    started: AtomicBool,
}

impl CleanupTimer {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Runs cleanup immediately and then every `period`.
    pub fn start(
        &self,
        store: Arc<dyn Store>,
        period: Duration,
        budget: Duration,
    ) -> Option<JoinHandle<()>> {
        if self
            .started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("cleanup timer already running");
            return None;
        }

        info!("starting cleanup timer every {}s", period.as_secs());
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                run_cleanup(store.as_ref(), Utc::now(), budget).await;
            }
        }))
    }
}
