use std::time::Duration;

use chrono::NaiveDate;
use log::{info, warn};
use thiserror::Error;
use tokio::time::Instant;

use crate::{
    models::Recurrence,
    store::{Store, StoreError},
};

#[derive(Debug, Error)]
pub enum ResetError {
    #[error("store error after resetting {reset_so_far} tasks: {source}")]
    Store {
        reset_so_far: usize,
        #[source]
        source: StoreError,
    },
    #[error("timed out after resetting {reset_so_far} tasks")]
    TimedOut { reset_so_far: usize },
}

impl ResetError {
    pub fn reset_so_far(&self) -> usize {
        match self {
            ResetError::Store { reset_so_far, .. } | ResetError::TimedOut { reset_so_far } => {
                *reset_so_far
            }
        }
    }
}

/// Restores every due recurring task to pending and returns how many were
/// reset. Tasks already reset on `today` are left alone, so repeated runs on
/// the same day are no-ops. Work done before an error is kept.
pub async fn reset_all_recurring_tasks(
    store: &dyn Store,
    today: NaiveDate,
    budget: Duration,
) -> Result<usize, ResetError> {
    let deadline = Instant::now() + budget;

    let tasks = tokio::time::timeout_at(deadline, store.list_recurring_tasks())
        .await
        .map_err(|_| ResetError::TimedOut { reset_so_far: 0 })?
        .map_err(|source| ResetError::Store { reset_so_far: 0, source })?;

    let mut reset_count = 0;
    for task in tasks {
        let Some(recurrence) = task.recurrence.as_deref().and_then(Recurrence::parse) else {
            warn!(
                "skipping recurring task {} with unknown recurrence {:?}",
                task.id, task.recurrence
            );
            continue;
        };
        if !recurrence.is_due(task.last_reset_date, today) {
            continue;
        }
        if Instant::now() >= deadline {
            return Err(ResetError::TimedOut { reset_so_far: reset_count });
        }

        let changed = store
            .reset_recurring_task(task.id, today)
            .await
            .map_err(|source| ResetError::Store { reset_so_far: reset_count, source })?;
        if changed {
            reset_count += 1;
        }
    }

    info!("reset {} recurring tasks for {}", reset_count, today);
    Ok(reset_count)
}
