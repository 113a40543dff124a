//! Data access for the access-control and batch-job core.
//!
//! Request handlers and jobs only talk to [`Store`]; [`PgStore`] is the
//! production backend.

pub mod postgres;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{EmployeePermission, Task, User};

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[cfg(test)]
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_employee_permission(
        &self,
        employee_id: Uuid,
    ) -> StoreResult<Option<EmployeePermission>>;

    /// Replaces the grant for `employee_id`, creating it if absent.
    async fn upsert_employee_permission(
        &self,
        grant: EmployeePermission,
    ) -> StoreResult<EmployeePermission>;

    async fn list_recurring_tasks(&self) -> StoreResult<Vec<Task>>;

    /// Restores the task to pending and stamps `today` as its reset day,
    /// unless it was already reset on or after `today`. Returns whether the
    /// row was changed.
    async fn reset_recurring_task(&self, task_id: Uuid, today: NaiveDate) -> StoreResult<bool>;

    /// Deletes meetings dated strictly before `cutoff`.
    async fn delete_meetings_before(&self, cutoff: NaiveDate) -> StoreResult<u64>;

    /// Deletes completed, non-recurring tasks completed strictly before `cutoff`.
    async fn delete_completed_tasks_before(&self, cutoff: DateTime<Utc>) -> StoreResult<u64>;

    async fn delete_daily_updates_before(&self, cutoff: DateTime<Utc>) -> StoreResult<u64>;
}
