use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::{Store, StoreResult};
use crate::{
    database::Database,
    models::{EmployeePermission, Task, User},
};

#[derive(Clone)]
pub struct PgStore {
    db: Database,
}

impl PgStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE lower(email) = lower($1)")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn find_employee_permission(
        &self,
        employee_id: Uuid,
    ) -> StoreResult<Option<EmployeePermission>> {
        let grant = sqlx::query_as::<_, EmployeePermission>(
            "SELECT * FROM employee_permissions WHERE employee_id = $1",
        )
        .bind(employee_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(grant)
    }

    async fn upsert_employee_permission(
        &self,
        grant: EmployeePermission,
    ) -> StoreResult<EmployeePermission> {
        let saved = sqlx::query_as::<_, EmployeePermission>(
            r#"
            INSERT INTO employee_permissions (employee_id, permissions, granted_by, granted_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (employee_id) DO UPDATE
            SET permissions = EXCLUDED.permissions,
                granted_by = EXCLUDED.granted_by,
                granted_at = EXCLUDED.granted_at
            RETURNING *
            "#,
        )
        .bind(grant.employee_id)
        .bind(&grant.permissions)
        .bind(grant.granted_by)
        .bind(grant.granted_at)
        .fetch_one(&self.db)
        .await?;
        Ok(saved)
    }

    async fn list_recurring_tasks(&self) -> StoreResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE is_recurring = true ORDER BY created_at",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(tasks)
    }

    async fn reset_recurring_task(&self, task_id: Uuid, today: NaiveDate) -> StoreResult<bool> {
        // The date guard makes a second run on the same day a no-op even if
        // two runs race.
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET is_completed = false, completed_at = NULL, last_reset_date = $2
            WHERE id = $1
              AND is_recurring = true
              AND (last_reset_date IS NULL OR last_reset_date < $2)
            "#,
        )
        .bind(task_id)
        .bind(today)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_meetings_before(&self, cutoff: NaiveDate) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM meetings WHERE meeting_date < $1")
            .bind(cutoff)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_completed_tasks_before(&self, cutoff: DateTime<Utc>) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks
            WHERE is_completed = true
              AND is_recurring = false
              AND completed_at IS NOT NULL
              AND completed_at < $1
            "#,
        )
        .bind(cutoff)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_daily_updates_before(&self, cutoff: DateTime<Utc>) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM daily_updates WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected())
    }
}
