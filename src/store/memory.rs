use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::{DailyUpdate, EmployeePermission, Meeting, Task, User};

/// Operations that can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    UserLookup(Uuid),
    ResetTask,
    Meetings,
    CompletedTasks,
    DailyUpdates,
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    grants: HashMap<Uuid, EmployeePermission>,
    tasks: Vec<Task>,
    meetings: Vec<Meeting>,
    daily_updates: Vec<DailyUpdate>,
    faults: HashSet<Fault>,
    meeting_delay: Option<Duration>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory store poisoned")
    }

    fn check(&self, fault: Fault) -> StoreResult<()> {
        if self.lock().faults.contains(&fault) {
            return Err(StoreError::Unavailable(format!("{fault:?}")));
        }
        Ok(())
    }

    pub fn fail(&self, fault: Fault) {
        self.lock().faults.insert(fault);
    }

    /// Makes meeting deletion take `delay` before touching any rows.
    pub fn stall_meetings(&self, delay: Duration) {
        self.lock().meeting_delay = Some(delay);
    }

    pub fn insert_user(&self, user: User) -> Uuid {
        let id = user.id;
        self.lock().users.insert(id, user);
        id
    }

    pub fn insert_grant(&self, grant: EmployeePermission) {
        self.lock().grants.insert(grant.employee_id, grant);
    }

    pub fn insert_task(&self, task: Task) -> Uuid {
        let id = task.id;
        self.lock().tasks.push(task);
        id
    }

    pub fn insert_meeting(&self, meeting: Meeting) -> Uuid {
        let id = meeting.id;
        self.lock().meetings.push(meeting);
        id
    }

    pub fn insert_daily_update(&self, update: DailyUpdate) -> Uuid {
        let id = update.id;
        self.lock().daily_updates.push(update);
        id
    }

    pub fn task(&self, id: Uuid) -> Option<Task> {
        self.lock().tasks.iter().find(|t| t.id == id).cloned()
    }

    pub fn complete_task(&self, id: Uuid, at: DateTime<Utc>) {
        if let Some(task) = self.lock().tasks.iter_mut().find(|t| t.id == id) {
            task.is_completed = true;
            task.completed_at = Some(at);
        }
    }

    pub fn meeting_ids(&self) -> Vec<Uuid> {
        self.lock().meetings.iter().map(|m| m.id).collect()
    }

    pub fn task_ids(&self) -> Vec<Uuid> {
        self.lock().tasks.iter().map(|t| t.id).collect()
    }

    pub fn daily_update_ids(&self) -> Vec<Uuid> {
        self.lock().daily_updates.iter().map(|u| u.id).collect()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        self.check(Fault::UserLookup(id))?;
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_employee_permission(
        &self,
        employee_id: Uuid,
    ) -> StoreResult<Option<EmployeePermission>> {
        Ok(self.lock().grants.get(&employee_id).cloned())
    }

    async fn upsert_employee_permission(
        &self,
        grant: EmployeePermission,
    ) -> StoreResult<EmployeePermission> {
        self.lock().grants.insert(grant.employee_id, grant.clone());
        Ok(grant)
    }

    async fn list_recurring_tasks(&self) -> StoreResult<Vec<Task>> {
        Ok(self.lock().tasks.iter().filter(|t| t.is_recurring).cloned().collect())
    }

    async fn reset_recurring_task(&self, task_id: Uuid, today: NaiveDate) -> StoreResult<bool> {
        self.check(Fault::ResetTask)?;
        let mut tables = self.lock();
        let Some(task) = tables.tasks.iter_mut().find(|t| t.id == task_id && t.is_recurring) else {
            return Ok(false);
        };
        if task.last_reset_date.is_some_and(|last| last >= today) {
            return Ok(false);
        }
        task.is_completed = false;
        task.completed_at = None;
        task.last_reset_date = Some(today);
        Ok(true)
    }

    async fn delete_meetings_before(&self, cutoff: NaiveDate) -> StoreResult<u64> {
        self.check(Fault::Meetings)?;
        let delay = self.lock().meeting_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut tables = self.lock();
        let before = tables.meetings.len();
        tables.meetings.retain(|m| m.meeting_date >= cutoff);
        Ok((before - tables.meetings.len()) as u64)
    }

    async fn delete_completed_tasks_before(&self, cutoff: DateTime<Utc>) -> StoreResult<u64> {
        self.check(Fault::CompletedTasks)?;
        let mut tables = self.lock();
        let before = tables.tasks.len();
        tables.tasks.retain(|t| {
            let expired = t.is_completed
                && !t.is_recurring
                && t.completed_at.is_some_and(|at| at < cutoff);
            !expired
        });
        Ok((before - tables.tasks.len()) as u64)
    }

    async fn delete_daily_updates_before(&self, cutoff: DateTime<Utc>) -> StoreResult<u64> {
        self.check(Fault::DailyUpdates)?;
        let mut tables = self.lock();
        let before = tables.daily_updates.len();
        tables.daily_updates.retain(|u| u.created_at >= cutoff);
        Ok((before - tables.daily_updates.len()) as u64)
    }
}
