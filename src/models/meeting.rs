//! Retention-eligible rows. The Postgres store deletes them by SQL alone, so
//! only the in-memory store materialises them.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};

/// Meetings are stored with a calendar date only, no time of day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meeting {
    pub id: Uuid,
    pub title: String,
    pub meeting_date: NaiveDate,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyUpdate {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
impl Meeting {
    pub fn on(meeting_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "Standup".to_string(),
            meeting_date,
            created_by: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
impl DailyUpdate {
    pub fn at(created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            content: "Worked on the release".to_string(),
            created_at,
        }
    }
}
