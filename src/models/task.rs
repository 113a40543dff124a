use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use chrono::{DateTime, Datelike, NaiveDate, Utc};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub assigned_to: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub is_recurring: bool,
    pub recurrence: Option<String>,
    /// Day the recurring scheduler last restored this task to pending.
    pub last_reset_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(Recurrence::Daily),
            "weekly" => Some(Recurrence::Weekly),
            "monthly" => Some(Recurrence::Monthly),
            _ => None,
        }
    }

    /// Whether a task last reset on `last_reset` should be reset on `today`.
    /// Never-reset tasks are always due.
    pub fn is_due(self, last_reset: Option<NaiveDate>, today: NaiveDate) -> bool {
        let Some(last) = last_reset else {
            return true;
        };
        if last >= today {
            return false;
        }
        match self {
            Recurrence::Daily => true,
            Recurrence::Weekly => (today - last).num_days() >= 7,
            Recurrence::Monthly => (last.year(), last.month()) < (today.year(), today.month()),
        }
    }
}

#[cfg(test)]
impl Task {
    pub fn recurring(title: &str, recurrence: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            assigned_to: None,
            project_id: None,
            is_completed: false,
            completed_at: None,
            is_recurring: true,
            recurrence: Some(recurrence.to_string()),
            last_reset_date: None,
            created_at: Utc::now(),
        }
    }

    pub fn one_off(title: &str) -> Self {
        Self {
            is_recurring: false,
            recurrence: None,
            ..Self::recurring(title, "daily")
        }
    }

    pub fn completed_at(mut self, at: DateTime<Utc>) -> Self {
        self.is_completed = true;
        self.completed_at = Some(at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn never_reset_is_due() {
        assert!(Recurrence::Weekly.is_due(None, day(2026, 3, 4)));
    }

    #[test]
    fn daily_is_due_once_per_day() {
        let today = day(2026, 3, 4);
        assert!(Recurrence::Daily.is_due(Some(day(2026, 3, 3)), today));
        assert!(!Recurrence::Daily.is_due(Some(today), today));
    }

    #[test]
    fn weekly_waits_seven_days() {
        let today = day(2026, 3, 10);
        assert!(!Recurrence::Weekly.is_due(Some(day(2026, 3, 4)), today));
        assert!(Recurrence::Weekly.is_due(Some(day(2026, 3, 3)), today));
    }

    #[test]
    fn monthly_rolls_over_on_calendar_month() {
        assert!(Recurrence::Monthly.is_due(Some(day(2026, 1, 31)), day(2026, 2, 1)));
        assert!(!Recurrence::Monthly.is_due(Some(day(2026, 2, 1)), day(2026, 2, 28)));
        assert!(Recurrence::Monthly.is_due(Some(day(2025, 12, 15)), day(2026, 1, 2)));
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Recurrence::parse("Weekly"), Some(Recurrence::Weekly));
        assert_eq!(Recurrence::parse("fortnightly"), None);
    }
}
