use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// Granular grant for a single non-admin user. At most one per employee.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployeePermission {
    pub employee_id: Uuid,
    pub permissions: sqlx::types::Json<Vec<String>>,
    pub granted_by: Option<Uuid>,
    pub granted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePermissions {
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Permission {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
}

const CATALOG: &[Permission] = &[
    // Team Management
    Permission {
        key: "employees:read",
        name: "View Employees",
        description: "View employee profiles and approval status",
        category: "Team Management",
    },
    Permission {
        key: "employees:write",
        name: "Manage Employees",
        description: "Approve, reject and edit employee accounts",
        category: "Team Management",
    },
    // Projects & Tasks
    Permission {
        key: "projects:read",
        name: "View Projects",
        description: "View projects and their members",
        category: "Projects & Tasks",
    },
    Permission {
        key: "projects:write",
        name: "Manage Projects",
        description: "Create and edit projects",
        category: "Projects & Tasks",
    },
    Permission {
        key: "tasks:read",
        name: "View Tasks",
        description: "View tasks assigned across the team",
        category: "Projects & Tasks",
    },
    Permission {
        key: "tasks:write",
        name: "Manage Tasks",
        description: "Create, assign and edit tasks, including recurring ones",
        category: "Projects & Tasks",
    },
    // Attendance
    Permission {
        key: "attendance:read",
        name: "View Attendance",
        description: "View attendance records for the team",
        category: "Attendance",
    },
    Permission {
        key: "attendance:write",
        name: "Manage Attendance",
        description: "Correct and approve attendance records",
        category: "Attendance",
    },
    // Communication
    Permission {
        key: "meetings:write",
        name: "Schedule Meetings",
        description: "Create and cancel team meetings",
        category: "Communication",
    },
    Permission {
        key: "daily_updates:read",
        name: "View Daily Updates",
        description: "Read the daily updates posted by other employees",
        category: "Communication",
    },
    // Clients
    Permission {
        key: "clients:read",
        name: "View Clients",
        description: "View client accounts and their projects",
        category: "Clients",
    },
    Permission {
        key: "clients:write",
        name: "Manage Clients",
        description: "Approve and edit client accounts",
        category: "Clients",
    },
    // Hackathons
    Permission {
        key: "hackathons:write",
        name: "Manage Hackathons",
        description: "Create hackathons and review participants",
        category: "Hackathons",
    },
    // Reports
    Permission {
        key: "reports:read",
        name: "View Reports",
        description: "View attendance and productivity reports",
        category: "Reports",
    },
];

pub fn get_all_permissions() -> &'static [Permission] {
    CATALOG
}

pub fn all_permission_keys() -> Vec<String> {
    CATALOG.iter().map(|p| p.key.to_string()).collect()
}

pub fn is_known_permission(key: &str) -> bool {
    CATALOG.iter().any(|p| p.key == key)
}
