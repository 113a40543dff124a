use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// The closed set of account roles. Every role owns exactly one dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
    Client,
    Hackathon,
}

impl Role {
    #[cfg(test)]
    pub const ALL: [Role; 4] = [Role::Admin, Role::Employee, Role::Client, Role::Hackathon];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Role::Admin),
            "employee" => Some(Role::Employee),
            "client" => Some(Role::Client),
            "hackathon" => Some(Role::Hackathon),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
            Role::Client => "client",
            Role::Hackathon => "hackathon",
        }
    }

    pub fn dashboard_path(self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Employee => "/employee/dashboard",
            Role::Client => "/client/dashboard",
            Role::Hackathon => "/hackathon/dashboard",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub password_hash: String,
    /// Raw role column; see [`User::role`].
    pub role: String,
    pub is_approved: bool,
    pub profile_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// `None` when the stored role is not one this build knows about.
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[cfg(test)]
impl User {
    pub fn fixture(name: &str, email: &str, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: Some(name.to_string()),
            email: email.to_string(),
            password_hash: String::new(),
            role: role.as_str().to_string(),
            is_approved: true,
            profile_completed: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_round_trip_through_parse() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse("Admin"), None);
    }

    #[test]
    fn every_role_has_its_own_dashboard() {
        assert_eq!(Role::Admin.dashboard_path(), "/admin/dashboard");
        assert_eq!(Role::Employee.dashboard_path(), "/employee/dashboard");
        assert_eq!(Role::Client.dashboard_path(), "/client/dashboard");
        assert_eq!(Role::Hackathon.dashboard_path(), "/hackathon/dashboard");
    }
}
