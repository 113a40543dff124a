//! Effective permission resolution.
//!
//! Admins always hold the whole catalog. Everyone else holds exactly what
//! their [`EmployeePermission`] grant lists, or nothing when no grant exists.
//! Grantor details are decoration: a grantor that cannot be loaded turns into
//! `granted_by: None` and never fails the call.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{all_permission_keys, is_known_permission, EmployeePermission, User},
    store::{Store, StoreError},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grantor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for Grantor {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user
                .name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            email: user.email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectivePermissions {
    pub permissions: BTreeSet<String>,
    pub is_admin: bool,
    pub granted_by: Option<Grantor>,
    pub granted_at: Option<DateTime<Utc>>,
}

impl EffectivePermissions {
    fn admin() -> Self {
        Self {
            permissions: all_permission_keys().into_iter().collect(),
            is_admin: true,
            granted_by: None,
            granted_at: None,
        }
    }

    fn none() -> Self {
        Self {
            permissions: BTreeSet::new(),
            is_admin: false,
            granted_by: None,
            granted_at: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum PermissionError {
    #[error("user {0} not found")]
    UserNotFound(Uuid),
    #[error("unknown permission: {0}")]
    UnknownPermission(String),
    #[error("admins cannot receive granular permissions")]
    AdminTarget,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<PermissionError> for AppError {
    fn from(e: PermissionError) -> Self {
        let message = e.to_string();
        match e {
            PermissionError::UserNotFound(_) => AppError::NotFound(message),
            PermissionError::UnknownPermission(_) | PermissionError::AdminTarget => {
                AppError::InvalidInput(message)
            }
            PermissionError::Store(e) => e.into(),
        }
    }
}

pub async fn resolve_effective_permissions(
    store: &dyn Store,
    user_id: Uuid,
) -> Result<EffectivePermissions, PermissionError> {
    let user = store
        .find_user(user_id)
        .await?
        .ok_or(PermissionError::UserNotFound(user_id))?;

    if user.is_admin() {
        return Ok(EffectivePermissions::admin());
    }

    let Some(grant) = store.find_employee_permission(user_id).await? else {
        return Ok(EffectivePermissions::none());
    };

    let granted_by = match grant.granted_by {
        Some(grantor_id) => load_grantor(store, grantor_id).await,
        None => None,
    };

    Ok(EffectivePermissions {
        permissions: grant.permissions.0.into_iter().collect(),
        is_admin: false,
        granted_by,
        granted_at: Some(grant.granted_at),
    })
}

async fn load_grantor(store: &dyn Store, grantor_id: Uuid) -> Option<Grantor> {
    match store.find_user(grantor_id).await {
        Ok(Some(user)) => Some(Grantor::from(user)),
        Ok(None) => {
            debug!("grantor {} no longer exists", grantor_id);
            None
        }
        Err(e) => {
            warn!("failed to load grantor {}: {}", grantor_id, e);
            None
        }
    }
}

/// Replaces an employee's grant. Unknown keys are rejected before anything is
/// written; duplicates collapse.
pub async fn grant_permissions(
    store: &dyn Store,
    employee_id: Uuid,
    permissions: Vec<String>,
    granted_by: Uuid,
    now: DateTime<Utc>,
) -> Result<EffectivePermissions, PermissionError> {
    if let Some(unknown) = permissions.iter().find(|p| !is_known_permission(p)) {
        return Err(PermissionError::UnknownPermission(unknown.clone()));
    }

    let employee = store
        .find_user(employee_id)
        .await?
        .ok_or(PermissionError::UserNotFound(employee_id))?;
    if employee.is_admin() {
        return Err(PermissionError::AdminTarget);
    }

    let permissions: BTreeSet<String> = permissions.into_iter().collect();
    store
        .upsert_employee_permission(EmployeePermission {
            employee_id,
            permissions: sqlx::types::Json(permissions.into_iter().collect()),
            granted_by: Some(granted_by),
            granted_at: now,
        })
        .await?;

    resolve_effective_permissions(store, employee_id).await
}
