use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::Utc;
use log::info;
use uuid::Uuid;

use crate::{
    error::AppError,
    middleware::Session,
    models::{get_all_permissions, Permission, UpdatePermissions},
    services::permissions::{grant_permissions, resolve_effective_permissions, EffectivePermissions},
    state::AppState,
};

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidInput(format!("malformed id: {}", raw)))
}

/// Effective permissions of the signed-in user.
pub async fn my_permissions(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<EffectivePermissions>, AppError> {
    let user_id = session.user_id()?;
    let resolved = resolve_effective_permissions(state.store.as_ref(), user_id).await?;
    Ok(Json(resolved))
}

pub async fn catalog(_session: Session) -> Json<&'static [Permission]> {
    Json(get_all_permissions())
}

pub async fn employee_permissions(
    State(state): State<AppState>,
    session: Session,
    Path(employee_id): Path<String>,
) -> Result<Json<EffectivePermissions>, AppError> {
    session.require_admin()?;
    let employee_id = parse_id(&employee_id)?;
    let resolved = resolve_effective_permissions(state.store.as_ref(), employee_id).await?;
    Ok(Json(resolved))
}

pub async fn update_employee_permissions(
    State(state): State<AppState>,
    session: Session,
    Path(employee_id): Path<String>,
    Json(form): Json<UpdatePermissions>,
) -> Result<Json<EffectivePermissions>, AppError> {
    let admin_id = session.require_admin()?;
    let employee_id = parse_id(&employee_id)?;

    let resolved = grant_permissions(
        state.store.as_ref(),
        employee_id,
        form.permissions,
        admin_id,
        Utc::now(),
    )
    .await?;

    info!(
        "admin {} set {} permissions for {}",
        admin_id,
        resolved.permissions.len(),
        employee_id
    );
    Ok(Json(resolved))
}
