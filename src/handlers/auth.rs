use std::sync::OnceLock;

use axum::{
    extract::State,
    response::{IntoResponse, Json, Redirect},
};
use log::info;
use serde::Serialize;
use tower_cookies::{Cookie, Cookies};

use crate::{
    error::AppError,
    middleware::{access_gate::LOGIN_PATH, AUTH_COOKIE},
    models::{LoginRequest, User},
    state::AppState,
    utils::{verify_password, Claims},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub role: String,
    pub is_approved: bool,
    pub profile_completed: bool,
    /// Dashboard for the role; `None` for roles without one.
    pub redirect: Option<&'static str>,
}

pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(form): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = authenticate_user(&state, &form.email, &form.password).await?;

    let claims = Claims::for_user(&user, state.config.session_ttl_hours);
    let token = state
        .keys
        .create_token(&claims)
        .map_err(|e| AppError::Internal(format!("failed to sign session token: {}", e)))?;

    let cookie = Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::hours(state.config.session_ttl_hours))
        .build();
    cookies.add(cookie);

    info!("user {} signed in as {}", user.id, user.role);

    Ok(Json(LoginResponse {
        redirect: user.role().map(|role| role.dashboard_path()),
        role: user.role,
        is_approved: user.is_approved,
        profile_completed: user.profile_completed,
    }))
}

pub async fn logout(cookies: Cookies) -> impl IntoResponse {
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    cookies.remove(cookie);
    Redirect::to(LOGIN_PATH)
}

async fn authenticate_user(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let Some(user) = state.store.find_user_by_email(email.trim()).await? else {
        // Same bcrypt work as a real check so unknown emails are not faster.
        if let Some(hash) = dummy_hash() {
            let _ = verify_password(password, hash);
        }
        return Err(AppError::Unauthorized);
    };

    let valid = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::Internal(format!("password check failed: {}", e)))?;
    if !valid {
        return Err(AppError::Unauthorized);
    }

    Ok(user)
}

#[cfg(not(test))]
const DUMMY_COST: u32 = bcrypt::DEFAULT_COST;
#[cfg(test)]
const DUMMY_COST: u32 = 4;

fn dummy_hash() -> Option<&'static str> {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    DUMMY
        .get_or_init(|| bcrypt::hash("worknest-dummy-password", DUMMY_COST).ok())
        .as_deref()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_hash_is_a_real_bcrypt_hash() {
        let hash = dummy_hash().unwrap();
        assert!(hash.starts_with("$2"));
        assert!(!verify_password("anything", hash).unwrap());
        assert!(verify_password("worknest-dummy-password", hash).unwrap());
    }
}
