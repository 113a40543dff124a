use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use log::debug;
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::Role,
    utils::{parse_user_id, Claims, JwtKeys},
};

pub const AUTH_COOKIE: &str = "auth_token";

/// A verified session token. Placed in request extensions by the access gate.
#[derive(Debug, Clone)]
pub struct Session {
    pub claims: Claims,
}

impl Session {
    /// `None` for roles this build does not know.
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.claims.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    pub fn user_id(&self) -> Result<Uuid, AppError> {
        parse_user_id(&self.claims)
            .ok_or_else(|| AppError::InvalidInput("malformed user id in session".to_string()))
    }

    pub fn require_admin(&self) -> Result<Uuid, AppError> {
        if !self.is_admin() {
            return Err(AppError::Forbidden("admin role required".to_string()));
        }
        self.user_id()
    }
}

/// Reads the session token from the `auth_token` cookie, falling back to an
/// `Authorization: Bearer` header. Any verification failure counts as no
/// session.
pub fn read_session(keys: &JwtKeys, cookies: &Cookies, headers: &HeaderMap) -> Option<Session> {
    let token = cookies
        .get(AUTH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| bearer_token(headers).map(str::to_string))?;

    match keys.verify_token(&token) {
        Ok(claims) => Some(Session { claims }),
        Err(e) => {
            debug!("rejecting session token: {}", e);
            None
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}
