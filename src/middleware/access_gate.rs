//! Role router.
//!
//! Every request passes through [`access_gate`] before reaching a handler.
//! The decision itself lives in [`decide`], a pure function of the path and
//! the caller's session state.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use log::debug;
use tower_cookies::Cookies;

use crate::{
    middleware::session::read_session,
    models::Role,
    state::AppState,
};

pub const LOGIN_PATH: &str = "/login";
pub const SIGNUP_PATH: &str = "/signup";
pub const DASHBOARD_ALIAS: &str = "/dashboard";

const AUTH_PROVIDER_PREFIX: &str = "/api/auth";
const ASSET_PREFIXES: &[&str] = &["/static", "/assets"];
const FAVICON: &str = "/favicon.ico";
const STATIC_EXTENSIONS: &[&str] = &[
    "svg", "png", "jpg", "jpeg", "gif", "webp", "ico", "css", "js", "map", "woff", "woff2",
];

const PROTECTED_PREFIXES: &[&str] = &["/admin", "/employee", "/client", "/hackathon"];
/// Hackathon self-registration stays reachable without a session.
const PUBLIC_HACKATHON_PATHS: &[&str] = &["/hackathon/signup", "/hackathon/login"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visitor {
    Anonymous,
    /// Carries `None` when the token names a role this build does not know.
    Authenticated(Option<Role>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Pass,
    Redirect(&'static str),
}

/// `true` when `path` is `prefix` itself or a path below it.
fn is_under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

fn normalize(path: &str) -> &str {
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

fn has_static_extension(path: &str) -> bool {
    let last_segment = path.rsplit('/').next().unwrap_or_default();
    last_segment
        .rsplit_once('.')
        .is_some_and(|(_, ext)| STATIC_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Paths the gate never looks at: the auth provider's own endpoints and
/// static assets.
pub fn is_bypassed(path: &str) -> bool {
    let path = normalize(path);
    is_under(path, AUTH_PROVIDER_PREFIX)
        || ASSET_PREFIXES.iter().any(|prefix| is_under(path, prefix))
        || path == FAVICON
        || has_static_extension(path)
}

fn is_protected(path: &str) -> bool {
    if path == DASHBOARD_ALIAS {
        return true;
    }
    if PUBLIC_HACKATHON_PATHS.iter().any(|public| is_under(path, public)) {
        return false;
    }
    PROTECTED_PREFIXES.iter().any(|prefix| is_under(path, prefix))
}

pub fn decide(path: &str, visitor: Visitor) -> GateDecision {
    let path = normalize(path);
    match visitor {
        Visitor::Authenticated(role) => {
            let lands_on_dashboard =
                path == LOGIN_PATH || path == SIGNUP_PATH || path == DASHBOARD_ALIAS;
            match role {
                Some(role) if lands_on_dashboard => GateDecision::Redirect(role.dashboard_path()),
                _ => GateDecision::Pass,
            }
        }
        Visitor::Anonymous if is_protected(path) => GateDecision::Redirect(LOGIN_PATH),
        Visitor::Anonymous => GateDecision::Pass,
    }
}

pub async fn access_gate(
    State(state): State<AppState>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    if is_bypassed(&path) {
        return next.run(req).await;
    }

    let session = read_session(&state.keys, &cookies, req.headers());
    let visitor = match &session {
        Some(session) => Visitor::Authenticated(session.role()),
        None => Visitor::Anonymous,
    };

    match decide(&path, visitor) {
        GateDecision::Pass => {
            if let Some(session) = session {
                req.extensions_mut().insert(session);
            }
            next.run(req).await
        }
        GateDecision::Redirect(to) => {
            debug!("gate redirecting {} ({:?}) to {}", path, visitor, to);
            Redirect::to(to).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_is_sent_to_login_from_protected_areas() {
        for path in [
            "/admin",
            "/admin/dashboard",
            "/employee/tasks/42",
            "/client/dashboard",
            "/hackathon/dashboard",
            "/dashboard",
            "/dashboard/",
        ] {
            assert_eq!(
                decide(path, Visitor::Anonymous),
                GateDecision::Redirect(LOGIN_PATH),
                "{path}"
            );
        }
    }

    #[test]
    fn hackathon_self_registration_stays_public() {
        for path in ["/hackathon/signup", "/hackathon/login", "/hackathon/signup/step-2"] {
            assert_eq!(decide(path, Visitor::Anonymous), GateDecision::Pass, "{path}");
        }
    }

    #[test]
    fn anonymous_public_pages_pass() {
        for path in ["/", "/login", "/signup", "/about", "/administrator", "/clients-list"] {
            assert_eq!(decide(path, Visitor::Anonymous), GateDecision::Pass, "{path}");
        }
    }

    #[test]
    fn signed_in_users_land_on_their_dashboard() {
        for role in Role::ALL {
            for path in ["/login", "/signup", "/dashboard"] {
                assert_eq!(
                    decide(path, Visitor::Authenticated(Some(role))),
                    GateDecision::Redirect(role.dashboard_path()),
                    "{path} as {role:?}"
                );
            }
        }
    }

    #[test]
    fn signed_in_users_pass_elsewhere() {
        let visitor = Visitor::Authenticated(Some(Role::Employee));
        assert_eq!(decide("/employee/dashboard", visitor), GateDecision::Pass);
        // Cross-role pages are left to the handlers.
        assert_eq!(decide("/admin/dashboard", visitor), GateDecision::Pass);
    }

    #[test]
    fn unknown_role_is_never_redirected() {
        for path in ["/login", "/signup", "/dashboard", "/admin/dashboard"] {
            assert_eq!(decide(path, Visitor::Authenticated(None)), GateDecision::Pass, "{path}");
        }
    }

    #[test]
    fn provider_and_asset_paths_are_bypassed() {
        assert!(is_bypassed("/api/auth/login"));
        assert!(is_bypassed("/api/auth"));
        assert!(is_bypassed("/static/app.css"));
        assert!(is_bypassed("/favicon.ico"));
        assert!(is_bypassed("/admin/logo.PNG"));
        assert!(!is_bypassed("/api/authority"));
        assert!(!is_bypassed("/admin/dashboard"));
        assert!(!is_bypassed("/api/permissions"));
    }
}
