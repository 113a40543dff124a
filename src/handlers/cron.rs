//! Triggers for the batch jobs, called by an external scheduler.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::Utc;
use log::{error, info, warn};
use serde_json::json;
use subtle::ConstantTimeEq;

use crate::{
    config::Config,
    error::AppError,
    services::{cleanup::run_cleanup, recurring_tasks::reset_all_recurring_tasks},
    state::AppState,
};

/// Set to `1` by the trusted internal scheduler.
pub const SCHEDULER_MARKER_HEADER: &str = "x-internal-scheduler";

fn bearer_matches(config: &Config, bearer: Option<&TypedHeader<Authorization<Bearer>>>) -> bool {
    match (&config.cron_secret, bearer) {
        (Some(secret), Some(TypedHeader(Authorization(bearer)))) => {
            bool::from(bearer.token().as_bytes().ct_eq(secret.as_bytes()))
        }
        _ => false,
    }
}

fn marker_present(headers: &HeaderMap) -> bool {
    headers
        .get(SCHEDULER_MARKER_HEADER)
        .is_some_and(|value| value.as_bytes() == b"1")
}

pub async fn reset_recurring_tasks(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if !bearer_matches(&state.config, bearer.as_ref()) && !marker_present(&headers) {
        warn!("rejected recurring task reset trigger");
        return Err(AppError::Unauthorized);
    }

    let today = Utc::now().date_naive();
    match reset_all_recurring_tasks(state.store.as_ref(), today, state.config.job_timeout).await {
        Ok(reset_count) => {
            let body = json!({
                "success": true,
                "resetCount": reset_count,
                "message": format!("Reset {} recurring tasks", reset_count),
                "timestamp": Utc::now().to_rfc3339(),
            });
            Ok((StatusCode::OK, Json(body)).into_response())
        }
        Err(e) => {
            error!("recurring task reset failed: {}", e);
            // Tasks reset before the failure stay reset.
            let body = json!({
                "error": "Failed to reset recurring tasks",
                "details": e.to_string(),
                "resetCount": e.reset_so_far(),
                "timestamp": Utc::now().to_rfc3339(),
            });
            Ok((StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response())
        }
    }
}

pub async fn cleanup(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Response, AppError> {
    if !bearer_matches(&state.config, bearer.as_ref()) {
        warn!("rejected cleanup trigger");
        return Err(AppError::Unauthorized);
    }

    let report = run_cleanup(state.store.as_ref(), Utc::now(), state.config.job_timeout).await;

    if report.is_success() {
        info!("cleanup trigger removed {} records", report.counts.total());
        let body = json!({
            "success": true,
            "message": "Cleanup completed successfully",
            "results": report.counts,
        });
        return Ok((StatusCode::OK, Json(body)).into_response());
    }

    error!("cleanup trigger finished with errors: {:?}", report.failures);
    let body = json!({
        "success": false,
        "message": "Cleanup finished with errors",
        "results": report.counts,
        "errors": report.failures,
    });
    Ok((StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response())
}
