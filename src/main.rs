mod config;
mod database;
mod error;
mod handlers;
mod middleware;
mod models;
mod services;
mod state;
mod store;
mod utils;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    response::Redirect,
    routing::{get, post},
    Router,
};
use dotenvy::dotenv;
use log::{error, info};
use thiserror::Error;
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::TraceLayer,
};

use config::{Config, ConfigError};
use database::create_database_pool;
use middleware::access_gate;
use state::AppState;
use store::PgStore;

#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = Config::from_env()?;

    let db = create_database_pool(&config.database_url).await?;
    let addr = format!("0.0.0.0:{}", config.port);

    let state = AppState::new(Arc::new(PgStore::new(db)), config);
    if state.start_cleanup_timer() {
        info!("in-process cleanup timer enabled");
    }

    let app = create_router(state);

    info!("WorkNest server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn create_router(state: AppState) -> Router {
    Router::new()
        // Public routes
        .route("/", get(|| async { Redirect::permanent(middleware::access_gate::LOGIN_PATH) }))
        .route("/health", get(handlers::health))

        // Identity provider
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))

        // Permissions
        .route("/api/permissions", get(handlers::permissions::my_permissions))
        .route("/api/permissions/catalog", get(handlers::permissions::catalog))
        .route(
            "/api/admin/permissions/:employee_id",
            get(handlers::permissions::employee_permissions)
                .put(handlers::permissions::update_employee_permissions),
        )

        // Job triggers
        .route(
            "/api/cron/reset-recurring-tasks",
            get(handlers::cron::reset_recurring_tasks).post(handlers::cron::reset_recurring_tasks),
        )
        .route(
            "/api/cron/cleanup",
            get(handlers::cron::cleanup).post(handlers::cron::cleanup),
        )

        // Static files
        .nest_service("/static", ServeDir::new("static"))
        .fallback(handlers::not_found)

        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CookieManagerLayer::new())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB
                .layer(from_fn_with_state(state.clone(), access_gate))
        )
        .with_state(state)
}
