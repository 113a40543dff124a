use std::sync::Arc;

use crate::{
    config::Config,
    services::cleanup::CleanupTimer,
    store::Store,
    utils::JwtKeys,
};

/// Shared application state handed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<Config>,
    pub keys: Arc<JwtKeys>,
    pub cleanup_timer: Arc<CleanupTimer>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        let keys = JwtKeys::from_secret(&config.jwt_secret);
        Self {
            store,
            config: Arc::new(config),
            keys: Arc::new(keys),
            cleanup_timer: Arc::new(CleanupTimer::new()),
        }
    }

    /// Starts the in-process cleanup timer if enabled. Safe to call more than once.
    pub fn start_cleanup_timer(&self) -> bool {
        if !self.config.cleanup_timer_enabled {
            return false;
        }
        self.cleanup_timer
            .start(
                Arc::clone(&self.store),
                self.config.cleanup_interval,
                self.config.job_timeout,
            )
            .is_some()
    }
}
