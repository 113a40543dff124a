use std::env;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 24 * 60 * 60;
const MIN_CLEANUP_INTERVAL_SECS: u64 = 60;
const DEFAULT_JOB_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Shared secret expected from the external job scheduler.
    pub cron_secret: Option<String>,
    pub session_ttl_hours: i64,
    pub cleanup_timer_enabled: bool,
    pub cleanup_interval: Duration,
    pub job_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let cron_secret = env::var("CRON_SECRET")
            .ok()
            .filter(|secret| !secret.trim().is_empty());

        let cleanup_interval_secs =
            parsed("CLEANUP_INTERVAL_SECS", DEFAULT_CLEANUP_INTERVAL_SECS)?
                .max(MIN_CLEANUP_INTERVAL_SECS);

        Ok(Self {
            database_url,
            port: parsed("PORT", DEFAULT_PORT)?,
            jwt_secret,
            cron_secret,
            session_ttl_hours: parsed("SESSION_TTL_HOURS", DEFAULT_SESSION_TTL_HOURS)?,
            cleanup_timer_enabled: flag("CLEANUP_TIMER_ENABLED", true)?,
            cleanup_interval: Duration::from_secs(cleanup_interval_secs),
            job_timeout: Duration::from_secs(parsed("JOB_TIMEOUT_SECS", DEFAULT_JOB_TIMEOUT_SECS)?),
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn parsed<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

fn flag(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(key) {
        Ok(value) => parse_flag(&value).ok_or(ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            database_url: "postgres://localhost/worknest_test".to_string(),
            port: DEFAULT_PORT,
            jwt_secret: "test-jwt-secret".to_string(),
            cron_secret: Some("test-cron-secret".to_string()),
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            cleanup_timer_enabled: false,
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            job_timeout: Duration::from_secs(DEFAULT_JOB_TIMEOUT_SECS),
        }
    }
}
