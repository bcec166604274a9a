//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_STATE_DIR: &str = ".carmarket";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while reading client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(String),
}

/// What `logout` removes from the durable store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogoutScope {
    /// Wipe every key, not only the session record.
    #[default]
    All,
    /// Remove the session record and leave other keys alone.
    SessionOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API origin without a trailing slash, e.g. `https://api.example.test`.
    pub api_url: String,
    /// Directory holding the durable key-value store file.
    pub state_dir: PathBuf,
    pub timeouts: Timeouts,
    pub logout_scope: LogoutScope,
}

impl ClientConfig {
    /// Config pointing at `api_url` with every other field defaulted.
    #[must_use]
    pub fn new(api_url: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_owned(),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            timeouts: Timeouts::default(),
            logout_scope: LogoutScope::default(),
        }
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `CARMARKET_API_URL`: API origin (default `http://127.0.0.1:8080`)
    /// - `CARMARKET_STATE_DIR`: durable store directory (default `.carmarket`)
    /// - `CARMARKET_REQUEST_TIMEOUT_SECS`: default 30
    /// - `CARMARKET_CONNECT_TIMEOUT_SECS`: default 10
    /// - `CARMARKET_LOGOUT_SCOPE`: `all` (default) or `session`
    ///
    /// # Errors
    ///
    /// Returns an error if `CARMARKET_LOGOUT_SCOPE` holds an unknown value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = std::env::var("CARMARKET_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned());
        let state_dir = std::env::var("CARMARKET_STATE_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_STATE_DIR), PathBuf::from);
        let timeouts = Timeouts {
            request_secs: env_parse_u64("CARMARKET_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("CARMARKET_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let logout_scope = parse_logout_scope(std::env::var("CARMARKET_LOGOUT_SCOPE").ok().as_deref())?;

        Ok(Self { state_dir, timeouts, logout_scope, ..Self::new(&api_url) })
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_logout_scope(raw: Option<&str>) -> Result<LogoutScope, ConfigError> {
    match raw.map(str::trim).unwrap_or("all") {
        "all" => Ok(LogoutScope::All),
        "session" => Ok(LogoutScope::SessionOnly),
        other => Err(ConfigError::Parse(format!(
            "unsupported CARMARKET_LOGOUT_SCOPE '{other}' (expected 'all' or 'session')"
        ))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
