//! Client configuration parsed from environment variables.
//!
//! `main` loads `.env` through `dotenvy` first, then CLI flags override what
//! is read here.

use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_DATA_PATH: &str = "/rest/v1";
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 250;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PASS_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A base URL was set but empty after trimming.
    #[error("{var} must not be empty")]
    EmptyUrl { var: &'static str },

    /// A base URL does not start with an HTTP scheme.
    #[error("{var} must start with http:// or https:// (got '{value}')")]
    InvalidUrl { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Timeouts {
    #[must_use]
    pub fn request(self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminConfig {
    /// Base URL of the REST API (exams, students, results, users).
    pub api_url: String,
    /// Base URL of the Postgrest table API (products, orders, coupons, ...).
    pub data_url: String,
    /// Project key sent as `apikey` on table requests.
    pub data_key: Option<String>,
    /// Bearer token for the signed-in admin.
    pub token: Option<String>,
    pub search_debounce_ms: u64,
    pub pass_threshold: f64,
    pub timeouts: Timeouts,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            data_url: format!("{DEFAULT_API_URL}{DEFAULT_DATA_PATH}"),
            data_key: None,
            token: None,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            timeouts: Timeouts::default(),
        }
    }
}

impl AdminConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `ADMIN_API_URL`: default `http://127.0.0.1:3000`
    /// - `ADMIN_DATA_URL`: default `{ADMIN_API_URL}/rest/v1`
    /// - `ADMIN_DATA_KEY`: project key for table requests
    /// - `ADMIN_TOKEN`: bearer token; falls back to the `token=` entry of `ADMIN_COOKIE`
    /// - `ADMIN_SEARCH_DEBOUNCE_MS`: default 250
    /// - `ADMIN_PASS_THRESHOLD`: default 50
    /// - `ADMIN_REQUEST_TIMEOUT_SECS`: default 30
    /// - `ADMIN_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if a base URL is empty or not an HTTP URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = normalize_url("ADMIN_API_URL", env_string("ADMIN_API_URL").as_deref())?
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let data_url = normalize_url("ADMIN_DATA_URL", env_string("ADMIN_DATA_URL").as_deref())?
            .unwrap_or_else(|| format!("{api_url}{DEFAULT_DATA_PATH}"));
        let token = env_string("ADMIN_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .or_else(|| env_string("ADMIN_COOKIE").and_then(|c| crate::net::session::token_from_cookie(&c)));

        Ok(Self {
            api_url,
            data_url,
            data_key: env_string("ADMIN_DATA_KEY").filter(|k| !k.trim().is_empty()),
            token,
            search_debounce_ms: env_parse("ADMIN_SEARCH_DEBOUNCE_MS", DEFAULT_SEARCH_DEBOUNCE_MS),
            pass_threshold: env_parse("ADMIN_PASS_THRESHOLD", DEFAULT_PASS_THRESHOLD),
            timeouts: Timeouts {
                request_secs: env_parse("ADMIN_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
                connect_secs: env_parse("ADMIN_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
            },
        })
    }

    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

/// Trim a configured base URL and strip trailing slashes.
///
/// # Errors
///
/// Returns an error for an empty or non-HTTP value.
pub fn normalize_url(var: &'static str, raw: Option<&str>) -> Result<Option<String>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyUrl { var });
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidUrl { var, value: trimmed.to_owned() });
    }
    Ok(Some(trimmed.to_owned()))
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
