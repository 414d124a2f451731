//! Admin client configuration parsed from environment variables.

use std::time::Duration;

use crate::validation::DEFAULT_MAX_UPLOAD_BYTES;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost/eventdesk/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config parse failed: {key}={value}")]
    Parse { key: &'static str, value: String },
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Timeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    pub api_base_url: String,
    pub timeouts: Timeouts,
    pub page_size: usize,
    pub poll_interval_secs: u64,
    pub max_upload_bytes: u64,
    pub search_debounce_ms: u64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            timeouts: Timeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
            page_size: DEFAULT_PAGE_SIZE,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
        }
    }
}

impl AdminConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `EVENTDESK_API_URL`: backend origin + path (default `http://localhost/eventdesk/api`)
    /// - `EVENTDESK_REQUEST_TIMEOUT_SECS`: default 30
    /// - `EVENTDESK_CONNECT_TIMEOUT_SECS`: default 10
    /// - `EVENTDESK_PAGE_SIZE`: default 10
    /// - `EVENTDESK_POLL_INTERVAL_SECS`: default 30
    /// - `EVENTDESK_MAX_UPLOAD_BYTES`: default 5 MiB
    /// - `EVENTDESK_SEARCH_DEBOUNCE_MS`: default 300
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is set but unparseable, or when the
    /// resulting value is unusable (empty URL, zero page size or interval).
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = std::env::var("EVENTDESK_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_owned());
        let config = Self {
            api_base_url: normalize_base_url(&api_base_url),
            timeouts: Timeouts {
                request_secs: env_parse("EVENTDESK_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
                connect_secs: env_parse("EVENTDESK_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
            },
            page_size: env_parse("EVENTDESK_PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
            poll_interval_secs: env_parse("EVENTDESK_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?,
            max_upload_bytes: env_parse("EVENTDESK_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            search_debounce_ms: env_parse("EVENTDESK_SEARCH_DEBOUNCE_MS", DEFAULT_SEARCH_DEBOUNCE_MS)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values no caller can work with.
    ///
    /// # Errors
    ///
    /// Returns the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.is_empty() {
            return Err(ConfigError::Empty("EVENTDESK_API_URL"));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Zero("EVENTDESK_PAGE_SIZE"));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Zero("EVENTDESK_POLL_INTERVAL_SECS"));
        }
        Ok(())
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

/// Trim whitespace and trailing slashes so endpoint joins stay clean.
#[must_use]
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn env_parse<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Parse { key, value: raw }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
