//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Versioned API root, without trailing slash (e.g. `.../api/v1`).
    pub api_url: String,
    /// Directory holding the persisted session.
    pub session_dir: PathBuf,
    pub timeouts: HttpTimeouts,
}

impl ClientConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `AIRPORT_API_URL`: default `http://localhost:8080/api/v1`
    /// - `AIRPORT_SESSION_DIR`: default `$HOME/.config/airport`
    /// - `AIRPORT_REQUEST_TIMEOUT_SECS`: default 30
    /// - `AIRPORT_CONNECT_TIMEOUT_SECS`: default 10
    #[must_use]
    pub fn from_env() -> Self {
        let api_url =
            std::env::var("AIRPORT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let session_dir = std::env::var_os("AIRPORT_SESSION_DIR")
            .map_or_else(default_session_dir, PathBuf::from);
        let timeouts = HttpTimeouts {
            request_secs: env_parse_u64(
                "AIRPORT_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            ),
            connect_secs: env_parse_u64(
                "AIRPORT_CONNECT_TIMEOUT_SECS",
                DEFAULT_CONNECT_TIMEOUT_SECS,
            ),
        };
        Self::new(api_url, session_dir).with_timeouts(timeouts)
    }

    #[must_use]
    pub fn new(api_url: impl Into<String>, session_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_url: normalize_url(&api_url.into()),
            session_dir: session_dir.into(),
            timeouts: HttpTimeouts::default(),
        }
    }

    #[must_use]
    pub fn with_timeouts(mut self, timeouts: HttpTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }
}

fn normalize_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn default_session_dir() -> PathBuf {
    std::env::var_os("HOME").map_or_else(
        || PathBuf::from(".airport"),
        |home| PathBuf::from(home).join(".config").join("airport"),
    )
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}
