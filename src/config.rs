use std::time::Duration;

use crate::error::{AppError, Result};
use crate::types::WindowMode;

pub const DATA_URL: &str = "https://data.spone.fun/search?sort=kesoonho&id=data";

/// Rows shown in the "Last N Contest" table when RECENT_LIMIT is unset.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// TUI redraw interval (milliseconds). Windows are recomputed against a fresh
/// "now" on every tick; the record collection itself is only refetched on demand.
pub const TUI_TICK_MS: u64 = 1000;

/// Event poll interval (milliseconds) while a background fetch is in flight.
pub const TUI_FETCH_POLL_MS: u64 = 100;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_url: String,
    pub log_level: String,
    /// Initial window mode (WINDOW_MODE: hourly | daily)
    pub window_mode: WindowMode,
    /// Rows in the recent contests table, 0 = all (RECENT_LIMIT)
    pub recent_limit: usize,
    /// Request timeout; None means the GET may take as long as it takes (HTTP_TIMEOUT_SECS)
    pub http_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            data_url: std::env::var("DATA_URL").unwrap_or_else(|_| DATA_URL.to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            window_mode: std::env::var("WINDOW_MODE")
                .unwrap_or_else(|_| "hourly".to_string())
                .parse::<WindowMode>()?,
            recent_limit: std::env::var("RECENT_LIMIT")
                .unwrap_or_else(|_| DEFAULT_RECENT_LIMIT.to_string())
                .parse::<usize>()
                .unwrap_or(DEFAULT_RECENT_LIMIT),
            http_timeout: match std::env::var("HTTP_TIMEOUT_SECS") {
                Ok(v) => Some(Duration::from_secs(v.trim().parse::<u64>().map_err(|_| {
                    AppError::Config("HTTP_TIMEOUT_SECS must be a whole number of seconds".to_string())
                })?)),
                Err(_) => None,
            },
        })
    }

    /// Build the HTTP client used for the contest feed.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.http_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}
