pub mod aggregator;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod report;
pub mod types;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall clock as whole epoch seconds.
pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
