use serde_json::Value;
use tracing::{debug, info, warn};

use crate::aggregator::normalize_timestamp;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::types::{lenient_number, RawRecord, Record};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FetchStats {
    /// Entries found under `data.stage2`.
    pub records_total: usize,
    /// Entries that are not JSON objects.
    pub rejected_shape: usize,
    /// Entries whose Timestamp could not be normalized.
    pub rejected_timestamp: usize,
    pub accepted: usize,
}

/// Fetch the contest feed once.
///
/// Never fails: a network error, a non-success status, or a body that does
/// not have the expected shape all come back as an empty collection, which
/// the presentation layer shows as "Loading...".
pub async fn fetch_records(client: &reqwest::Client, cfg: &Config) -> (Vec<Record>, FetchStats) {
    match try_fetch(client, &cfg.data_url).await {
        Ok((records, stats)) => {
            info!(
                url = %cfg.data_url,
                total = stats.records_total,
                accepted = stats.accepted,
                rejected_shape = stats.rejected_shape,
                rejected_timestamp = stats.rejected_timestamp,
                "Fetched {} contest records",
                records.len(),
            );
            (records, stats)
        }
        Err(e) => {
            warn!(url = %cfg.data_url, "Fetch error, treating feed as empty: {e}");
            (Vec::new(), FetchStats::default())
        }
    }
}

async fn try_fetch(client: &reqwest::Client, url: &str) -> Result<(Vec<Record>, FetchStats)> {
    let body: Value = client.get(url).send().await?.error_for_status()?.json().await?;
    parse_feed(&body)
}

/// Parse a raw response body, collapsing every failure to an empty collection.
pub fn ingest_body(body: &str) -> (Vec<Record>, FetchStats) {
    let parsed = serde_json::from_str::<Value>(body)
        .map_err(AppError::from)
        .and_then(|v| parse_feed(&v));
    match parsed {
        Ok(out) => out,
        Err(e) => {
            warn!("Malformed feed body, treating as empty: {e}");
            (Vec::new(), FetchStats::default())
        }
    }
}

/// Navigate `[0].data.stage2` and convert every entry into a `Record`.
pub fn parse_feed(body: &Value) -> Result<(Vec<Record>, FetchStats)> {
    let items = body
        .as_array()
        .ok_or_else(|| AppError::Shape("top level is not an array".to_string()))?
        .first()
        .ok_or_else(|| AppError::Shape("top level array is empty".to_string()))?
        .get("data")
        .and_then(|d| d.get("stage2"))
        .and_then(|s| s.as_array())
        .ok_or_else(|| AppError::Shape("missing data.stage2 array".to_string()))?;

    let mut stats = FetchStats {
        records_total: items.len(),
        ..FetchStats::default()
    };
    let mut records = Vec::with_capacity(items.len());

    for (idx, item) in items.iter().enumerate() {
        if !item.is_object() {
            debug!(idx, "Skipping stage2 entry that is not an object");
            stats.rejected_shape += 1;
            continue;
        }
        let raw: RawRecord = match serde_json::from_value(item.clone()) {
            Ok(r) => r,
            Err(e) => {
                debug!(idx, "Skipping unreadable stage2 entry: {e}");
                stats.rejected_shape += 1;
                continue;
            }
        };
        match to_record(raw) {
            Ok(record) => records.push(record),
            Err(e) => {
                debug!(idx, "Skipping stage2 entry: {e}");
                stats.rejected_timestamp += 1;
            }
        }
    }

    stats.accepted = records.len();
    Ok((records, stats))
}

fn to_record(raw: RawRecord) -> Result<Record> {
    let timestamp = match raw.timestamp.as_ref() {
        Some(v) => normalize_timestamp(v)?,
        None => return Err(AppError::Timestamp("missing Timestamp".to_string())),
    };
    Ok(Record {
        timestamp,
        bids: lenient_number(raw.bids.as_ref()),
        star_pool: lenient_number(raw.star_pool.as_ref()),
        points_pool: lenient_number(raw.points_pool.as_ref()),
        multiplier: lenient_number(raw.multiplier.as_ref()),
        prize: lenient_number(raw.prize.as_ref()),
    })
}
