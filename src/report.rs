//! Presentation-neutral view of the dashboard: the window summary plus the
//! recent contests table, already formatted for display.

use crate::aggregator::{format_utc_clock, summarize, WindowSummary};
use crate::types::{Record, WindowMode};

#[derive(Debug, Clone, PartialEq)]
pub struct ContestRow {
    /// `[DD:HH:MM]` in UTC.
    pub clock: String,
    pub bids: String,
    pub stars: String,
    pub multiplier: String,
    pub prize: String,
}

impl ContestRow {
    fn from_record(r: &Record) -> Self {
        Self {
            clock: format!("[{}]", format_utc_clock(r.timestamp)),
            bids: format_value(r.bids),
            stars: format_value(r.star_pool),
            multiplier: format_value(r.multiplier),
            prize: format_value(r.prize),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub summary: WindowSummary,
    pub recent: Vec<ContestRow>,
    pub record_count: usize,
}

impl Report {
    /// `recent_limit` of 0 keeps every record.
    pub fn build(records: &[Record], now: i64, mode: WindowMode, recent_limit: usize) -> Self {
        let limit = if recent_limit == 0 { records.len() } else { recent_limit };
        let recent = newest_first(records)
            .into_iter()
            .take(limit)
            .map(ContestRow::from_record)
            .collect();

        Self {
            summary: summarize(records, now, mode),
            recent,
            record_count: records.len(),
        }
    }

    /// An empty collection means the feed has not produced data (yet).
    pub fn is_loading(&self) -> bool {
        self.record_count == 0
    }
}

/// Records in reverse chronological order. Equal timestamps come out in
/// reverse input order, so an already sorted feed is simply reversed.
pub fn newest_first(records: &[Record]) -> Vec<&Record> {
    let mut out: Vec<&Record> = records.iter().collect();
    out.sort_by_key(|r| r.timestamp);
    out.reverse();
    out
}

/// Whole numbers without a decimal point, missing values as an em dash.
pub fn format_value(v: Option<f64>) -> String {
    match v {
        Some(x) if x.fract() == 0.0 && x.abs() < 1e15 => format!("{}", x as i64),
        Some(x) => format!("{x}"),
        None => "—".to_string(),
    }
}

/// Stat figure shown next to each label: at most two decimals.
pub fn format_total(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rate;

    const NOW: i64 = 1_609_556_640;

    fn record(timestamp: i64, bids: f64) -> Record {
        Record {
            timestamp,
            bids: Some(bids),
            star_pool: Some(3.0),
            points_pool: Some(1.0),
            multiplier: Some(1.25),
            prize: None,
        }
    }

    #[test]
    fn recent_rows_are_newest_first_and_limited() {
        let records: Vec<Record> = (0..8).map(|i| record(NOW - 600 * (8 - i), i as f64)).collect();
        let report = Report::build(&records, NOW, WindowMode::Hourly, 5);
        let bids: Vec<&str> = report.recent.iter().map(|r| r.bids.as_str()).collect();
        assert_eq!(bids, vec!["7", "6", "5", "4", "3"]);
        assert_eq!(report.record_count, 8);
    }

    #[test]
    fn zero_limit_keeps_everything() {
        let records = vec![record(NOW - 10, 1.0), record(NOW - 20, 2.0)];
        let report = Report::build(&records, NOW, WindowMode::Daily, 0);
        assert_eq!(report.recent.len(), 2);
    }

    #[test]
    fn unsorted_feed_is_ordered_by_timestamp() {
        let records = vec![record(NOW - 30, 1.0), record(NOW - 10, 2.0), record(NOW - 20, 3.0)];
        let order: Vec<i64> = newest_first(&records).iter().map(|r| r.timestamp).collect();
        assert_eq!(order, vec![NOW - 10, NOW - 20, NOW - 30]);
    }

    #[test]
    fn equal_timestamps_keep_reverse_input_order() {
        let records = vec![record(NOW, 1.0), record(NOW, 2.0)];
        let bids: Vec<Option<f64>> = newest_first(&records).iter().map(|r| r.bids).collect();
        assert_eq!(bids, vec![Some(2.0), Some(1.0)]);
    }

    #[test]
    fn row_formatting() {
        let report = Report::build(&[record(NOW, 12.0)], NOW, WindowMode::Hourly, 5);
        assert_eq!(
            report.recent[0],
            ContestRow {
                clock: "[02:03:04]".to_string(),
                bids: "12".to_string(),
                stars: "3".to_string(),
                multiplier: "1.25".to_string(),
                prize: "—".to_string(),
            }
        );
    }

    #[test]
    fn empty_feed_is_loading_with_zeroed_summary() {
        let report = Report::build(&[], NOW, WindowMode::Hourly, 5);
        assert!(report.is_loading());
        assert!(report.recent.is_empty());
        assert_eq!(report.summary.bids_rate, Rate::Finite(0.0));
    }

    #[test]
    fn totals_use_two_decimals_when_fractional() {
        assert_eq!(format_total(30.0), "30");
        assert_eq!(format_total(2.5), "2.50");
    }
}
