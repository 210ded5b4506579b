use crate::aggregator::window::partition;
use crate::types::{Metric, Rate, Record, WindowMode};

/// Sum `metric` across `records`. Missing values count as zero.
pub fn sum<'a, I>(records: I, metric: Metric) -> f64
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .map(|r| r.value(metric).unwrap_or(0.0))
        .sum()
}

/// Percentage change from `previous` to `current`.
///
/// Only a zero `previous` is guarded: flat zero is 0%, anything else is
/// `Rate::Unbounded`. Negative sums go through the plain formula.
pub fn rate(current: f64, previous: f64) -> Rate {
    if previous == 0.0 {
        if current == 0.0 {
            Rate::Finite(0.0)
        } else {
            Rate::Unbounded
        }
    } else {
        Rate::Finite((current - previous) / previous * 100.0)
    }
}

/// Dashboard numbers for one window mode at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSummary {
    pub mode: WindowMode,
    pub now: i64,
    /// Bids summed over the current window.
    pub bids_total: f64,
    /// Points pool summed over the current window.
    pub points_total: f64,
    pub bids_rate: Rate,
    pub points_rate: Rate,
    pub current_count: usize,
    pub previous_count: usize,
}

pub fn summarize(records: &[Record], now: i64, mode: WindowMode) -> WindowSummary {
    let pair = partition(records, now, mode);

    let bids_current = sum(pair.current.iter().copied(), Metric::Bids);
    let bids_previous = sum(pair.previous.iter().copied(), Metric::Bids);
    let points_current = sum(pair.current.iter().copied(), Metric::PointsPool);
    let points_previous = sum(pair.previous.iter().copied(), Metric::PointsPool);

    WindowSummary {
        mode,
        now,
        bids_total: bids_current,
        points_total: points_current,
        bids_rate: rate(bids_current, bids_previous),
        points_rate: rate(points_current, points_previous),
        current_count: pair.current.len(),
        previous_count: pair.previous.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn record(timestamp: i64, bids: Option<f64>, points_pool: Option<f64>) -> Record {
        Record {
            timestamp,
            bids,
            star_pool: None,
            points_pool,
            multiplier: None,
            prize: None,
        }
    }

    #[test]
    fn sum_of_nothing_is_zero() {
        let empty: Vec<Record> = Vec::new();
        for metric in [
            Metric::Bids,
            Metric::PointsPool,
            Metric::StarPool,
            Metric::Multiplier,
            Metric::Prize,
        ] {
            assert_eq!(sum(&empty, metric), 0.0);
        }
    }

    #[test]
    fn sum_treats_missing_as_zero() {
        let records = vec![
            record(NOW, Some(4.0), None),
            record(NOW, None, Some(2.0)),
            record(NOW, Some(6.5), Some(1.0)),
        ];
        assert_eq!(sum(&records, Metric::Bids), 10.5);
        assert_eq!(sum(&records, Metric::PointsPool), 3.0);
        assert_eq!(sum(&records, Metric::Prize), 0.0);
    }

    #[test]
    fn rate_edge_cases() {
        assert_eq!(rate(0.0, 0.0), Rate::Finite(0.0));
        assert_eq!(rate(5.0, 0.0), Rate::Unbounded);
        assert_eq!(rate(150.0, 100.0), Rate::Finite(50.0));
        assert_eq!(rate(50.0, 100.0), Rate::Finite(-50.0));
        assert_eq!(rate(0.0, 100.0), Rate::Finite(-100.0));
    }

    #[test]
    fn rate_does_not_reject_negative_sums() {
        assert_eq!(rate(-5.0, 0.0), Rate::Unbounded);
        assert_eq!(rate(10.0, -10.0), Rate::Finite(-200.0));
    }

    #[test]
    fn overflowed_sums_give_an_undefined_rate_not_a_nan_label() {
        let r = rate(f64::INFINITY, f64::INFINITY);
        assert!(r.is_undefined());
        assert_eq!(r.to_string(), "—");

        let records = vec![record(NOW, Some(f64::MAX), None), record(NOW, Some(f64::MAX), None)];
        assert_eq!(sum(&records, Metric::Bids), f64::INFINITY);
    }

    #[test]
    fn hourly_summary_matches_hand_computation() {
        let records = vec![
            record(NOW - 100, Some(10.0), Some(5.0)),
            record(NOW - 4000, Some(20.0), Some(1.0)),
        ];
        let pair = partition(&records, NOW, WindowMode::Hourly);
        assert_eq!(sum(pair.current.iter().copied(), Metric::Bids), 10.0);
        assert_eq!(sum(pair.previous.iter().copied(), Metric::Bids), 20.0);

        let summary = summarize(&records, NOW, WindowMode::Hourly);
        assert_eq!(summary.bids_total, 10.0);
        assert_eq!(summary.points_total, 5.0);
        assert_eq!(summary.bids_rate, Rate::Finite(-50.0));
        assert_eq!(summary.points_rate, Rate::Finite(400.0));
        assert_eq!(summary.current_count, 1);
        assert_eq!(summary.previous_count, 1);
    }

    #[test]
    fn daily_summary_merges_both_records_into_current() {
        let records = vec![
            record(NOW - 100, Some(10.0), Some(5.0)),
            record(NOW - 4000, Some(20.0), Some(1.0)),
        ];
        let summary = summarize(&records, NOW, WindowMode::Daily);
        assert_eq!(summary.bids_total, 30.0);
        assert_eq!(summary.bids_rate, Rate::Unbounded);
        assert_eq!(summary.previous_count, 0);
    }

    #[test]
    fn empty_collection_summarizes_to_zero() {
        let summary = summarize(&[], NOW, WindowMode::Hourly);
        assert_eq!(summary.bids_total, 0.0);
        assert_eq!(summary.points_total, 0.0);
        assert_eq!(summary.bids_rate, Rate::Finite(0.0));
        assert_eq!(summary.points_rate, Rate::Finite(0.0));
    }
}
