use crate::types::{Record, WindowMode};

/// Edges of the two adjacent windows ending at `end`.
///
/// previous: `[previous_start, current_start)`
/// current:  `[current_start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBounds {
    pub previous_start: i64,
    pub current_start: i64,
    pub end: i64,
}

impl WindowBounds {
    pub fn new(now: i64, mode: WindowMode) -> Self {
        let len = mode.length_secs();
        Self {
            previous_start: now.saturating_sub(len.saturating_mul(2)),
            current_start: now.saturating_sub(len),
            end: now,
        }
    }

    #[inline]
    pub fn in_current(&self, ts: i64) -> bool {
        ts >= self.current_start && ts <= self.end
    }

    /// Half-open on the newer edge so a record sitting exactly on
    /// `current_start` is counted once, in the current window.
    #[inline]
    pub fn in_previous(&self, ts: i64) -> bool {
        ts >= self.previous_start && ts < self.current_start
    }
}

/// Borrowed views of the records falling in each window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowPair<'a> {
    pub current: Vec<&'a Record>,
    pub previous: Vec<&'a Record>,
}

/// Split `records` into the current and previous windows relative to `now`.
/// Input order does not matter; records outside both windows are dropped.
pub fn partition(records: &[Record], now: i64, mode: WindowMode) -> WindowPair<'_> {
    let bounds = WindowBounds::new(now, mode);
    let mut pair = WindowPair::default();

    for record in records {
        if bounds.in_current(record.timestamp) {
            pair.current.push(record);
        } else if bounds.in_previous(record.timestamp) {
            pair.previous.push(record);
        }
    }

    pair
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn at(timestamp: i64) -> Record {
        Record {
            timestamp,
            bids: Some(1.0),
            star_pool: None,
            points_pool: None,
            multiplier: None,
            prize: None,
        }
    }

    fn stamps(records: &[&Record]) -> Vec<i64> {
        records.iter().map(|r| r.timestamp).collect()
    }

    #[test]
    fn empty_input_yields_empty_windows() {
        let pair = partition(&[], NOW, WindowMode::Hourly);
        assert!(pair.current.is_empty());
        assert!(pair.previous.is_empty());
    }

    #[test]
    fn boundary_records_land_in_exactly_one_window() {
        let records = vec![
            at(NOW),
            at(NOW - 3600),
            at(NOW - 3601),
            at(NOW - 7200),
            at(NOW - 7201),
            at(NOW + 1),
        ];
        let pair = partition(&records, NOW, WindowMode::Hourly);
        assert_eq!(stamps(&pair.current), vec![NOW, NOW - 3600]);
        assert_eq!(stamps(&pair.previous), vec![NOW - 3601, NOW - 7200]);
    }

    #[test]
    fn windows_are_disjoint() {
        let records: Vec<Record> = (0..300).map(|i| at(NOW - i * 97)).collect();
        for mode in [WindowMode::Hourly, WindowMode::Daily] {
            let pair = partition(&records, NOW, mode);
            for c in &pair.current {
                assert!(!pair.previous.iter().any(|p| std::ptr::eq(*p, *c)));
            }
        }
    }

    #[test]
    fn unsorted_input_is_partitioned_by_timestamp() {
        let records = vec![at(NOW - 5000), at(NOW - 10), at(NOW - 4000), at(NOW - 20)];
        let pair = partition(&records, NOW, WindowMode::Hourly);
        assert_eq!(stamps(&pair.current), vec![NOW - 10, NOW - 20]);
        assert_eq!(stamps(&pair.previous), vec![NOW - 5000, NOW - 4000]);
    }

    #[test]
    fn daily_mode_uses_day_length() {
        let records = vec![at(NOW - 4000), at(NOW - 86_400), at(NOW - 90_000), at(NOW - 172_801)];
        let pair = partition(&records, NOW, WindowMode::Daily);
        assert_eq!(stamps(&pair.current), vec![NOW - 4000, NOW - 86_400]);
        assert_eq!(stamps(&pair.previous), vec![NOW - 90_000]);
    }

    #[test]
    fn bounds_do_not_overflow_near_i64_min() {
        let bounds = WindowBounds::new(i64::MIN + 10, WindowMode::Daily);
        assert_eq!(bounds.previous_start, i64::MIN);
        assert!(bounds.in_current(i64::MIN + 10));
    }
}
