use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One observed contest sample, timestamp already normalized to epoch seconds.
/// Numeric fields are passed through from the feed; `None` means the feed
/// omitted the field or sent something that is not a number.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub timestamp: i64,
    pub bids: Option<f64>,
    pub star_pool: Option<f64>,
    pub points_pool: Option<f64>,
    pub multiplier: Option<f64>,
    pub prize: Option<f64>,
}

impl Record {
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Bids => self.bids,
            Metric::StarPool => self.star_pool,
            Metric::PointsPool => self.points_pool,
            Metric::Multiplier => self.multiplier,
            Metric::Prize => self.prize,
        }
    }
}

/// Record as it appears inside `data.stage2` of the feed.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Timestamp", default)]
    pub timestamp: Option<Value>,
    #[serde(rename = "Bids", default)]
    pub bids: Option<Value>,
    #[serde(rename = "Points_Pool", default)]
    pub points_pool: Option<Value>,
    #[serde(rename = "Star_Pool", default)]
    pub star_pool: Option<Value>,
    #[serde(rename = "Multiplier", default)]
    pub multiplier: Option<Value>,
    #[serde(rename = "Prize", default)]
    pub prize: Option<Value>,
}

/// Accepts JSON numbers and numeric strings; everything else is treated as absent.
pub fn lenient_number(v: Option<&Value>) -> Option<f64> {
    match v? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Bids,
    PointsPool,
    StarPool,
    Multiplier,
    Prize,
}

// ---------------------------------------------------------------------------
// Window mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowMode {
    #[default]
    Hourly,
    Daily,
}

impl WindowMode {
    /// Window length in seconds.
    pub const fn length_secs(self) -> i64 {
        match self {
            WindowMode::Hourly => 3_600,
            WindowMode::Daily => 86_400,
        }
    }

    /// Short span label shown next to each stat, e.g. "Bids (1h)".
    pub fn span_label(self) -> &'static str {
        match self {
            WindowMode::Hourly => "1h",
            WindowMode::Daily => "24h",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            WindowMode::Hourly => WindowMode::Daily,
            WindowMode::Daily => WindowMode::Hourly,
        }
    }
}

impl std::fmt::Display for WindowMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowMode::Hourly => write!(f, "Hourly"),
            WindowMode::Daily => write!(f, "Daily"),
        }
    }
}

impl std::str::FromStr for WindowMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hourly" | "hour" | "1h" => Ok(WindowMode::Hourly),
            "daily" | "day" | "24h" => Ok(WindowMode::Daily),
            other => Err(AppError::Config(format!(
                "WINDOW_MODE must be hourly or daily, got {other:?}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Rate of change
// ---------------------------------------------------------------------------

/// Percentage change between two adjacent windows.
///
/// `Unbounded` is growth from a previous sum of zero. It is kept distinct from
/// every finite percentage instead of being clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rate {
    Finite(f64),
    Unbounded,
}

impl Rate {
    pub fn is_unbounded(self) -> bool {
        matches!(self, Rate::Unbounded)
    }

    /// NaN from sums that overflowed to infinity on both sides.
    pub fn is_undefined(self) -> bool {
        matches!(self, Rate::Finite(v) if v.is_nan())
    }

    /// Growth or flat. Drives the green/red colouring.
    pub fn is_non_negative(self) -> bool {
        match self {
            Rate::Finite(v) => v >= 0.0,
            Rate::Unbounded => true,
        }
    }
}

impl std::fmt::Display for Rate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rate::Finite(v) if v.is_nan() => write!(f, "—"),
            Rate::Finite(v) if v.is_infinite() => write!(f, "{}∞%", if *v < 0.0 { "-" } else { "" }),
            Rate::Finite(v) => write!(f, "{v:.2}%"),
            Rate::Unbounded => write!(f, "∞%"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn window_lengths() {
        assert_eq!(WindowMode::Hourly.length_secs(), 3600);
        assert_eq!(WindowMode::Daily.length_secs(), 86400);
    }

    #[test]
    fn window_mode_parses_aliases() {
        assert_eq!("Hourly".parse::<WindowMode>().unwrap(), WindowMode::Hourly);
        assert_eq!(" 24h ".parse::<WindowMode>().unwrap(), WindowMode::Daily);
        assert!("weekly".parse::<WindowMode>().is_err());
    }

    #[test]
    fn toggle_flips_mode() {
        assert_eq!(WindowMode::Hourly.toggle(), WindowMode::Daily);
        assert_eq!(WindowMode::Daily.toggle(), WindowMode::Hourly);
    }

    #[test]
    fn rate_display() {
        assert_eq!(Rate::Finite(-50.0).to_string(), "-50.00%");
        assert_eq!(Rate::Finite(12.345).to_string(), "12.35%");
        assert_eq!(Rate::Unbounded.to_string(), "∞%");
    }

    #[test]
    fn unbounded_rate_counts_as_growth() {
        assert!(Rate::Unbounded.is_non_negative());
        assert!(Rate::Finite(0.0).is_non_negative());
        assert!(!Rate::Finite(-0.5).is_non_negative());
    }

    #[test]
    fn non_finite_rates_do_not_render_as_nan() {
        assert_eq!(Rate::Finite(f64::NAN).to_string(), "—");
        assert!(Rate::Finite(f64::NAN).is_undefined());
        assert!(!Rate::Finite(1.0).is_undefined());
        assert!(!Rate::Unbounded.is_undefined());
        assert_eq!(Rate::Finite(f64::INFINITY).to_string(), "∞%");
        assert_eq!(Rate::Finite(f64::NEG_INFINITY).to_string(), "-∞%");
    }

    #[test]
    fn lenient_number_accepts_numeric_strings() {
        assert_eq!(lenient_number(Some(&json!(3))), Some(3.0));
        assert_eq!(lenient_number(Some(&json!("2.5"))), Some(2.5));
        assert_eq!(lenient_number(Some(&json!("abc"))), None);
        assert_eq!(lenient_number(Some(&json!(null))), None);
        assert_eq!(lenient_number(None), None);
    }
}
