//! Per-ticker derived series: one-day returns, trailing mean of close, and
//! the raw/normalized display projection.
//!
//! Everything here is recomputed from scratch whenever the selected ticker or
//! the display mode changes; nothing is updated incrementally.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::PriceRow;

/// Default trailing window for the moving average.
pub const DEFAULT_MA_WINDOW: usize = 20;

/// How prices are plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Prices as loaded.
    #[default]
    Raw,
    /// Index starting at 100 on the first sample.
    Normalized,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Raw => DisplayMode::Normalized,
            DisplayMode::Normalized => DisplayMode::Raw,
        }
    }

    /// Axis title for the price scale.
    pub fn axis_label(self) -> &'static str {
        match self {
            DisplayMode::Raw => "Price (Adj Close)",
            DisplayMode::Normalized => "Price Index (start=100)",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Raw => write!(f, "raw"),
            DisplayMode::Normalized => write!(f, "normalized"),
        }
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(DisplayMode::Raw),
            "normalized" | "norm" | "index" => Ok(DisplayMode::Normalized),
            other => Err(format!("unknown display mode '{other}' (expected raw|normalized)")),
        }
    }
}

/// One plotted sample of the selected ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: f64,
    /// One-day simple return; `None` on the first sample or after a zero close.
    pub ret: Option<f64>,
    /// Trailing mean of close.
    pub ma: Option<f64>,
    /// `close` under the active display mode.
    pub display_price: f64,
    /// `ma` under the active display mode.
    pub display_ma: Option<f64>,
}

/// `close[i] / close[i-1] - 1`, or `None` at index 0 and wherever the
/// previous close is zero.
pub fn one_day_returns(closes: &[f64]) -> Vec<Option<f64>> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let prev = *closes.get(i.checked_sub(1)?)?;
            if prev == 0.0 || !prev.is_finite() {
                return None;
            }
            Some(close / prev - 1.0)
        })
        .collect()
}

/// Mean of `values[max(0, i + 1 - window)..=i]` for every `i`.
///
/// Early indices average over however many samples exist so far.
pub fn trailing_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Build the raw-mode series from one ticker's rows.
///
/// Rows are sorted by date here; callers do not need to pre-sort.
pub fn build_series(rows: &[&PriceRow], window: usize) -> Vec<SeriesPoint> {
    let mut sorted: Vec<&PriceRow> = rows.to_vec();
    sorted.sort_by_key(|r| r.date);

    let closes: Vec<f64> = sorted.iter().map(|r| r.close).collect();
    let returns = one_day_returns(&closes);
    let means = trailing_mean(&closes, window);

    sorted
        .iter()
        .zip(returns)
        .zip(means)
        .map(|((row, ret), ma)| SeriesPoint {
            date: row.date,
            close: row.close,
            volume: row.volume,
            ret,
            ma: Some(ma),
            display_price: row.close,
            display_ma: Some(ma),
        })
        .collect()
}

/// Recompute the display fields for `mode`.
///
/// Normalized divides by the first close and scales by 100. A zero or
/// non-finite first close leaves values unscaled.
pub fn apply_display_mode(points: &mut [SeriesPoint], mode: DisplayMode) {
    let base = points
        .first()
        .map(|p| p.close)
        .filter(|b| *b != 0.0 && b.is_finite());

    for p in points.iter_mut() {
        match (mode, base) {
            (DisplayMode::Normalized, Some(base)) => {
                p.display_price = p.close / base * 100.0;
                p.display_ma = p.ma.map(|m| m / base * 100.0);
            }
            _ => {
                p.display_price = p.close;
                p.display_ma = p.ma;
            }
        }
    }
}

/// Index of the sample nearest to `target`, ties going to the later sample.
///
/// `dates` must be sorted ascending. Returns `None` for an empty slice.
pub fn nearest_index(dates: &[i64], target: i64) -> Option<usize> {
    if dates.is_empty() {
        return None;
    }
    let last = dates.len() - 1;
    let i = dates[..last].partition_point(|&d| d < target);
    if i > 0 && dates[i - 1] + dates[i] > 2 * target {
        Some(i - 1)
    } else {
        Some(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(closes: &[f64]) -> Vec<PriceRow> {
        let start = NaiveDate::from_ymd_opt(2021, 1, 4).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceRow {
                date: start + chrono::Duration::days(i as i64),
                ticker: "AAPL".into(),
                close,
                volume: 1000.0 + i as f64,
                sector: None,
                ret: None,
                ma20: None,
            })
            .collect()
    }

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "actual={actual}, expected={expected}"
        );
    }

    #[test]
    fn returns_basic() {
        let r = one_day_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(r[0], None);
        assert_approx(r[1].unwrap(), 0.1);
        assert_approx(r[2].unwrap(), -0.1);
    }

    #[test]
    fn return_after_zero_close_is_none() {
        let r = one_day_returns(&[0.0, 5.0, 10.0]);
        assert_eq!(r[1], None);
        assert_approx(r[2].unwrap(), 1.0);
    }

    #[test]
    fn trailing_mean_short_prefix() {
        let m = trailing_mean(&[10.0, 20.0, 30.0, 40.0], 3);
        assert_approx(m[0], 10.0);
        assert_approx(m[1], 15.0);
        assert_approx(m[2], 20.0);
        assert_approx(m[3], 30.0);
    }

    #[test]
    fn build_series_sorts_by_date() {
        let mut data = rows(&[1.0, 2.0, 3.0]);
        data.reverse();
        let refs: Vec<&PriceRow> = data.iter().collect();
        let s = build_series(&refs, DEFAULT_MA_WINDOW);
        assert_eq!(s[0].close, 1.0);
        assert_eq!(s[2].close, 3.0);
        assert_eq!(s[0].ret, None);
    }

    #[test]
    fn normalized_starts_at_100() {
        let data = rows(&[50.0, 75.0, 25.0]);
        let refs: Vec<&PriceRow> = data.iter().collect();
        let mut s = build_series(&refs, DEFAULT_MA_WINDOW);
        apply_display_mode(&mut s, DisplayMode::Normalized);
        assert_approx(s[0].display_price, 100.0);
        assert_approx(s[1].display_price, 150.0);
        assert_approx(s[2].display_price, 50.0);
        assert_approx(s[1].display_ma.unwrap(), 125.0);
    }

    #[test]
    fn zero_base_falls_back_to_raw() {
        let data = rows(&[0.0, 75.0]);
        let refs: Vec<&PriceRow> = data.iter().collect();
        let mut s = build_series(&refs, DEFAULT_MA_WINDOW);
        apply_display_mode(&mut s, DisplayMode::Normalized);
        assert_eq!(s[1].display_price, 75.0);
    }

    #[test]
    fn nearest_index_center_bias() {
        let dates = [0, 10, 20];
        assert_eq!(nearest_index(&dates, -5), Some(0));
        assert_eq!(nearest_index(&dates, 4), Some(0));
        assert_eq!(nearest_index(&dates, 5), Some(1));
        assert_eq!(nearest_index(&dates, 16), Some(2));
        assert_eq!(nearest_index(&dates, 99), Some(2));
        assert_eq!(nearest_index(&[], 1), None);
    }

    #[test]
    fn display_mode_parsing() {
        assert_eq!("norm".parse::<DisplayMode>().unwrap(), DisplayMode::Normalized);
        assert_eq!("RAW".parse::<DisplayMode>().unwrap(), DisplayMode::Raw);
        assert!("log".parse::<DisplayMode>().is_err());
        assert_eq!(DisplayMode::Raw.toggled(), DisplayMode::Normalized);
    }
}
