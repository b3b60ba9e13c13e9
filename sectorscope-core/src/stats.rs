//! Aggregate statistics: annualization and per-company summaries.

use crate::data::{normalize_sector, CompanySummaryRow, PriceRow};
use crate::series::one_day_returns;

/// Trading days used to annualize daily figures.
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// `(1 + mu)^days - 1`, or `None` when `mu` is not finite.
pub fn annualized_return(mu_daily: f64, days: u32) -> Option<f64> {
    mu_daily
        .is_finite()
        .then(|| (1.0 + mu_daily).powi(days as i32) - 1.0)
}

/// `sd * sqrt(days)`, or `None` when `sd` is not finite.
pub fn annualized_volatility(sd_daily: f64, days: u32) -> Option<f64> {
    sd_daily
        .is_finite()
        .then(|| sd_daily * f64::from(days).sqrt())
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator). Needs two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Summarize one ticker's price history.
///
/// Returns are one-day simple returns over the date-sorted rows. The first
/// non-empty `sector` cell labels the company. `None` when fewer than two
/// returns exist (volatility undefined).
pub fn summarize_ticker(ticker: &str, rows: &[&PriceRow]) -> Option<CompanySummaryRow> {
    let mut sorted: Vec<&PriceRow> = rows.to_vec();
    sorted.sort_by_key(|r| r.date);

    let closes: Vec<f64> = sorted.iter().map(|r| r.close).collect();
    let returns: Vec<f64> = one_day_returns(&closes).into_iter().flatten().collect();
    let volumes: Vec<f64> = sorted.iter().map(|r| r.volume).collect();

    let sector = sorted
        .iter()
        .find_map(|r| r.sector.as_deref().filter(|s| !s.trim().is_empty()));

    Some(CompanySummaryRow {
        ticker: ticker.to_string(),
        sector: normalize_sector(sector),
        avg_return: mean(&returns)?,
        volatility: sample_std(&returns)?,
        avg_volume: mean(&volumes),
        n_days: Some(returns.len() as u32),
    })
}
