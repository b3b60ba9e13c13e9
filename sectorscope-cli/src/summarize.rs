//! `summarize`: company summary CSV from a long price CSV.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use rayon::prelude::*;

use sectorscope_core::data::{load_prices, CompanySummaryRow, PriceRow};
use sectorscope_core::stats::summarize_ticker;

/// One summary row per ticker with at least two returns, sorted by ticker.
pub fn summarize(prices: &[PriceRow]) -> Vec<CompanySummaryRow> {
    let mut by_ticker: BTreeMap<&str, Vec<&PriceRow>> = BTreeMap::new();
    for row in prices {
        by_ticker.entry(row.ticker.as_str()).or_default().push(row);
    }

    let groups: Vec<(&str, Vec<&PriceRow>)> = by_ticker.into_iter().collect();
    let mut rows: Vec<CompanySummaryRow> = groups
        .par_iter()
        .filter_map(|(ticker, rows)| {
            let summary = summarize_ticker(ticker, rows);
            if summary.is_none() {
                warn!("{ticker}: fewer than two returns, skipped");
            }
            summary
        })
        .collect();
    rows.sort_by(|a, b| a.ticker.cmp(&b.ticker));
    rows
}

pub fn write_summary(path: &Path, rows: &[CompanySummaryRow]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn run(prices: &Path, out: &Path) -> Result<usize> {
    let rows = load_prices(prices).with_context(|| format!("loading {}", prices.display()))?;
    let summary = summarize(&rows);
    write_summary(out, &summary)?;
    info!("wrote {} companies to {}", summary.len(), out.display());
    Ok(summary.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sectorscope_core::data::load_company_summary;

    fn price(ticker: &str, day: u32, close: f64) -> PriceRow {
        PriceRow {
            date: NaiveDate::from_ymd_opt(2023, 5, day).unwrap(),
            ticker: ticker.into(),
            close,
            volume: 1000.0,
            sector: Some("Energy".into()),
            ret: None,
            ma20: None,
        }
    }

    #[test]
    fn sorted_and_thin_tickers_dropped() {
        let prices = vec![
            price("XOM", 1, 100.0),
            price("XOM", 2, 102.0),
            price("XOM", 3, 101.0),
            price("CVX", 1, 50.0),
            price("CVX", 2, 51.0),
            price("CVX", 3, 52.0),
            price("BP", 1, 30.0),
        ];
        let rows = summarize(&prices);
        let tickers: Vec<&str> = rows.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["CVX", "XOM"]);
        assert_eq!(rows[0].n_days, Some(2));
        assert_eq!(rows[0].avg_volume, Some(1000.0));
    }

    #[test]
    fn written_summary_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("summary.csv");
        let prices = vec![price("XOM", 1, 100.0), price("XOM", 2, 102.0), price("XOM", 3, 101.0)];
        let rows = summarize(&prices);
        write_summary(&out, &rows).unwrap();

        let loaded = load_company_summary(&out).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].ticker, "XOM");
        assert_eq!(loaded[0].sector, "Energy");
        assert!((loaded[0].avg_return - rows[0].avg_return).abs() < 1e-12);
    }
}
