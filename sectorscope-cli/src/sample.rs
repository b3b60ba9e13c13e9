//! `sample`: synthetic datasets for a sector universe.
//!
//! Prices follow a seeded random walk over weekdays. Each company files a
//! 10-K in February, a 10-Q in May, August and November, and an 8-K now
//! and then.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use sectorscope_core::data::{FilingRow, PriceRow, Universe};

use crate::summarize::{summarize, write_summary};

pub const PRICES_FILE: &str = "prices_long.csv";
pub const SUMMARY_FILE: &str = "companies_summary.csv";
pub const FILINGS_FILE: &str = "filings.csv";
pub const UNIVERSE_FILE: &str = "universe.toml";

/// Chance of an 8-K on any trading day.
const CURRENT_REPORT_ODDS: f64 = 0.012;

#[derive(Debug, Clone)]
pub struct SampleOptions {
    pub seed: u64,
    pub start: NaiveDate,
    /// Trading days per ticker.
    pub days: usize,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            start: NaiveDate::from_ymd_opt(2019, 1, 2).unwrap_or_default(),
            days: 750,
        }
    }
}

#[derive(Debug, Serialize)]
struct PriceRecord<'a> {
    date: NaiveDate,
    ticker: &'a str,
    close: f64,
    volume: f64,
    sector: &'a str,
}

#[derive(Debug, Default)]
pub struct SampleData {
    pub prices: Vec<PriceRow>,
    pub filings: Vec<FilingRow>,
}

/// `count` weekdays starting at `start` (or the next weekday).
pub fn trading_days(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(count);
    let mut day = start;
    while days.len() < count {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(day);
        }
        day += Duration::days(1);
    }
    days
}

fn filing(ticker: &str, date: NaiveDate, form: &str, title: &str) -> FilingRow {
    FilingRow {
        ticker: ticker.to_string(),
        filed_date: date,
        form: form.to_string(),
        title: Some(title.to_string()),
        url: Some(format!(
            "https://www.sec.gov/cgi-bin/browse-edgar?action=getcompany&CIK={ticker}&type={form}"
        )),
    }
}

pub fn generate(universe: &Universe, options: &SampleOptions) -> SampleData {
    let mut rng = StdRng::seed_from_u64(options.seed);
    let days = trading_days(options.start, options.days);
    let mut data = SampleData::default();

    for (ticker, sector) in universe.members() {
        let drift: f64 = rng.gen_range(-0.0002..0.0009);
        let vol: f64 = rng.gen_range(0.008..0.024);
        let base_volume: f64 = rng.gen_range(5.0e6..6.0e7);
        let mut close: f64 = rng.gen_range(40.0..400.0);
        let mut last_month = None;

        for &date in &days {
            // Uniform noise scaled to unit variance.
            let shock = rng.gen_range(-1.0f64..1.0) * 3f64.sqrt();
            close = (close * (1.0 + drift + vol * shock)).max(1.0);
            let volume = (base_volume * (1.0 + 0.35 * rng.gen_range(-1.0f64..1.0))).round();

            data.prices.push(PriceRow {
                date,
                ticker: ticker.to_string(),
                close: (close * 100.0).round() / 100.0,
                volume,
                sector: Some(sector.to_string()),
                ret: None,
                ma20: None,
            });

            let month = (date.year(), date.month());
            if last_month != Some(month) {
                last_month = Some(month);
                match date.month() {
                    2 => data.filings.push(filing(ticker, date, "10-K", "Annual report")),
                    5 | 8 | 11 => data.filings.push(filing(ticker, date, "10-Q", "Quarterly report")),
                    _ => {}
                }
            } else if rng.gen_bool(CURRENT_REPORT_ODDS) {
                data.filings.push(filing(ticker, date, "8-K", "Current report"));
            }
        }
    }
    data
}

fn write_prices(path: &Path, prices: &[PriceRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in prices {
        wtr.serialize(PriceRecord {
            date: row.date,
            ticker: &row.ticker,
            close: row.close,
            volume: row.volume,
            sector: row.sector.as_deref().unwrap_or_default(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_filings(path: &Path, filings: &[FilingRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in filings {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write all three datasets into `out`, plus the universe they were drawn from.
pub fn run(out: &Path, universe: &Universe, options: &SampleOptions) -> Result<SampleData> {
    fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;
    let data = generate(universe, options);

    write_prices(&out.join(PRICES_FILE), &data.prices)?;
    write_summary(&out.join(SUMMARY_FILE), &summarize(&data.prices))?;
    write_filings(&out.join(FILINGS_FILE), &data.filings)?;
    let universe_path = out.join(UNIVERSE_FILE);
    fs::write(&universe_path, universe.to_toml()?)
        .with_context(|| format!("writing {}", universe_path.display()))?;

    info!(
        "sample: {} tickers, {} price rows, {} filings in {}",
        universe.ticker_count(),
        data.prices.len(),
        data.filings.len(),
        out.display()
    );
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sectorscope_core::data::{load_company_summary, load_timeline_data};

    #[test]
    fn trading_days_skip_weekends() {
        // 2024-01-06 is a Saturday.
        let start = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        let days = trading_days(start, 3);
        assert_eq!(
            days,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            ]
        );
    }

    #[test]
    fn same_seed_same_data() {
        let options = SampleOptions {
            days: 60,
            ..SampleOptions::default()
        };
        let a = generate(&Universe::default_sample(), &options);
        let b = generate(&Universe::default_sample(), &options);
        assert_eq!(a.prices, b.prices);
        assert_eq!(a.filings, b.filings);
        assert_eq!(a.prices.len(), 8 * 60);
    }

    #[test]
    fn every_company_files_annual_and_quarterly_reports() {
        let data = generate(&Universe::default_sample(), &SampleOptions::default());
        for (ticker, _) in Universe::default_sample().members() {
            let forms: Vec<&str> = data
                .filings
                .iter()
                .filter(|f| f.ticker == ticker)
                .map(|f| f.form.as_str())
                .collect();
            assert!(forms.contains(&"10-K"), "{ticker} has no 10-K");
            assert!(forms.contains(&"10-Q"), "{ticker} has no 10-Q");
        }
    }

    #[test]
    fn written_files_load() {
        let dir = tempfile::tempdir().unwrap();
        let options = SampleOptions {
            days: 120,
            ..SampleOptions::default()
        };
        run(dir.path(), &Universe::default_sample(), &options).unwrap();

        let summary = load_company_summary(&dir.path().join(SUMMARY_FILE)).unwrap();
        assert_eq!(summary.len(), 8);
        assert!(summary.iter().any(|r| r.ticker == "JPM" && r.sector == "Financials"));

        let filings = dir.path().join(FILINGS_FILE);
        let timeline = load_timeline_data(&dir.path().join(PRICES_FILE), Some(&filings)).unwrap();
        assert_eq!(timeline.prices.len(), 8 * 120);
        assert!(!timeline.filings.is_empty());

        let universe = Universe::from_file(&dir.path().join(UNIVERSE_FILE)).unwrap();
        assert_eq!(universe, Universe::default_sample());
    }

    #[test]
    fn custom_universe_drives_tickers_and_sectors() {
        let universe =
            Universe::from_toml("[sectors]\nUtilities = [\"NEE\", \"DUK\"]\n").unwrap();
        let options = SampleOptions {
            days: 40,
            ..SampleOptions::default()
        };
        let data = generate(&universe, &options);
        assert_eq!(data.prices.len(), 2 * 40);
        assert!(data
            .prices
            .iter()
            .all(|p| p.sector.as_deref() == Some("Utilities")));
        let summary = summarize(&data.prices);
        let tickers: Vec<&str> = summary.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["DUK", "NEE"]);
    }

    #[test]
    fn volumes_are_whole_and_positive() {
        let options = SampleOptions {
            days: 30,
            ..SampleOptions::default()
        };
        let data = generate(&Universe::default_sample(), &options);
        assert!(data
            .prices
            .iter()
            .all(|p| p.volume > 0.0 && p.volume.fract() == 0.0 && p.close >= 1.0));
    }
}
