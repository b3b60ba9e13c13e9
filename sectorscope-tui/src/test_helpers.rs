//! Test helpers for creating mock data

use chrono::NaiveDate;
use sectorscope_core::data::{CompanySummaryRow, FilingRow, PriceRow, TimelineData};

pub fn summary_rows() -> Vec<CompanySummaryRow> {
    [("AAPL", "Technology"), ("MSFT", "Technology"), ("XOM", "Energy")]
        .iter()
        .enumerate()
        .map(|(i, (ticker, sector))| CompanySummaryRow {
            ticker: ticker.to_string(),
            sector: sector.to_string(),
            avg_return: 0.001 * (i + 1) as f64,
            volatility: 0.01 * (i + 1) as f64,
            avg_volume: Some(1.0e6 * (i + 1) as f64),
            n_days: Some(250),
        })
        .collect()
}

pub fn timeline_data() -> TimelineData {
    let start = NaiveDate::from_ymd_opt(2021, 1, 4).unwrap();
    let prices = ["AAPL", "MSFT", "XOM"]
        .iter()
        .flat_map(|ticker| {
            (0..400).map(move |i| PriceRow {
                date: start + chrono::Duration::days(i),
                ticker: ticker.to_string(),
                close: 120.0 + (i as f64 / 9.0).sin() * 6.0,
                volume: 2.0e6 + (i % 5) as f64 * 1.0e5,
                sector: None,
                ret: None,
                ma20: None,
            })
        })
        .collect();
    let filings = vec![FilingRow {
        ticker: "AAPL".into(),
        filed_date: NaiveDate::from_ymd_opt(2021, 7, 28).unwrap(),
        form: "10-Q".into(),
        title: Some("Quarterly report".into()),
        url: Some("https://www.sec.gov/example".into()),
    }];
    TimelineData { prices, filings }
}
