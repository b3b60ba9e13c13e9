//! CSV loaders for the summary, price and filings datasets.
//!
//! Header aliases are resolved with a fixed precedence; for each row the
//! first alias whose cell is non-empty wins. Rows that miss a key field or
//! carry a non-finite required number are dropped, never the whole file.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info};
use thiserror::Error;

use super::schema::{normalize_sector, CompanySummaryRow, FilingRow, PriceRow};

/// Ticker header aliases, highest precedence first.
pub const TICKER_COLUMNS: &[&str] = &["ticker", "Ticker", "symbol", "Symbol"];
/// Close-price header aliases, highest precedence first.
pub const CLOSE_COLUMNS: &[&str] = &["close", "adj_close", "Close"];
/// Volume header aliases, highest precedence first.
pub const VOLUME_COLUMNS: &[&str] = &["volume", "Volume"];
/// Date header aliases for the price dataset.
pub const DATE_COLUMNS: &[&str] = &["date", "Date"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors that make a dataset unusable as a whole.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("no usable {dataset} rows")]
    Empty { dataset: &'static str },
}

/// Price rows plus the (possibly empty) filings that go with them.
#[derive(Debug, Clone, Default)]
pub struct TimelineData {
    pub prices: Vec<PriceRow>,
    pub filings: Vec<FilingRow>,
}

/// Positions of one logical column, aliases in precedence order.
#[derive(Debug, Clone)]
struct Column {
    indices: Vec<usize>,
}

impl Column {
    fn find(headers: &StringRecord, aliases: &[&str]) -> Self {
        let indices = aliases
            .iter()
            .filter_map(|alias| headers.iter().position(|h| h == *alias))
            .collect();
        Self { indices }
    }

    fn require(
        headers: &StringRecord,
        aliases: &[&str],
        column: &'static str,
    ) -> Result<Self, LoadError> {
        let found = Self::find(headers, aliases);
        if found.indices.is_empty() {
            return Err(LoadError::MissingColumn { column });
        }
        Ok(found)
    }

    fn get<'r>(&self, record: &'r StringRecord) -> Option<&'r str> {
        self.indices
            .iter()
            .filter_map(|&i| record.get(i))
            .map(str::trim)
            .find(|cell| !cell.is_empty())
    }

    /// Cell as a number; missing or unparsable cells become NaN.
    fn number(&self, record: &StringRecord) -> f64 {
        self.get(record)
            .and_then(|cell| cell.parse::<f64>().ok())
            .unwrap_or(f64::NAN)
    }

    /// Cell as a finite number, or `None`.
    fn optional_number(&self, record: &StringRecord) -> Option<f64> {
        Some(self.number(record)).filter(|v| v.is_finite())
    }

    fn text(&self, record: &StringRecord) -> Option<String> {
        self.get(record).map(str::to_string)
    }

    fn date(&self, record: &StringRecord) -> Option<NaiveDate> {
        self.get(record)
            .and_then(|cell| NaiveDate::parse_from_str(cell, DATE_FORMAT).ok())
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Pull the next record, treating undecodable rows as droppable.
///
/// Only I/O failures abort the load.
fn next_record(
    result: Result<StringRecord, csv::Error>,
    dropped: &mut usize,
) -> Result<Option<StringRecord>, LoadError> {
    match result {
        Ok(record) => Ok(Some(record)),
        Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => Err(e.into()),
        Err(e) => {
            debug!("skipping undecodable row: {e}");
            *dropped += 1;
            Ok(None)
        }
    }
}

/// Parse a company summary CSV.
pub fn read_company_summary<R: Read>(reader: R) -> Result<Vec<CompanySummaryRow>, LoadError> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?.clone();

    let ticker = Column::require(&headers, TICKER_COLUMNS, "ticker")?;
    let avg_return = Column::require(&headers, &["avg_return"], "avg_return")?;
    let volatility = Column::require(&headers, &["volatility"], "volatility")?;
    let sector = Column::find(&headers, &["sector"]);
    let avg_volume = Column::find(&headers, &["avg_volume"]);
    let n_days = Column::find(&headers, &["n_days"]);

    let mut rows = Vec::new();
    let mut seen = HashSet::new();
    let mut dropped = 0usize;

    for result in rdr.records() {
        let Some(record) = next_record(result, &mut dropped)? else {
            continue;
        };

        let row = CompanySummaryRow {
            ticker: ticker.text(&record).unwrap_or_default(),
            sector: normalize_sector(sector.get(&record)),
            avg_return: avg_return.number(&record),
            volatility: volatility.number(&record),
            avg_volume: avg_volume.optional_number(&record),
            n_days: n_days
                .optional_number(&record)
                .filter(|v| *v >= 0.0)
                .map(|v| v.round() as u32),
        };

        if row.ticker.is_empty() || !row.avg_return.is_finite() || !row.volatility.is_finite() {
            dropped += 1;
            continue;
        }
        if !seen.insert(row.ticker.clone()) {
            debug!("duplicate summary row for {} ignored", row.ticker);
            dropped += 1;
            continue;
        }
        rows.push(row);
    }

    debug!("company summary: kept {} rows, dropped {dropped}", rows.len());
    if rows.is_empty() {
        return Err(LoadError::Empty { dataset: "company summary" });
    }
    Ok(rows)
}

/// Parse a long-format price CSV (one row per ticker per day).
pub fn read_prices<R: Read>(reader: R) -> Result<Vec<PriceRow>, LoadError> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?.clone();

    let date = Column::require(&headers, DATE_COLUMNS, "date")?;
    let ticker = Column::require(&headers, TICKER_COLUMNS, "ticker")?;
    let close = Column::require(&headers, CLOSE_COLUMNS, "close")?;
    let volume = Column::require(&headers, VOLUME_COLUMNS, "volume")?;
    let sector = Column::find(&headers, &["sector"]);
    let ret = Column::find(&headers, &["ret"]);
    let ma20 = Column::find(&headers, &["ma20"]);

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for result in rdr.records() {
        let Some(record) = next_record(result, &mut dropped)? else {
            continue;
        };

        let (Some(day), Some(symbol)) = (date.date(&record), ticker.text(&record)) else {
            dropped += 1;
            continue;
        };
        let close_value = close.number(&record);
        let volume_value = volume.number(&record);
        if !close_value.is_finite() || !volume_value.is_finite() {
            dropped += 1;
            continue;
        }

        rows.push(PriceRow {
            date: day,
            ticker: symbol,
            close: close_value,
            volume: volume_value,
            sector: sector.text(&record),
            ret: ret.optional_number(&record),
            ma20: ma20.optional_number(&record),
        });
    }

    debug!("prices: kept {} rows, dropped {dropped}", rows.len());
    if rows.is_empty() {
        return Err(LoadError::Empty { dataset: "price" });
    }
    Ok(rows)
}

/// Parse a filings CSV. Rows without a ticker or a parsable date are dropped.
pub fn read_filings<R: Read>(reader: R) -> Result<Vec<FilingRow>, LoadError> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?.clone();

    let ticker = Column::require(&headers, TICKER_COLUMNS, "ticker")?;
    let filed_date = Column::require(&headers, &["filed_date"], "filed_date")?;
    let form = Column::find(&headers, &["form"]);
    let title = Column::find(&headers, &["title"]);
    let url = Column::find(&headers, &["url"]);

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for result in rdr.records() {
        let Some(record) = next_record(result, &mut dropped)? else {
            continue;
        };
        let (Some(symbol), Some(day)) = (ticker.text(&record), filed_date.date(&record)) else {
            dropped += 1;
            continue;
        };
        rows.push(FilingRow {
            ticker: symbol,
            filed_date: day,
            form: form.text(&record).unwrap_or_default(),
            title: title.text(&record),
            url: url.text(&record),
        });
    }

    debug!("filings: kept {} rows, dropped {dropped}", rows.len());
    Ok(rows)
}

pub fn load_company_summary(path: &Path) -> Result<Vec<CompanySummaryRow>, LoadError> {
    let rows = read_company_summary(open(path)?)?;
    info!("loaded {} companies from {}", rows.len(), path.display());
    Ok(rows)
}

pub fn load_prices(path: &Path) -> Result<Vec<PriceRow>, LoadError> {
    let rows = read_prices(open(path)?)?;
    info!("loaded {} price rows from {}", rows.len(), path.display());
    Ok(rows)
}

pub fn load_filings(path: &Path) -> Result<Vec<FilingRow>, LoadError> {
    read_filings(open(path)?)
}

/// Load filings if configured. Any failure yields an empty set.
pub fn load_filings_optional(path: Option<&Path>) -> Vec<FilingRow> {
    let Some(path) = path else {
        return Vec::new();
    };
    match load_filings(path) {
        Ok(rows) => {
            info!("loaded {} filings from {}", rows.len(), path.display());
            rows
        }
        Err(e) => {
            debug!("filings unavailable ({}): {e}", path.display());
            Vec::new()
        }
    }
}

/// Load everything the timeline needs. Only the price file is required.
pub fn load_timeline_data(
    prices: &Path,
    filings: Option<&Path>,
) -> Result<TimelineData, LoadError> {
    let prices = load_prices(prices)?;
    let filings = load_filings_optional(filings);
    Ok(TimelineData { prices, filings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn summary_drops_missing_ticker_and_non_finite_numbers() {
        let csv = "\
ticker,sector,avg_return,volatility,avg_volume,n_days
AAPL,Technology,0.001,0.02,1000000,1500
,Energy,0.001,0.02,10,10
XOM,Energy,NaN,0.02,10,10
CVX,Energy,0.001,,10,10
JPM,Finance,0.0005,0.015,,
BAC,finance,abc,0.015,,
";
        let rows = read_company_summary(csv.as_bytes()).unwrap();
        let tickers: Vec<&str> = rows.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["AAPL", "JPM"]);
        assert_eq!(rows[1].sector, "Financials");
        assert_eq!(rows[1].avg_volume, None);
        assert_eq!(rows[1].n_days, None);
        assert_eq!(rows[0].n_days, Some(1500));
    }

    #[test]
    fn summary_ticker_alias_precedence() {
        let csv = "\
Symbol,Ticker,avg_return,volatility
SYM,TICK,0.1,0.2
SYM2,,0.1,0.2
";
        let rows = read_company_summary(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].ticker, "TICK");
        assert_eq!(rows[1].ticker, "SYM2");
    }

    #[test]
    fn summary_keeps_first_duplicate() {
        let csv = "ticker,avg_return,volatility\nAAPL,0.1,0.2\nAAPL,0.3,0.4\n";
        let rows = read_company_summary(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].avg_return, 0.1);
    }

    #[test]
    fn summary_requires_core_columns() {
        let csv = "ticker,sector,volatility\nAAPL,Tech,0.1\n";
        let err = read_company_summary(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { column: "avg_return" }));
    }

    #[test]
    fn prices_drop_rules() {
        let csv = "\
date,ticker,close,volume,ret,ma20
2021-01-04,AAPL,129.41,143301900,,
2021-01-05,AAPL,131.01,97664900,0.0124,130.2
not-a-date,AAPL,131.01,97664900,,
2021-01-06,,126.6,155088000,,
2021-01-07,AAPL,inf,155088000,,
2021-01-08,AAPL,130.0,,,
";
        let rows = read_prices(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ret, None);
        assert_eq!(rows[1].ret, Some(0.0124));
        assert_eq!(rows[1].ma20, Some(130.2));
    }

    #[test]
    fn prices_close_alias_precedence() {
        let csv = "\
date,Ticker,Close,adj_close,Volume
2021-01-04,AAPL,10.0,9.5,100
2021-01-05,AAPL,11.0,,100
";
        let rows = read_prices(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].close, 9.5);
        assert_eq!(rows[1].close, 11.0);
        assert_eq!(rows[0].ticker, "AAPL");
    }

    #[test]
    fn empty_datasets_are_errors() {
        let err = read_company_summary("ticker,sector,avg_return,volatility\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Empty { dataset: "company summary" }));

        let all_dropped = "ticker,avg_return,volatility\nAAPL,NaN,0.2\n";
        assert!(matches!(
            read_company_summary(all_dropped.as_bytes()),
            Err(LoadError::Empty { .. })
        ));

        let err = read_prices("date,ticker,close,volume\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Empty { dataset: "price" }));
        assert_eq!(err.to_string(), "no usable price rows");
    }

    #[test]
    fn header_only_filings_are_fine() {
        let rows = read_filings("ticker,filed_date,form\n".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn filings_drop_rows_without_date() {
        let csv = "\
ticker,filed_date,form,title,url
AAPL,2021-01-29,10-Q,Quarterly report,https://example.com/q
AAPL,,10-K,,
MSFT,2021-07-29,8-K,,
";
        let rows = read_filings(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].url.as_deref(), Some("https://example.com/q"));
        assert_eq!(rows[1].title, None);
    }

    #[test]
    fn missing_filings_file_is_empty() {
        let rows = load_filings_optional(Some(Path::new("/nonexistent/filings.csv")));
        assert!(rows.is_empty());
        assert!(load_filings_optional(None).is_empty());
    }

    #[test]
    fn missing_price_file_is_an_error() {
        let err = load_timeline_data(Path::new("/nonexistent/prices.csv"), None).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("companies_summary.csv");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "ticker,sector,avg_return,volatility,avg_volume,n_days").unwrap();
        writeln!(f, "MSFT,Technology,0.0009,0.018,30000000,1700").unwrap();
        drop(f);

        let rows = load_company_summary(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ticker, "MSFT");
    }
}
