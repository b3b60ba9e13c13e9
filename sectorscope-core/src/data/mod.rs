//! Dataset rows, CSV loading and the sample universe.

pub mod loader;
pub mod schema;
pub mod universe;

pub use loader::{
    load_company_summary, load_filings, load_filings_optional, load_prices, load_timeline_data,
    read_company_summary, read_filings, read_prices, LoadError, TimelineData,
};
pub use schema::{normalize_sector, CompanySummaryRow, FilingRow, FormType, PriceRow};
pub use universe::{Universe, UniverseError};
