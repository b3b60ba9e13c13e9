//! Row types for the three input datasets.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One company in the summary dataset. `ticker` is the unique key.
///
/// `avg_return` and `volatility` are daily figures (mean and standard
/// deviation of one-day simple returns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySummaryRow {
    pub ticker: String,
    pub sector: String,
    pub avg_return: f64,
    pub volatility: f64,
    pub avg_volume: Option<f64>,
    pub n_days: Option<u32>,
}

/// One trading day for one ticker in the price dataset.
///
/// `ret` and `ma20` are carried through when the file provides them; the
/// timeline always recomputes its own derived fields from `close`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub ticker: String,
    pub close: f64,
    pub volume: f64,
    pub sector: Option<String>,
    pub ret: Option<f64>,
    pub ma20: Option<f64>,
}

/// One regulatory filing in the optional filings dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilingRow {
    pub ticker: String,
    pub filed_date: NaiveDate,
    pub form: String,
    pub title: Option<String>,
    pub url: Option<String>,
}

impl FilingRow {
    pub fn form_type(&self) -> FormType {
        FormType::parse(&self.form)
    }
}

/// Filing form families that get their own marker color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormType {
    Annual,
    Quarterly,
    Current,
    Other,
}

impl FormType {
    pub fn parse(form: &str) -> Self {
        match form.trim().to_ascii_uppercase().as_str() {
            "10-K" => FormType::Annual,
            "10-Q" => FormType::Quarterly,
            "8-K" => FormType::Current,
            _ => FormType::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormType::Annual => "10-K",
            FormType::Quarterly => "10-Q",
            FormType::Current => "8-K",
            FormType::Other => "Other",
        }
    }
}

/// Canonical sector label.
///
/// Missing or blank input becomes `"Unknown"`, any casing of `"finance"`
/// becomes `"Financials"`, everything else is trimmed and kept.
pub fn normalize_sector(raw: Option<&str>) -> String {
    let trimmed = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return "Unknown".to_string(),
    };
    if trimmed.eq_ignore_ascii_case("finance") {
        return "Financials".to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finance_becomes_financials() {
        assert_eq!(normalize_sector(Some("Finance")), "Financials");
        assert_eq!(normalize_sector(Some("  FINANCE ")), "Financials");
        assert_eq!(normalize_sector(Some("finance")), "Financials");
    }

    #[test]
    fn other_sectors_are_trimmed() {
        assert_eq!(normalize_sector(Some("  Energy ")), "Energy");
        assert_eq!(normalize_sector(Some("Financials")), "Financials");
    }

    #[test]
    fn missing_sector_is_unknown() {
        assert_eq!(normalize_sector(None), "Unknown");
        assert_eq!(normalize_sector(Some("   ")), "Unknown");
    }

    #[test]
    fn form_types() {
        assert_eq!(FormType::parse("10-K"), FormType::Annual);
        assert_eq!(FormType::parse("10-q"), FormType::Quarterly);
        assert_eq!(FormType::parse("8-K"), FormType::Current);
        assert_eq!(FormType::parse("S-1"), FormType::Other);
        assert_eq!(FormType::Quarterly.label(), "10-Q");
    }
}
