//! Sector-organized ticker lists.
//!
//! Used by the sample-data generator. A universe can be loaded from a TOML
//! file mapping sector names to ticker lists.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("failed to read universe {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid universe TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize universe: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("universe lists no tickers")]
    Empty,
}

/// The complete universe configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub sectors: BTreeMap<String, Vec<String>>,
}

impl Universe {
    /// Load a universe from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, UniverseError> {
        let content = std::fs::read_to_string(path).map_err(|source| UniverseError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a universe from a TOML string. Blank tickers are dropped; a
    /// universe with no tickers left is an error.
    pub fn from_toml(content: &str) -> Result<Self, UniverseError> {
        let mut universe: Self = toml::from_str(content)?;
        for tickers in universe.sectors.values_mut() {
            tickers.retain(|t| !t.trim().is_empty());
        }
        universe.sectors.retain(|_, tickers| !tickers.is_empty());
        if universe.ticker_count() == 0 {
            return Err(UniverseError::Empty);
        }
        Ok(universe)
    }

    /// All `(ticker, sector)` pairs, sectors in name order.
    pub fn members(&self) -> Vec<(&str, &str)> {
        self.sectors
            .iter()
            .flat_map(|(sector, tickers)| tickers.iter().map(move |t| (t.as_str(), sector.as_str())))
            .collect()
    }

    pub fn ticker_count(&self) -> usize {
        self.sectors.values().map(|v| v.len()).sum()
    }

    /// Eight large caps across four sectors.
    ///
    /// Sector labels are the raw ones the data pipeline emits; "Finance" is
    /// normalized to "Financials" when the summary is loaded.
    pub fn default_sample() -> Self {
        let mut sectors = BTreeMap::new();
        for (sector, tickers) in [
            ("Technology", ["AAPL", "MSFT"]),
            ("Energy", ["XOM", "CVX"]),
            ("Finance", ["JPM", "BAC"]),
            ("Healthcare", ["UNH", "PFE"]),
        ] {
            sectors.insert(
                sector.to_string(),
                tickers.into_iter().map(String::from).collect(),
            );
        }
        Self { sectors }
    }

    /// Serialize the universe to TOML.
    pub fn to_toml(&self) -> Result<String, UniverseError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_universe_has_eight_tickers() {
        let u = Universe::default_sample();
        assert_eq!(u.ticker_count(), 8);
        assert!(u.members().contains(&("JPM", "Finance")));
    }

    #[test]
    fn toml_roundtrip() {
        let u = Universe::default_sample();
        let parsed = Universe::from_toml(&u.to_toml().unwrap()).unwrap();
        assert_eq!(u, parsed);
    }

    #[test]
    fn parse_drops_blank_tickers() {
        let u = Universe::from_toml(
            "[sectors]\nUtilities = [\"NEE\", \" \"]\nMaterials = []\n",
        )
        .unwrap();
        assert_eq!(u.members(), vec![("NEE", "Utilities")]);
    }

    #[test]
    fn empty_or_malformed_universe_is_rejected() {
        assert!(matches!(
            Universe::from_toml("[sectors]\n"),
            Err(UniverseError::Empty)
        ));
        assert!(matches!(
            Universe::from_toml("sectors = 3"),
            Err(UniverseError::Parse(_))
        ));
        let err = Universe::from_file(Path::new("/nonexistent/universe.toml")).unwrap_err();
        assert!(matches!(err, UniverseError::Read { .. }));
    }

    #[test]
    fn members_follow_sector_order() {
        let u = Universe::default_sample();
        let members = u.members();
        assert_eq!(members[0], ("XOM", "Energy"));
        assert_eq!(members.len(), 8);
    }
}
