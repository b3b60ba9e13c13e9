//! Dashboard configuration loaded from TOML.
//!
//! Every field has a default, so a partial file (or no file at all) is valid.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::series::{DisplayMode, DEFAULT_MA_WINDOW};
use crate::stats::TRADING_DAYS_PER_YEAR;

pub const CONFIG_FILE: &str = "config.toml";
pub const APP_DIR: &str = "sectorscope";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Where the datasets live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub summary: PathBuf,
    pub prices: PathBuf,
    pub filings: Option<PathBuf>,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            summary: PathBuf::from("data/companies_summary.csv"),
            prices: PathBuf::from("data/prices_long.csv"),
            filings: Some(PathBuf::from("data/filings.csv")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data: DataPaths,
    pub display_mode: DisplayMode,
    /// Delay before the first ticker is selected automatically.
    pub auto_select_delay_ms: u64,
    pub ma_window: usize,
    pub trading_days: u32,
    /// Initial viewport width in pixels; each chart clamps it.
    pub width: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data: DataPaths::default(),
            display_mode: DisplayMode::Raw,
            auto_select_delay_ms: 600,
            ma_window: DEFAULT_MA_WINDOW,
            trading_days: TRADING_DAYS_PER_YEAR,
            width: 920.0,
        }
    }
}

impl DashboardConfig {
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content, path)
    }

    /// Resolve the config: an explicit path must exist; the fallback
    /// (usually the per-user config file) is used only if present.
    pub fn load(explicit: Option<&Path>, fallback: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match fallback {
            Some(path) if path.is_file() => {
                log::info!("loading config from {}", path.display());
                Self::from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// `<config_dir>/sectorscope/config.toml` for a given base directory.
    pub fn default_path(config_dir: &Path) -> PathBuf {
        config_dir.join(APP_DIR).join(CONFIG_FILE)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn auto_select_delay(&self) -> Duration {
        Duration::from_millis(self.auto_select_delay_ms)
    }
}
