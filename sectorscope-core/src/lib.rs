//! SectorScope Core: datasets, derived series, scales, and the two linked
//! chart models.
//!
//! - Loading of the company summary, price and filing CSVs
//! - One-day returns, trailing means and the display projection
//! - d3-compatible linear, sqrt, ordinal and time scales
//! - Scatter and timeline chart state, producing backend-neutral scenes
//! - The dashboard that routes one shared selection between the charts
//! - SVG export and TOML configuration

pub mod axis;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod format;
pub mod palette;
pub mod scale;
pub mod scatter;
pub mod scene;
pub mod selection;
pub mod series;
pub mod stats;
pub mod svg;
pub mod timeline;
