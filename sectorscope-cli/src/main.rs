//! SectorScope CLI: render, summarize and sample commands.
//!
//! Commands:
//! - `render`: replay dashboard controls and export both charts as SVG
//! - `summarize`: build the company summary CSV from a price CSV
//! - `sample`: write a synthetic dataset for a sector universe

mod render;
mod sample;
mod summarize;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use sectorscope_core::config::DashboardConfig;
use sectorscope_core::data::Universe;
use sectorscope_core::series::DisplayMode;

use crate::render::RenderRequest;
use crate::sample::SampleOptions;

#[derive(Parser)]
#[command(
    name = "sectorscope",
    version,
    about = "SectorScope CLI — sector scatter and price timeline charts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Dataset locations; each flag overrides the config file.
#[derive(Args, Debug, Default)]
struct DataArgs {
    /// Config file (default: <config dir>/sectorscope/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Company summary CSV.
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Long-format price CSV.
    #[arg(long)]
    prices: Option<PathBuf>,

    /// Filings CSV.
    #[arg(long)]
    filings: Option<PathBuf>,
}

impl DataArgs {
    fn resolve(&self) -> Result<DashboardConfig> {
        let fallback = dirs::config_dir().map(|d| DashboardConfig::default_path(&d));
        let mut config = DashboardConfig::load(self.config.as_deref(), fallback.as_deref())
            .context("loading configuration")?;
        if let Some(p) = &self.summary {
            config.data.summary = p.clone();
        }
        if let Some(p) = &self.prices {
            config.data.prices = p.clone();
        }
        if let Some(p) = &self.filings {
            config.data.filings = Some(p.clone());
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Export scatter.svg and timeline.svg for a selection.
    Render {
        #[command(flatten)]
        data: DataArgs,

        /// Company to select. Defaults to the first one, as on startup.
        #[arg(long)]
        ticker: Option<String>,

        /// Sector filter applied before selecting.
        #[arg(long)]
        sector: Option<String>,

        /// Display mode: raw or normalized.
        #[arg(long)]
        mode: Option<DisplayMode>,

        /// Brush the timeline to one calendar year.
        #[arg(long)]
        year: Option<i32>,

        /// Viewport width in pixels.
        #[arg(long)]
        width: Option<f64>,

        /// Output directory.
        #[arg(long, default_value = "out")]
        out: PathBuf,

        /// Also dump both scenes as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Build the company summary CSV from a price CSV.
    Summarize {
        /// Long-format price CSV.
        #[arg(long)]
        prices: PathBuf,

        /// Output CSV.
        #[arg(long)]
        out: PathBuf,
    },
    /// Write synthetic prices, summary and filings.
    Sample {
        /// Output directory.
        #[arg(long, default_value = "data")]
        out: PathBuf,

        /// RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// First date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,

        /// Trading days per ticker.
        #[arg(long, default_value_t = 750)]
        days: usize,

        /// Universe TOML (`[sectors]` table of ticker lists). Defaults to
        /// eight large caps across four sectors.
        #[arg(long)]
        universe: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            data,
            ticker,
            sector,
            mode,
            year,
            width,
            out,
            json,
        } => {
            let config = data.resolve()?;
            let request = RenderRequest {
                ticker,
                sector,
                mode,
                year,
                width,
            };
            run_render(&config, &request, &out, json)
        }
        Commands::Summarize { prices, out } => {
            let n = summarize::run(&prices, &out)?;
            println!("Wrote {n} companies to {}", out.display());
            Ok(())
        }
        Commands::Sample {
            out,
            seed,
            start,
            days,
            universe,
        } => {
            let mut options = SampleOptions {
                seed,
                days,
                ..SampleOptions::default()
            };
            if let Some(s) = start {
                options.start = NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                    .with_context(|| format!("invalid --start '{s}'"))?;
            }
            let universe = match universe {
                Some(path) => Universe::from_file(&path)?,
                None => Universe::default_sample(),
            };
            let data = sample::run(&out, &universe, &options)?;
            println!(
                "Wrote {} price rows and {} filings to {}",
                data.prices.len(),
                data.filings.len(),
                out.display()
            );
            Ok(())
        }
    }
}

fn run_render(
    config: &DashboardConfig,
    request: &RenderRequest,
    out: &std::path::Path,
    json: bool,
) -> Result<()> {
    let dashboard = render::replay(config, request)?;
    render::warn_failures(&dashboard);
    let rendered = render::write_outputs(&dashboard, out, json)?;

    println!("{}", dashboard.badge_text());
    println!("{}", dashboard.range_badge());
    println!("Wrote {}", rendered.scatter.display());
    println!("Wrote {}", rendered.timeline.display());
    if let Some(path) = rendered.scenes {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
