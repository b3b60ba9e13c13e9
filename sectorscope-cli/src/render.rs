//! `render`: replay an interactive session and export both charts.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::info;
use serde_json::json;

use sectorscope_core::config::DashboardConfig;
use sectorscope_core::dashboard::{ChartSlot, Dashboard, DashboardEvent};
use sectorscope_core::data::{load_company_summary, load_timeline_data};
use sectorscope_core::series::DisplayMode;
use sectorscope_core::svg;

/// What the user would have done in the browser, in order.
#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    pub ticker: Option<String>,
    pub sector: Option<String>,
    pub mode: Option<DisplayMode>,
    pub year: Option<i32>,
    pub width: Option<f64>,
}

impl RenderRequest {
    /// Dashboard events in the order the controls would be used.
    pub fn events(&self, current_mode: DisplayMode) -> Vec<DashboardEvent> {
        let mut events = Vec::new();
        if let Some(width) = self.width {
            events.push(DashboardEvent::Resize { width });
        }
        if let Some(sector) = &self.sector {
            events.push(DashboardEvent::SectorChanged(sector.clone()));
        }
        if let Some(ticker) = &self.ticker {
            events.push(DashboardEvent::TickerChanged(ticker.clone()));
        }
        if self.mode.is_some_and(|m| m != current_mode) {
            events.push(DashboardEvent::ToggleMode);
        }
        if let Some(year) = self.year {
            events.push(DashboardEvent::JumpToYear(year));
        }
        events
    }
}

/// Build the dashboard from the configured files and replay `request`.
pub fn replay(config: &DashboardConfig, request: &RenderRequest) -> Result<Dashboard> {
    let mut dashboard = Dashboard::new(config);

    let summary = load_company_summary(&config.data.summary)
        .map_err(|e| format!("{}: {e}", config.data.summary.display()));
    dashboard.handle(DashboardEvent::SummaryLoaded(summary));

    let timeline = load_timeline_data(&config.data.prices, config.data.filings.as_deref())
        .map_err(|e| format!("{}: {e}", config.data.prices.display()));
    dashboard.handle(DashboardEvent::TimelineLoaded(timeline));

    for event in request.events(dashboard.mode()) {
        dashboard.handle(event);
    }

    let scatter_ready = dashboard.scatter().ready().is_some();
    match &request.ticker {
        // a failed scatter is drawn inline; there is nothing to select from
        Some(_) if !scatter_ready => {}
        Some(ticker) if dashboard.selected() != Some(ticker.as_str()) => {
            bail!("ticker '{ticker}' is not among the companies shown");
        }
        Some(_) => {}
        None => {
            // Same bootstrap as the interactive view.
            dashboard.tick(config.auto_select_delay());
        }
    }
    Ok(dashboard)
}

/// Files written by [`write_outputs`].
#[derive(Debug)]
pub struct Rendered {
    pub scatter: PathBuf,
    pub timeline: PathBuf,
    pub scenes: Option<PathBuf>,
}

pub fn write_outputs(dashboard: &Dashboard, out: &Path, with_json: bool) -> Result<Rendered> {
    fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;

    let scatter_scene = dashboard.scatter_scene();
    let timeline_scene = dashboard.timeline_scene();

    let scatter = out.join("scatter.svg");
    fs::write(&scatter, svg::to_svg(&scatter_scene))
        .with_context(|| format!("writing {}", scatter.display()))?;
    let timeline = out.join("timeline.svg");
    fs::write(&timeline, svg::to_svg(&timeline_scene))
        .with_context(|| format!("writing {}", timeline.display()))?;

    let scenes = if with_json {
        let path = out.join("scenes.json");
        let doc = json!({
            "selected": dashboard.selected(),
            "range": dashboard.range_badge(),
            "scatter": scatter_scene,
            "timeline": timeline_scene,
        });
        fs::write(&path, serde_json::to_string_pretty(&doc)?)
            .with_context(|| format!("writing {}", path.display()))?;
        Some(path)
    } else {
        None
    };

    info!("rendered {} and {}", scatter.display(), timeline.display());
    Ok(Rendered {
        scatter,
        timeline,
        scenes,
    })
}

/// Load failures are drawn inline; report them too.
pub fn warn_failures(dashboard: &Dashboard) {
    if let ChartSlot::Failed(cause) = dashboard.scatter() {
        eprintln!("warning: company summary failed to load: {cause}");
    }
    if let ChartSlot::Failed(cause) = dashboard.timeline() {
        eprintln!("warning: prices failed to load: {cause}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sectorscope_core::dashboard::SCATTER_ERROR;

    #[test]
    fn events_follow_control_order() {
        let request = RenderRequest {
            ticker: Some("XOM".into()),
            sector: Some("Energy".into()),
            mode: Some(DisplayMode::Normalized),
            year: Some(2021),
            width: None,
        };
        let events = request.events(DisplayMode::Raw);
        assert_eq!(events.len(), 4);
        assert!(matches!(&events[0], DashboardEvent::SectorChanged(s) if s == "Energy"));
        assert!(matches!(&events[1], DashboardEvent::TickerChanged(t) if t == "XOM"));
        assert!(matches!(events[2], DashboardEvent::ToggleMode));
        assert!(matches!(events[3], DashboardEvent::JumpToYear(2021)));
    }

    fn config_for(dir: &Path, summary: &str) -> DashboardConfig {
        let prices = dir.join("prices.csv");
        let mut csv = String::from("date,ticker,close,volume\n");
        for day in 4..=29 {
            csv.push_str(&format!("2021-01-{day:02},AAPL,{}.5,1000\n", 100 + day));
        }
        fs::write(&prices, csv).unwrap();
        let mut config = DashboardConfig::default();
        config.data.summary = dir.join(summary);
        config.data.prices = prices;
        config.data.filings = None;
        config
    }

    #[test]
    fn missing_summary_renders_inline_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path(), "missing.csv");
        let request = RenderRequest {
            ticker: Some("AAPL".into()),
            ..RenderRequest::default()
        };

        let dashboard = replay(&config, &request).unwrap();
        assert!(matches!(dashboard.scatter(), ChartSlot::Failed(_)));
        assert!(dashboard.scatter_scene().contains_text(SCATTER_ERROR));

        let rendered = write_outputs(&dashboard, &dir.path().join("out"), false).unwrap();
        let svg = fs::read_to_string(rendered.scatter).unwrap();
        assert!(svg.contains(SCATTER_ERROR));
    }

    #[test]
    fn header_only_summary_is_a_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("summary.csv"),
            "ticker,sector,avg_return,volatility,avg_volume,n_days\n",
        )
        .unwrap();
        let config = config_for(dir.path(), "summary.csv");

        let dashboard = replay(&config, &RenderRequest::default()).unwrap();
        let ChartSlot::Failed(cause) = dashboard.scatter() else {
            panic!("summary should have failed");
        };
        assert!(cause.contains("no usable company summary rows"));
    }

    #[test]
    fn mode_already_active_is_not_toggled() {
        let request = RenderRequest {
            mode: Some(DisplayMode::Raw),
            ..RenderRequest::default()
        };
        assert!(request.events(DisplayMode::Raw).is_empty());
    }
}
