//! Bootstrap and selection routing for the two linked charts.
//!
//! The dashboard owns both charts and the shared selection. Load results and
//! user interactions arrive as [`DashboardEvent`]s on one thread; every
//! selection event the scatter emits is routed to the controller, back to
//! the scatter highlight, and to the timeline.

use std::time::Duration;

use log::{debug, error, info};

use crate::config::DashboardConfig;
use crate::data::{CompanySummaryRow, TimelineData};
use crate::palette::{ERROR_TEXT, TEXT_MUTED};
use crate::scatter::{self, ScatterChart};
use crate::scene::{Anchor, Mark, Scene, Tooltip};
use crate::selection::{SelectionController, SelectionEvent};
use crate::series::DisplayMode;
use crate::timeline::{self, TimelineChart};

/// Pixel tolerance for hit tests.
pub const HIT_SLOP: f64 = 2.0;

pub const SCATTER_ERROR: &str = "Dashboard failed to load.";
pub const TIMELINE_ERROR: &str = "Timeline failed to load.";
pub const LOADING: &str = "Loading…";

/// Load state of one chart.
#[derive(Debug, Clone)]
pub enum ChartSlot<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> ChartSlot<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            ChartSlot::Ready(chart) => Some(chart),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            ChartSlot::Ready(chart) => Some(chart),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ChartSlot::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ChartSlot::Failed(cause) => Some(cause),
            _ => None,
        }
    }
}

/// Everything that can happen to the dashboard. Coordinates are in the
/// target chart's scene space.
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    SummaryLoaded(Result<Vec<CompanySummaryRow>, String>),
    TimelineLoaded(Result<TimelineData, String>),
    ClickScatter { x: f64, y: f64 },
    HoverScatter { x: f64, y: f64 },
    SectorChanged(String),
    TickerChanged(String),
    Reset,
    HoverTimeline { x: f64, y: f64 },
    ClickTimeline { x: f64, y: f64 },
    BrushStart { x: f64, y: f64 },
    BrushDrag { x: f64 },
    BrushEnd { x: f64 },
    JumpToYear(i32),
    StepYear(i32),
    ShowAll,
    ToggleMode,
    Resize { width: f64 },
}

/// What the caller should do after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Nothing,
    Selection(SelectionEvent),
    Tooltip(Tooltip),
    OpenLink(String),
}

#[derive(Debug)]
pub struct Dashboard {
    scatter: ChartSlot<ScatterChart>,
    timeline: ChartSlot<TimelineChart>,
    selection: SelectionController,
    mode: DisplayMode,
    width: f64,
    ma_window: usize,
    trading_days: u32,
    auto_select_delay: Duration,
    auto_select_pending: bool,
    hit_slop: f64,
}

impl Dashboard {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            scatter: ChartSlot::Loading,
            timeline: ChartSlot::Loading,
            selection: SelectionController::new(),
            mode: config.display_mode,
            width: config.width,
            ma_window: config.ma_window,
            trading_days: config.trading_days,
            auto_select_delay: config.auto_select_delay(),
            auto_select_pending: true,
            hit_slop: HIT_SLOP,
        }
    }

    /// Widen hit tests, e.g. for coarse terminal cells.
    pub fn set_hit_slop(&mut self, slop: f64) {
        self.hit_slop = slop.max(0.0);
    }

    /// Scene size of the scatter chart at the current width.
    pub fn scatter_extent(&self) -> (f64, f64) {
        (
            scatter::clamp_width(self.width),
            scatter::HEIGHT + scatter::LEGEND_HEIGHT,
        )
    }

    pub fn timeline_extent(&self) -> (f64, f64) {
        (timeline::clamp_width(self.width), timeline::HEIGHT)
    }

    pub fn scatter(&self) -> &ChartSlot<ScatterChart> {
        &self.scatter
    }

    pub fn timeline(&self) -> &ChartSlot<TimelineChart> {
        &self.timeline
    }

    pub fn selected(&self) -> Option<&str> {
        self.selection.selected()
    }

    pub fn badge_text(&self) -> String {
        self.selection.badge_text()
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn range_badge(&self) -> String {
        self.timeline
            .ready()
            .map(TimelineChart::range_badge)
            .unwrap_or_else(|| "Range: Full".to_string())
    }

    pub fn handle(&mut self, event: DashboardEvent) -> Outcome {
        match event {
            DashboardEvent::SummaryLoaded(result) => {
                self.on_summary_loaded(result);
                Outcome::Nothing
            }
            DashboardEvent::TimelineLoaded(result) => {
                self.on_timeline_loaded(result);
                Outcome::Nothing
            }
            DashboardEvent::ClickScatter { x, y } => {
                let slop = self.hit_slop;
                let event = self.scatter.ready_mut().and_then(|c| c.click_at(x, y, slop));
                self.emit(event)
            }
            DashboardEvent::HoverScatter { x, y } => {
                let tip = self.scatter.ready().and_then(|c| c.hover(x, y, self.hit_slop));
                tip.map_or(Outcome::Nothing, Outcome::Tooltip)
            }
            DashboardEvent::SectorChanged(sector) => {
                let event = self.scatter.ready_mut().map(|c| c.change_sector(&sector));
                self.emit(event)
            }
            DashboardEvent::TickerChanged(ticker) => {
                let event = self.scatter.ready_mut().and_then(|c| c.change_ticker(&ticker));
                self.emit(event)
            }
            DashboardEvent::Reset => {
                let event = self.scatter.ready_mut().map(ScatterChart::reset);
                self.emit(event)
            }
            DashboardEvent::HoverTimeline { x, y } => self.hover_timeline(x, y),
            DashboardEvent::ClickTimeline { x, y } => {
                let url = self.timeline.ready().and_then(|c| c.click_at(x, y, self.hit_slop));
                url.map_or(Outcome::Nothing, Outcome::OpenLink)
            }
            DashboardEvent::BrushStart { x, y } => {
                if let Some(chart) = self.timeline.ready_mut() {
                    chart.brush_start(x, y);
                }
                Outcome::Nothing
            }
            DashboardEvent::BrushDrag { x } => {
                if let Some(chart) = self.timeline.ready_mut() {
                    chart.brush_drag(x);
                }
                Outcome::Nothing
            }
            DashboardEvent::BrushEnd { x } => {
                if let Some(chart) = self.timeline.ready_mut() {
                    chart.brush_end(x);
                }
                Outcome::Nothing
            }
            DashboardEvent::JumpToYear(year) => {
                if let Some(chart) = self.timeline.ready_mut() {
                    chart.jump_to_year(year);
                }
                Outcome::Nothing
            }
            DashboardEvent::StepYear(delta) => {
                if let Some(chart) = self.timeline.ready_mut() {
                    chart.step_year(delta);
                }
                Outcome::Nothing
            }
            DashboardEvent::ShowAll => {
                if let Some(chart) = self.timeline.ready_mut() {
                    chart.show_all();
                }
                Outcome::Nothing
            }
            DashboardEvent::ToggleMode => {
                self.mode = self.mode.toggled();
                if let Some(chart) = self.timeline.ready_mut() {
                    chart.set_mode(self.mode);
                }
                Outcome::Nothing
            }
            DashboardEvent::Resize { width } => {
                self.resize(width);
                Outcome::Nothing
            }
        }
    }

    fn on_summary_loaded(&mut self, result: Result<Vec<CompanySummaryRow>, String>) {
        self.scatter = match result {
            Ok(rows) => {
                info!("summary loaded: {} companies", rows.len());
                let mut chart =
                    ScatterChart::new(rows, self.width).with_trading_days(self.trading_days);
                chart.set_selected(self.selection.selected());
                ChartSlot::Ready(chart)
            }
            Err(cause) => {
                error!("summary load failed: {cause}");
                ChartSlot::Failed(cause)
            }
        };
    }

    /// A timeline that arrives after a selection was made shows it at once.
    fn on_timeline_loaded(&mut self, result: Result<TimelineData, String>) {
        self.timeline = match result {
            Ok(data) => {
                info!(
                    "timeline loaded: {} price rows, {} filings",
                    data.prices.len(),
                    data.filings.len()
                );
                let mut chart = TimelineChart::new(data, self.width)
                    .with_ma_window(self.ma_window)
                    .with_mode(self.mode);
                if let Some(ticker) = self.selection.selected() {
                    chart.update_for_ticker(Some(ticker));
                }
                ChartSlot::Ready(chart)
            }
            Err(cause) => {
                error!("timeline load failed: {cause}");
                ChartSlot::Failed(cause)
            }
        };
    }

    fn hover_timeline(&mut self, x: f64, y: f64) -> Outcome {
        let slop = self.hit_slop;
        let Some(chart) = self.timeline.ready_mut() else {
            return Outcome::Nothing;
        };
        if let Some(tip) = chart.filing_at(x, y, slop).map(|f| chart.filing_tooltip(f)) {
            chart.clear_hover();
            return Outcome::Tooltip(tip);
        }
        chart
            .hover(x, y)
            .map_or(Outcome::Nothing, |info| Outcome::Tooltip(info.tooltip))
    }

    fn emit(&mut self, event: Option<SelectionEvent>) -> Outcome {
        match event {
            Some(event) => {
                self.route(&event);
                Outcome::Selection(event)
            }
            None => Outcome::Nothing,
        }
    }

    /// Propagate a selection to the controller, the scatter highlight and
    /// the timeline. The timeline re-renders even for a repeated ticker.
    pub fn route(&mut self, event: &SelectionEvent) {
        if self.selection.apply(event) {
            debug!("{}", self.selection.badge_text());
        }
        let ticker = event.ticker();
        if let Some(chart) = self.scatter.ready_mut() {
            chart.set_selected(ticker);
        }
        if let Some(chart) = self.timeline.ready_mut() {
            chart.update_for_ticker(ticker);
        }
    }

    /// Advance the auto-select timer. Fires once, after the configured
    /// delay, selecting the first ticker option. Skipped when the scatter is
    /// not ready or something is already selected.
    pub fn tick(&mut self, elapsed: Duration) -> Option<SelectionEvent> {
        if !self.auto_select_pending || elapsed < self.auto_select_delay {
            return None;
        }
        self.auto_select_pending = false;
        if self.selection.selected().is_some() {
            return None;
        }
        let Some(first) = self.scatter.ready().and_then(ScatterChart::first_ticker) else {
            debug!("auto-select skipped: no ticker options yet");
            return None;
        };
        info!("auto-selecting {first}");
        let event = SelectionEvent::Selected(first);
        self.route(&event);
        Some(event)
    }

    pub fn auto_select_pending(&self) -> bool {
        self.auto_select_pending
    }

    pub fn resize(&mut self, width: f64) {
        self.width = width;
        if let Some(chart) = self.scatter.ready_mut() {
            chart.resize(width);
        }
        if let Some(chart) = self.timeline.ready_mut() {
            chart.resize(width);
        }
    }

    pub fn scatter_scene(&self) -> Scene {
        let (w, h) = self.scatter_extent();
        match &self.scatter {
            ChartSlot::Ready(chart) => chart.scene(),
            ChartSlot::Loading => status_scene(w, h, None),
            ChartSlot::Failed(cause) => status_scene(w, h, Some((SCATTER_ERROR, cause))),
        }
    }

    pub fn timeline_scene(&self) -> Scene {
        let (w, h) = self.timeline_extent();
        match &self.timeline {
            ChartSlot::Ready(chart) => chart.scene(),
            ChartSlot::Loading => status_scene(w, h, None),
            ChartSlot::Failed(cause) => status_scene(w, h, Some((TIMELINE_ERROR, cause))),
        }
    }
}

/// Placeholder for a chart that is loading or failed to load.
fn status_scene(width: f64, height: f64, failure: Option<(&str, &str)>) -> Scene {
    let mut scene = Scene::new(width, height);
    let (cx, cy) = (width / 2.0, height / 2.0);
    match failure {
        None => scene.push(Mark::text(cx, cy, LOADING, TEXT_MUTED, 12.0).anchored(Anchor::Middle)),
        Some((headline, cause)) => {
            scene.push(
                Mark::text(cx, cy - 8.0, headline, ERROR_TEXT, 13.0)
                    .anchored(Anchor::Middle)
                    .bold(),
            );
            scene.push(Mark::text(cx, cy + 12.0, cause, ERROR_TEXT, 11.0).anchored(Anchor::Middle));
        }
    }
    scene
}
