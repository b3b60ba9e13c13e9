//! Sector scatter: volatility against average return, one bubble per company.
//!
//! Bubble area tracks average volume and color tracks sector. Filtering
//! narrows by sector, then optionally to one ticker. Clicks and dropdown
//! changes return [`SelectionEvent`]s for the dashboard to route.

use std::collections::BTreeSet;

use log::debug;

use crate::axis::{self, Orient};
use crate::data::CompanySummaryRow;
use crate::format;
use crate::palette::{Rgba, GRID, POINT_STROKE, TABLEAU10, TEXT, WHITE};
use crate::scale::{extent, LinearScale, OrdinalScale, SqrtScale};
use crate::scene::{Anchor, Margin, Mark, Scene, Stroke, Tooltip};
use crate::selection::SelectionEvent;
use crate::stats::{annualized_return, annualized_volatility, TRADING_DAYS_PER_YEAR};

/// Sector dropdown entry that disables the sector filter.
pub const ALL_SECTORS: &str = "All";
/// Ticker dropdown entry that disables the ticker filter.
pub const ALL_COMPANIES: &str = "All Companies";

pub const MIN_WIDTH: f64 = 660.0;
pub const MAX_WIDTH: f64 = 1000.0;
pub const DEFAULT_WIDTH: f64 = 900.0;
pub const HEIGHT: f64 = 520.0;
/// Strip under the plot that holds the sector legend.
pub const LEGEND_HEIGHT: f64 = 24.0;
pub const MARGIN: Margin = Margin::new(18.0, 16.0, 56.0, 66.0);

const RADIUS_RANGE: (f64, f64) = (5.0, 16.0);
const AXIS_TICKS: usize = 6;
const LEGEND_ITEM_WIDTH: f64 = 130.0;

const OPACITY_NO_SELECTION: f64 = 0.9;
const OPACITY_SELECTED: f64 = 1.0;
const OPACITY_DIMMED: f64 = 0.16;
const STROKE_SELECTED: f64 = 2.4;
const STROKE_DEFAULT: f64 = 1.0;

pub const X_TITLE: &str = "Volatility (Std Dev of Daily Return)";
pub const Y_TITLE: &str = "Average Daily Return";
pub const CLICK_HINT: &str = "Click to select and update timeline";

/// Opacity and outline of one bubble under the current selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointStyle {
    pub opacity: f64,
    pub stroke: Stroke,
}

/// Width clamped to the scatter's supported range.
pub fn clamp_width(width: f64) -> f64 {
    if width.is_finite() && width > 0.0 {
        width.clamp(MIN_WIDTH, MAX_WIDTH)
    } else {
        DEFAULT_WIDTH
    }
}

#[derive(Debug, Clone)]
pub struct ScatterChart {
    rows: Vec<CompanySummaryRow>,
    sectors: Vec<String>,
    color: OrdinalScale<Rgba>,
    radius: SqrtScale,
    sector_filter: Option<String>,
    ticker_filter: Option<String>,
    selected: Option<String>,
    width: f64,
    trading_days: u32,
}

impl ScatterChart {
    /// Build the chart over already-cleaned summary rows.
    ///
    /// Color and radius scales are fixed here from the full dataset so they
    /// stay stable across filter changes.
    pub fn new(rows: Vec<CompanySummaryRow>, width: f64) -> Self {
        let sectors: Vec<String> = rows
            .iter()
            .map(|r| r.sector.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let color = OrdinalScale::new(sectors.clone(), TABLEAU10.to_vec());
        let volume_extent =
            extent(rows.iter().map(|r| r.avg_volume.unwrap_or(0.0))).unwrap_or((0.0, 1.0));
        let radius = SqrtScale::new(volume_extent, RADIUS_RANGE);

        debug!(
            "scatter: {} companies in {} sectors",
            rows.len(),
            sectors.len()
        );

        Self {
            rows,
            sectors,
            color,
            radius,
            sector_filter: None,
            ticker_filter: None,
            selected: None,
            width: clamp_width(width),
            trading_days: TRADING_DAYS_PER_YEAR,
        }
    }

    pub fn with_trading_days(mut self, days: u32) -> Self {
        self.trading_days = days;
        self
    }

    pub fn rows(&self) -> &[CompanySummaryRow] {
        &self.rows
    }

    /// Sorted distinct sectors of the full dataset.
    pub fn sectors(&self) -> &[String] {
        &self.sectors
    }

    pub fn sector_color(&self, sector: &str) -> Rgba {
        self.color.get(sector).unwrap_or(WHITE)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        HEIGHT + LEGEND_HEIGHT
    }

    pub fn resize(&mut self, width: f64) {
        self.width = clamp_width(width);
    }

    pub fn sector_filter(&self) -> &str {
        self.sector_filter.as_deref().unwrap_or(ALL_SECTORS)
    }

    pub fn ticker_filter(&self) -> &str {
        self.ticker_filter.as_deref().unwrap_or(ALL_COMPANIES)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn sector_options(&self) -> Vec<String> {
        std::iter::once(ALL_SECTORS.to_string())
            .chain(self.sectors.iter().cloned())
            .collect()
    }

    fn sector_rows(&self) -> impl Iterator<Item = &CompanySummaryRow> {
        self.rows.iter().filter(move |r| match &self.sector_filter {
            Some(s) => &r.sector == s,
            None => true,
        })
    }

    /// `All Companies` followed by the sorted tickers of the sector-narrowed set.
    pub fn ticker_options(&self) -> Vec<String> {
        let mut tickers: Vec<String> = self.sector_rows().map(|r| r.ticker.clone()).collect();
        tickers.sort();
        std::iter::once(ALL_COMPANIES.to_string())
            .chain(tickers)
            .collect()
    }

    /// First real ticker in the ticker dropdown.
    pub fn first_ticker(&self) -> Option<String> {
        self.ticker_options().into_iter().nth(1)
    }

    /// Rows currently drawn: sector filter first, then ticker filter.
    pub fn filtered(&self) -> Vec<&CompanySummaryRow> {
        self.sector_rows()
            .filter(|r| match &self.ticker_filter {
                Some(t) => &r.ticker == t,
                None => true,
            })
            .collect()
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.rows.iter().any(|r| r.ticker == ticker)
    }

    /// Set the highlight without emitting anything.
    pub fn set_selected(&mut self, ticker: Option<&str>) {
        self.selected = ticker.map(str::to_string);
    }

    /// Click on the bubble for `ticker`.
    pub fn click_point(&mut self, ticker: &str) -> Option<SelectionEvent> {
        if !self.filtered().iter().any(|r| r.ticker == ticker) {
            return None;
        }
        self.selected = Some(ticker.to_string());
        Some(SelectionEvent::Selected(ticker.to_string()))
    }

    /// Click at scene coordinates; misses produce nothing.
    pub fn click_at(&mut self, x: f64, y: f64, slop: f64) -> Option<SelectionEvent> {
        let ticker = self.point_at(x, y, slop)?.ticker.clone();
        self.click_point(&ticker)
    }

    /// Sector dropdown change. Always clears the selection.
    ///
    /// The ticker filter survives only if that ticker is still offered.
    pub fn change_sector(&mut self, sector: &str) -> SelectionEvent {
        self.sector_filter = (sector != ALL_SECTORS && self.sectors.iter().any(|s| s == sector))
            .then(|| sector.to_string());
        self.selected = None;

        let stale = self
            .ticker_filter
            .as_ref()
            .is_some_and(|t| !self.ticker_options().contains(t));
        if stale {
            self.ticker_filter = None;
        }
        SelectionEvent::Cleared
    }

    /// Ticker dropdown change. Unknown tickers are ignored.
    pub fn change_ticker(&mut self, choice: &str) -> Option<SelectionEvent> {
        if choice == ALL_COMPANIES {
            self.ticker_filter = None;
            self.selected = None;
            return Some(SelectionEvent::Cleared);
        }
        if !self.ticker_options().iter().any(|o| o == choice) {
            return None;
        }
        self.ticker_filter = Some(choice.to_string());
        self.selected = Some(choice.to_string());
        Some(SelectionEvent::Selected(choice.to_string()))
    }

    /// Clear both filters and the selection.
    pub fn reset(&mut self) -> SelectionEvent {
        self.sector_filter = None;
        self.ticker_filter = None;
        self.selected = None;
        SelectionEvent::Cleared
    }

    fn inner_width(&self) -> f64 {
        MARGIN.inner_width(self.width)
    }

    fn inner_height(&self) -> f64 {
        MARGIN.inner_height(HEIGHT)
    }

    pub fn x_scale(&self) -> LinearScale {
        let domain = extent(self.filtered().iter().map(|r| r.volatility)).unwrap_or((0.0, 1.0));
        LinearScale::new(domain, (0.0, self.inner_width())).nice()
    }

    pub fn y_scale(&self) -> LinearScale {
        let domain = extent(self.filtered().iter().map(|r| r.avg_return)).unwrap_or((0.0, 1.0));
        LinearScale::new(domain, (self.inner_height(), 0.0)).nice()
    }

    pub fn radius_of(&self, row: &CompanySummaryRow) -> f64 {
        self.radius.map(row.avg_volume.unwrap_or(0.0))
    }

    /// Bubble center in scene coordinates.
    pub fn position_of(&self, row: &CompanySummaryRow) -> (f64, f64) {
        let (x, y) = (self.x_scale(), self.y_scale());
        (
            MARGIN.left + x.map(row.volatility),
            MARGIN.top + y.map(row.avg_return),
        )
    }

    /// Topmost drawn bubble within `slop` pixels of its edge.
    pub fn point_at(&self, x: f64, y: f64, slop: f64) -> Option<&CompanySummaryRow> {
        let (xs, ys) = (self.x_scale(), self.y_scale());
        self.filtered().into_iter().rev().find(|row| {
            let cx = MARGIN.left + xs.map(row.volatility);
            let cy = MARGIN.top + ys.map(row.avg_return);
            let r = self.radius_of(row) + slop;
            (x - cx).powi(2) + (y - cy).powi(2) <= r * r
        })
    }

    pub fn hover(&self, x: f64, y: f64, slop: f64) -> Option<Tooltip> {
        self.point_at(x, y, slop).map(|row| self.tooltip_for(row))
    }

    pub fn tooltip_for(&self, row: &CompanySummaryRow) -> Tooltip {
        let days = self.trading_days;
        Tooltip::new(row.ticker.clone())
            .row("Sector", row.sector.clone())
            .row("Avg daily return", format::signed_percent(row.avg_return))
            .row("Daily volatility", format::signed_percent(row.volatility))
            .row(
                "Annualized return (approx)",
                format::or_missing(annualized_return(row.avg_return, days), format::signed_percent),
            )
            .row(
                "Annualized volatility (approx)",
                format::or_missing(
                    annualized_volatility(row.volatility, days),
                    format::signed_percent,
                ),
            )
            .row(
                "Avg volume",
                format::or_missing(row.avg_volume, |v| format::grouped(v, 0)),
            )
            .row(
                "Days",
                format::or_missing(row.n_days, |n| format::grouped(f64::from(n), 0)),
            )
            .footer(CLICK_HINT)
    }

    pub fn style_for(&self, ticker: &str) -> PointStyle {
        let is_selected = self.selected.as_deref() == Some(ticker);
        let opacity = match &self.selected {
            None => OPACITY_NO_SELECTION,
            Some(_) if is_selected => OPACITY_SELECTED,
            Some(_) => OPACITY_DIMMED,
        };
        let stroke = if is_selected {
            Stroke::solid(WHITE, STROKE_SELECTED)
        } else {
            Stroke::solid(POINT_STROKE, STROKE_DEFAULT)
        };
        PointStyle { opacity, stroke }
    }

    pub fn scene(&self) -> Scene {
        let inner_w = self.inner_width();
        let inner_h = self.inner_height();
        let (xs, ys) = (self.x_scale(), self.y_scale());
        let (left, top) = (MARGIN.left, MARGIN.top);
        let mut scene = Scene::new(self.width, self.height());

        for t in ys.ticks(AXIS_TICKS) {
            let y = top + ys.map(t);
            scene.push(Mark::line(
                (left, y),
                (left + inner_w, y),
                Stroke::solid(GRID, 1.0),
            ));
        }

        for row in self.filtered() {
            let style = self.style_for(&row.ticker);
            scene.push(Mark::Circle {
                key: Some(row.ticker.clone()),
                cx: left + xs.map(row.volatility),
                cy: top + ys.map(row.avg_return),
                r: self.radius_of(row),
                fill: self.sector_color(&row.sector),
                opacity: style.opacity,
                stroke: Some(style.stroke),
            });
        }

        let x_ticks: Vec<axis::Tick> = xs
            .ticks(AXIS_TICKS)
            .into_iter()
            .map(|t| (left + xs.map(t), format::percent(t)))
            .collect();
        let y_ticks: Vec<axis::Tick> = ys
            .ticks(AXIS_TICKS)
            .into_iter()
            .map(|t| (top + ys.map(t), format::percent(t)))
            .collect();
        axis::draw(&mut scene, Orient::Bottom, top + inner_h, left, left + inner_w, &x_ticks);
        axis::draw(&mut scene, Orient::Left, left, top, top + inner_h, &y_ticks);

        scene.push(
            Mark::text(left + inner_w / 2.0, top + inner_h + 44.0, X_TITLE, TEXT, 12.0)
                .anchored(Anchor::Middle),
        );
        scene.push(
            Mark::text(left - 52.0, top + inner_h / 2.0, Y_TITLE, TEXT, 12.0)
                .anchored(Anchor::Middle)
                .rotated(-90.0),
        );

        self.push_legend(&mut scene);
        scene
    }

    fn push_legend(&self, scene: &mut Scene) {
        let x0 = (self.width * 0.03).min(24.0);
        let y0 = HEIGHT;
        for (i, sector) in self.sectors.iter().enumerate() {
            let x = x0 + i as f64 * LEGEND_ITEM_WIDTH;
            scene.push(Mark::Circle {
                key: None,
                cx: x + 6.0,
                cy: y0 + 10.0,
                r: 5.0,
                fill: self.sector_color(sector),
                opacity: 1.0,
                stroke: None,
            });
            scene.push(Mark::text(x + 18.0, y0 + 14.0, sector.clone(), TEXT, 11.0));
        }
    }
}
