//! Price/volume timeline for one ticker: a focus plot driven by a brushed
//! context strip.
//!
//! The focus date domain always equals the brushed interval, and the focus
//! y-domains are refit to the samples inside it. Every full re-render
//! (ticker change, display-mode change, resize) resets the brush to the whole
//! context range.

pub mod brush;
mod render;

pub use brush::{Brush, HANDLE_HALF_WIDTH};

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use log::debug;

use crate::data::{FilingRow, PriceRow, TimelineData};
use crate::format;
use crate::scale::{date_ms, extent, ms_datetime, nice_domain, LinearScale, TimeScale, DEFAULT_TICKS};
use crate::scene::{Margin, Tooltip};
use crate::series::{
    apply_display_mode, build_series, nearest_index, DisplayMode, SeriesPoint, DEFAULT_MA_WINDOW,
};

pub const MIN_WIDTH: f64 = 680.0;
pub const MAX_WIDTH: f64 = 1040.0;
pub const DEFAULT_WIDTH: f64 = 920.0;
pub const HEIGHT: f64 = 560.0;
pub const MARGIN: Margin = Margin::new(18.0, 64.0, 118.0, 66.0);
pub const CONTEXT_HEIGHT: f64 = 74.0;
pub const CONTEXT_GAP: f64 = 22.0;
/// Fraction of the focus height, from the bottom, that the volume area may use.
pub const VOLUME_BAND: f64 = 0.38;

pub const PLACEHOLDER_TITLE: &str = "Select a company to view the timeline";

/// Filing marker head: vertical offset from the focus top and radius.
pub(crate) const MARKER_CY: f64 = 10.0;
pub(crate) const MARKER_R: f64 = 4.0;

/// Width clamped to the timeline's supported range.
pub fn clamp_width(width: f64) -> f64 {
    if width.is_finite() && width > 0.0 {
        width.clamp(MIN_WIDTH, MAX_WIDTH)
    } else {
        DEFAULT_WIDTH
    }
}

/// Crosshair target under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverInfo {
    pub index: usize,
    /// Scene position of the crosshair dot.
    pub x: f64,
    pub y: f64,
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone)]
pub struct TimelineChart {
    prices: HashMap<String, Vec<PriceRow>>,
    filings: Vec<FilingRow>,
    ticker: Option<String>,
    series: Vec<SeriesPoint>,
    mode: DisplayMode,
    ma_window: usize,
    width: f64,
    focus_domain: (i64, i64),
    price_domain: (f64, f64),
    volume_domain: (f64, f64),
    context_price_domain: (f64, f64),
    brush: Brush,
    /// `None` shows "Range: Full".
    badge_range: Option<(i64, i64)>,
    year: Option<i32>,
    hover: Option<usize>,
}

impl TimelineChart {
    /// Group the loaded rows by ticker. Rows are sorted per ticker on demand.
    pub fn new(data: TimelineData, width: f64) -> Self {
        let mut prices: HashMap<String, Vec<PriceRow>> = HashMap::new();
        for row in data.prices {
            prices.entry(row.ticker.clone()).or_default().push(row);
        }
        debug!(
            "timeline: {} tickers, {} filings",
            prices.len(),
            data.filings.len()
        );
        let width = clamp_width(width);
        Self {
            prices,
            filings: data.filings,
            ticker: None,
            series: Vec::new(),
            mode: DisplayMode::default(),
            ma_window: DEFAULT_MA_WINDOW,
            width,
            focus_domain: (0, 0),
            price_domain: (0.0, 1.0),
            volume_domain: (0.0, 1.0),
            context_price_domain: (0.0, 1.0),
            brush: Brush::new(0.0, MARGIN.inner_width(width)),
            badge_range: None,
            year: None,
            hover: None,
        }
    }

    pub fn with_ma_window(mut self, window: usize) -> Self {
        self.ma_window = window.max(1);
        self
    }

    pub fn with_mode(mut self, mode: DisplayMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn ticker(&self) -> Option<&str> {
        self.ticker.as_deref()
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.prices.keys().map(String::as_str)
    }

    pub fn series(&self) -> &[SeriesPoint] {
        &self.series
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        HEIGHT
    }

    pub fn inner_width(&self) -> f64 {
        MARGIN.inner_width(self.width)
    }

    pub fn inner_height(&self) -> f64 {
        MARGIN.inner_height(HEIGHT)
    }

    /// Top edge of the context strip in scene coordinates.
    pub fn context_top(&self) -> f64 {
        MARGIN.top + self.inner_height() + CONTEXT_GAP
    }

    /// Switch to `ticker`, or clear the chart with `None`.
    ///
    /// Rebuilds the derived series from scratch and resets the brush.
    pub fn update_for_ticker(&mut self, ticker: Option<&str>) {
        self.hover = None;
        let Some(ticker) = ticker else {
            self.ticker = None;
            self.series.clear();
            return;
        };
        self.ticker = Some(ticker.to_string());

        let rows: Vec<&PriceRow> = self
            .prices
            .get(ticker)
            .map(|rows| rows.iter().collect())
            .unwrap_or_default();
        self.series = build_series(&rows, self.ma_window);
        apply_display_mode(&mut self.series, self.mode);
        debug!("timeline: {ticker} has {} samples", self.series.len());

        if let (Some(y), Some((lo, hi))) = (self.year, self.year_bounds()) {
            self.year = Some(y.clamp(lo, hi));
        }
        self.rerender();
    }

    /// Change the display mode and re-render. Data is not re-read.
    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
        if self.ticker.is_none() {
            return;
        }
        apply_display_mode(&mut self.series, mode);
        self.rerender();
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    /// New viewport width. Re-renders the current ticker, if any.
    pub fn resize(&mut self, width: f64) {
        self.width = clamp_width(width);
        if self.ticker.is_some() {
            self.rerender();
        } else {
            self.brush.set_extent(0.0, self.inner_width());
        }
    }

    pub fn title(&self) -> String {
        match (&self.ticker, self.year_bounds()) {
            (None, _) => PLACEHOLDER_TITLE.to_string(),
            (Some(t), Some((lo, hi))) => format!("{t} — Price + Volume ({lo}–{hi})"),
            (Some(t), None) => format!("{t} — Price + Volume"),
        }
    }

    /// First and last calendar year of the current series.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let first = self.series.first()?.date.year();
        let last = self.series.last()?.date.year();
        Some((first, last))
    }

    /// Year last chosen with the year control.
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    fn dates_ms(&self) -> Vec<i64> {
        self.series.iter().map(|p| date_ms(p.date)).collect()
    }

    /// Full date extent of the series, in ms.
    pub fn context_domain(&self) -> Option<(i64, i64)> {
        let first = date_ms(self.series.first()?.date);
        let last = date_ms(self.series.last()?.date);
        Some((first, last))
    }

    /// Visible date interval of the focus plot, in ms.
    pub fn focus_domain(&self) -> Option<(i64, i64)> {
        (!self.series.is_empty()).then_some(self.focus_domain)
    }

    pub fn price_domain(&self) -> (f64, f64) {
        self.price_domain
    }

    pub fn volume_domain(&self) -> (f64, f64) {
        self.volume_domain
    }

    pub fn context_x(&self) -> TimeScale {
        let domain = self.context_domain().unwrap_or((0, 0));
        TimeScale::new(domain, (0.0, self.inner_width()))
    }

    pub fn focus_x(&self) -> TimeScale {
        TimeScale::new(self.focus_domain, (0.0, self.inner_width()))
    }

    pub fn price_y(&self) -> LinearScale {
        LinearScale::new(self.price_domain, (self.inner_height(), 0.0))
    }

    pub fn volume_y(&self) -> LinearScale {
        let h = self.inner_height();
        LinearScale::new(self.volume_domain, (h, h * (1.0 - VOLUME_BAND)))
    }

    pub fn context_y(&self) -> LinearScale {
        LinearScale::new(self.context_price_domain, (CONTEXT_HEIGHT, 0.0))
    }

    /// Reset domains to the full series and the brush to the full range.
    fn rerender(&mut self) {
        self.hover = None;
        self.brush.set_extent(0.0, self.inner_width());
        let Some(full) = self.context_domain() else {
            self.badge_range = None;
            return;
        };

        let price_extent = extent(self.series.iter().map(|p| p.display_price)).unwrap_or((0.0, 1.0));
        self.context_price_domain = nice_domain(price_extent.0, price_extent.1, DEFAULT_TICKS);
        self.focus_domain = full;
        self.fit_y_domains(full);

        let whole = self.brush.extent();
        self.brush.move_to(Some(whole));
        self.apply_brush(whole);
        self.badge_range = None;
    }

    /// Refit the focus y-domains to samples inside `[a, b]` (ms).
    /// An empty slice leaves them untouched.
    fn fit_y_domains(&mut self, (a, b): (i64, i64)) {
        let visible: Vec<&SeriesPoint> = self
            .series
            .iter()
            .filter(|p| {
                let t = date_ms(p.date);
                t >= a && t <= b
            })
            .collect();
        if visible.is_empty() {
            return;
        }
        if let Some((lo, hi)) = extent(visible.iter().map(|p| p.display_price)) {
            self.price_domain = nice_domain(lo, hi, DEFAULT_TICKS);
        }
        let max_volume = visible
            .iter()
            .map(|p| p.volume)
            .fold(f64::NEG_INFINITY, f64::max);
        let max_volume = if max_volume.is_finite() && max_volume != 0.0 {
            max_volume
        } else {
            1.0
        };
        self.volume_domain = nice_domain(0.0, max_volume, DEFAULT_TICKS);
    }

    /// Map a brush selection (strip-local pixels) onto the focus plot.
    fn apply_brush(&mut self, (x0, x1): (f64, f64)) {
        if self.series.is_empty() || x0 == x1 {
            return;
        }
        let ctx = self.context_x();
        let domain = (ctx.invert(x0), ctx.invert(x1));
        self.focus_domain = domain;
        self.fit_y_domains(domain);
        self.badge_range = Some(domain);
    }

    /// Current brush selection in scene coordinates.
    pub fn brush_selection(&self) -> Option<(f64, f64)> {
        self.brush
            .selection()
            .map(|(a, b)| (MARGIN.left + a, MARGIN.left + b))
    }

    pub fn is_brushing(&self) -> bool {
        self.brush.is_active()
    }

    /// Whether `(x, y)` lies on the context strip.
    pub fn in_context(&self, x: f64, y: f64) -> bool {
        let top = self.context_top();
        x >= MARGIN.left
            && x <= MARGIN.left + self.inner_width()
            && y >= top
            && y <= top + CONTEXT_HEIGHT
    }

    /// Whether `(x, y)` lies on the focus plot.
    pub fn in_focus(&self, x: f64, y: f64) -> bool {
        x >= MARGIN.left
            && x <= MARGIN.left + self.inner_width()
            && y >= MARGIN.top
            && y <= MARGIN.top + self.inner_height()
    }

    /// Press on the context strip. Returns `false` when the press is
    /// elsewhere or there is nothing to brush.
    pub fn brush_start(&mut self, x: f64, y: f64) -> bool {
        if self.series.is_empty() || !self.in_context(x, y) {
            return false;
        }
        if let Some(sel) = self.brush.pointer_down(x - MARGIN.left) {
            self.apply_brush(sel);
        }
        true
    }

    pub fn brush_drag(&mut self, x: f64) {
        if let Some(sel) = self.brush.pointer_move(x - MARGIN.left) {
            self.apply_brush(sel);
        }
    }

    pub fn brush_end(&mut self, x: f64) {
        if !self.brush.is_active() {
            return;
        }
        if let Some(sel) = self.brush.pointer_up(x - MARGIN.left) {
            self.apply_brush(sel);
        }
    }

    /// Brush the interval `[a, b]` given in ms.
    fn brush_dates(&mut self, a: i64, b: i64) {
        let ctx = self.context_x();
        if let Some(sel) = self.brush.move_to(Some((ctx.map(a), ctx.map(b)))) {
            self.apply_brush(sel);
        }
    }

    /// Brush calendar year `year`, clamped to the series extent.
    pub fn jump_to_year(&mut self, year: i32) {
        let (Some((lo, hi)), Some((d0, d1))) = (self.year_bounds(), self.context_domain()) else {
            return;
        };
        let year = year.clamp(lo, hi);
        self.year = Some(year);

        let start = NaiveDate::from_ymd_opt(year, 1, 1).map(date_ms).unwrap_or(d0);
        let end = NaiveDate::from_ymd_opt(year, 12, 31).map(date_ms).unwrap_or(d1);
        self.brush_dates(start.max(d0), end.min(d1));
    }

    /// Step the year control by `delta`. The first step lands on an end year.
    pub fn step_year(&mut self, delta: i32) {
        let Some((lo, hi)) = self.year_bounds() else {
            return;
        };
        let base = self
            .year
            .unwrap_or(if delta > 0 { lo - 1 } else { hi + 1 });
        self.jump_to_year(base + delta);
    }

    /// Brush the whole context range.
    pub fn show_all(&mut self) {
        if let Some((d0, d1)) = self.context_domain() {
            self.brush_dates(d0, d1);
        }
    }

    /// "Range: Full" or "Range: <from> → <to>".
    pub fn range_badge(&self) -> String {
        match self.badge_range {
            None => "Range: Full".to_string(),
            Some((a, b)) => format!(
                "Range: {} → {}",
                format::long_date(ms_datetime(a).date_naive()),
                format::long_date(ms_datetime(b).date_naive())
            ),
        }
    }

    /// Nearest sample to the pointer over the focus plot.
    pub fn hover(&mut self, x: f64, y: f64) -> Option<HoverInfo> {
        if self.series.is_empty() || !self.in_focus(x, y) {
            self.hover = None;
            return None;
        }
        let target = self.focus_x().invert(x - MARGIN.left);
        let index = nearest_index(&self.dates_ms(), target)?;
        self.hover = Some(index);
        self.hover_info(index)
    }

    pub fn clear_hover(&mut self) {
        self.hover = None;
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hover
    }

    pub fn hover_info(&self, index: usize) -> Option<HoverInfo> {
        let p = self.series.get(index)?;
        Some(HoverInfo {
            index,
            x: MARGIN.left + self.focus_x().map_date(p.date),
            y: MARGIN.top + self.price_y().map(p.display_price),
            tooltip: self.sample_tooltip(p),
        })
    }

    fn sample_tooltip(&self, p: &SeriesPoint) -> Tooltip {
        let price = match self.mode {
            DisplayMode::Normalized => format!("{} (index)", format::grouped(p.display_price, 2)),
            DisplayMode::Raw => format::dollars(p.close),
        };
        let mut tip = Tooltip::new(self.ticker.clone().unwrap_or_default())
            .row("Date", format::long_date(p.date))
            .row("Price", price)
            .row("Volume", format::grouped(p.volume, 0));
        if let Some(r) = p.ret {
            tip = tip.row("Return", format::signed_percent(r));
        }
        tip
    }

    /// Filings of the current ticker inside the visible focus domain.
    pub fn visible_filings(&self) -> Vec<&FilingRow> {
        let Some(ticker) = &self.ticker else {
            return Vec::new();
        };
        let Some((a, b)) = self.focus_domain() else {
            return Vec::new();
        };
        self.filings
            .iter()
            .filter(|f| &f.ticker == ticker)
            .filter(|f| {
                let t = date_ms(f.filed_date);
                t >= a && t <= b
            })
            .collect()
    }

    /// Topmost filing marker within `slop` pixels of `(x, y)`.
    pub fn filing_at(&self, x: f64, y: f64, slop: f64) -> Option<&FilingRow> {
        let fx = self.focus_x();
        let top = MARGIN.top;
        let bottom = top + self.inner_height();
        self.visible_filings().into_iter().rev().find(|f| {
            let mx = MARGIN.left + fx.map_date(f.filed_date);
            let on_head = (x - mx).abs() <= MARKER_R + slop
                && (y - (top + MARKER_CY)).abs() <= MARKER_R + slop;
            let on_rule = (x - mx).abs() <= 0.5 + slop && y >= top && y <= bottom;
            on_head || on_rule
        })
    }

    pub fn filing_tooltip(&self, filing: &FilingRow) -> Tooltip {
        let mut tip = Tooltip::new(format!("{} filing", filing.form))
            .row("Date", format::long_date(filing.filed_date));
        if let Some(title) = &filing.title {
            tip = tip.row("Title", title.clone());
        }
        if filing.url.is_some() {
            tip = tip.footer("Click to open SEC link");
        }
        tip
    }

    /// Link behind the filing marker at `(x, y)`, if it has one.
    pub fn click_at(&self, x: f64, y: f64, slop: f64) -> Option<String> {
        self.filing_at(x, y, slop)?.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Mark, Point, Scene};
    use chrono::Duration;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// One sample every 7 days from 2020-06-01 to 2022-06-27.
    fn data() -> TimelineData {
        let start = day(2020, 6, 1);
        let prices = (0..109)
            .map(|i| PriceRow {
                date: start + Duration::days(7 * i),
                ticker: "AAPL".into(),
                close: 100.0 + i as f64,
                volume: 1_000.0 * (1 + i % 10) as f64,
                sector: None,
                ret: None,
                ma20: None,
            })
            .chain(std::iter::once(PriceRow {
                date: start,
                ticker: "MSFT".into(),
                close: 50.0,
                volume: 10.0,
                sector: None,
                ret: None,
                ma20: None,
            }))
            .collect();
        let filing = |d: NaiveDate, form: &str, url: Option<&str>| FilingRow {
            ticker: "AAPL".into(),
            filed_date: d,
            form: form.into(),
            title: Some("Report".into()),
            url: url.map(String::from),
        };
        TimelineData {
            prices,
            filings: vec![
                filing(day(2020, 10, 30), "10-K", Some("https://sec.example/10k")),
                filing(day(2021, 7, 28), "10-Q", None),
                filing(day(2022, 1, 28), "8-K", Some("https://sec.example/8k")),
            ],
        }
    }

    fn chart() -> TimelineChart {
        let mut c = TimelineChart::new(data(), DEFAULT_WIDTH);
        c.update_for_ticker(Some("AAPL"));
        c
    }

    #[test]
    fn placeholder_without_ticker() {
        let mut c = chart();
        c.update_for_ticker(None);
        assert_eq!(c.title(), PLACEHOLDER_TITLE);
        assert!(c.series().is_empty());
        assert!(c.focus_domain().is_none());
    }

    #[test]
    fn title_and_full_range_after_update() {
        let c = chart();
        assert_eq!(c.title(), "AAPL — Price + Volume (2020–2022)");
        assert_eq!(c.range_badge(), "Range: Full");
        assert_eq!(c.focus_domain(), c.context_domain());
        assert_eq!(c.year_bounds(), Some((2020, 2022)));
    }

    #[test]
    fn brushing_sets_domain_and_refits() {
        let mut c = chart();
        let ctx = c.context_x();
        let a = date_ms(day(2021, 1, 4));
        let b = date_ms(day(2021, 3, 29));
        let (x0, x1) = (MARGIN.left + ctx.map(a), MARGIN.left + ctx.map(b));
        let y = c.context_top() + 10.0;

        // the full-range selection covers the strip; clear it so the press creates
        c.brush.move_to(None);
        assert!(c.brush_start(x0, y));
        c.brush_drag(x1);
        c.brush_end(x1);

        assert_eq!(c.focus_domain(), Some((a, b)));
        let visible: Vec<&SeriesPoint> = c
            .series()
            .iter()
            .filter(|p| (a..=b).contains(&date_ms(p.date)))
            .collect();
        let lo = visible.iter().map(|p| p.display_price).fold(f64::INFINITY, f64::min);
        let hi = visible.iter().map(|p| p.display_price).fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(c.price_domain(), nice_domain(lo, hi, DEFAULT_TICKS));
        assert!(c.range_badge().contains("Jan 04, 2021"));
        assert!(c.range_badge().contains("Mar 29, 2021"));
    }

    fn path_points(scene: &Scene) -> Vec<Point> {
        scene
            .marks
            .iter()
            .flat_map(|m| match m {
                Mark::Path { segments, .. } => segments.iter().flatten().copied().collect(),
                _ => Vec::new(),
            })
            .collect()
    }

    #[test]
    fn flat_series_keeps_finite_domains() {
        let start = day(2021, 3, 1);
        let prices = (0..30)
            .map(|i| PriceRow {
                date: start + Duration::days(i),
                ticker: "FLAT".into(),
                close: 50.0,
                volume: 1_000.0,
                sector: None,
                ret: None,
                ma20: None,
            })
            .collect();
        let mut c = TimelineChart::new(TimelineData { prices, filings: Vec::new() }, DEFAULT_WIDTH);
        c.update_for_ticker(Some("FLAT"));

        let (lo, hi) = c.price_domain();
        assert!(lo.is_finite() && hi.is_finite());
        assert_eq!(lo, hi);
        let mid = c.price_y().map(lo);
        assert!(mid.is_finite());

        let points = path_points(&c.scene());
        assert!(!points.is_empty());
        assert!(points.iter().all(|(x, y)| x.is_finite() && y.is_finite()));
    }

    #[test]
    fn single_sample_series_renders() {
        let mut c = chart();
        c.update_for_ticker(Some("MSFT"));
        assert_eq!(c.series().len(), 1);
        let (lo, hi) = c.price_domain();
        assert!(lo.is_finite() && hi.is_finite());
        assert!(c.hover(MARGIN.left + c.inner_width() / 2.0, MARGIN.top + 20.0).is_some());
    }

    #[test]
    fn empty_brush_changes_nothing() {
        let mut c = chart();
        c.jump_to_year(2021);
        let before = c.focus_domain();
        let y = c.context_top() + 10.0;
        c.brush.move_to(None);
        c.brush_start(MARGIN.left + 5.0, y);
        c.brush_end(MARGIN.left + 5.0);
        assert_eq!(c.focus_domain(), before);
        assert_eq!(c.brush_selection(), None);
    }

    #[test]
    fn year_jump_clamps_to_extent() {
        let mut c = chart();
        c.jump_to_year(2021);
        assert_eq!(
            c.focus_domain(),
            Some((date_ms(day(2021, 1, 1)), date_ms(day(2021, 12, 31))))
        );
        c.jump_to_year(2020);
        assert_eq!(
            c.focus_domain(),
            Some((date_ms(day(2020, 6, 1)), date_ms(day(2020, 12, 31))))
        );
        c.jump_to_year(2022);
        assert_eq!(
            c.focus_domain(),
            Some((date_ms(day(2022, 1, 1)), date_ms(day(2022, 6, 27))))
        );
    }

    #[test]
    fn show_all_restores_full_domain() {
        let mut c = chart();
        c.jump_to_year(2021);
        c.show_all();
        assert_eq!(c.focus_domain(), c.context_domain());
        assert!(c.range_badge().starts_with("Range: Jun 01, 2020"));
    }

    #[test]
    fn mode_toggle_resets_brush_and_keeps_values() {
        let mut c = chart();
        let raw: Vec<f64> = c.series().iter().map(|p| p.display_price).collect();
        c.jump_to_year(2021);
        c.toggle_mode();
        assert_eq!(c.series()[0].display_price, 100.0);
        assert_eq!(c.range_badge(), "Range: Full");
        c.toggle_mode();
        let back: Vec<f64> = c.series().iter().map(|p| p.display_price).collect();
        assert_eq!(raw, back);
    }

    #[test]
    fn hover_finds_nearest_sample() {
        let mut c = chart();
        let target = c.series()[10].date;
        let x = MARGIN.left + c.focus_x().map_date(target + Duration::days(2));
        let info = c.hover(x, MARGIN.top + 50.0).unwrap();
        assert_eq!(info.index, 10);
        assert_eq!(info.tooltip.value("Price"), Some("$110.00"));
        assert!(info.tooltip.value("Return").is_some());
        assert!(c.hover(x, 5.0).is_none());
    }

    #[test]
    fn normalized_tooltip_uses_index() {
        let mut c = chart();
        c.set_mode(DisplayMode::Normalized);
        let info = c.hover_info(0).unwrap();
        assert_eq!(info.tooltip.value("Price"), Some("100.00 (index)"));
        assert_eq!(info.tooltip.value("Return"), None);
    }

    #[test]
    fn filings_follow_visible_domain() {
        let mut c = chart();
        assert_eq!(c.visible_filings().len(), 3);
        c.jump_to_year(2021);
        let visible = c.visible_filings();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].form, "10-Q");
    }

    #[test]
    fn clicking_marker_yields_url() {
        let c = chart();
        let f = &c.visible_filings()[0].clone();
        let x = MARGIN.left + c.focus_x().map_date(f.filed_date);
        let y = MARGIN.top + MARKER_CY;
        assert_eq!(c.click_at(x, y, 0.0).as_deref(), Some("https://sec.example/10k"));
        assert_eq!(c.filing_tooltip(f).footer.as_deref(), Some("Click to open SEC link"));
    }

    #[test]
    fn resize_without_ticker_is_noop() {
        let mut c = TimelineChart::new(data(), DEFAULT_WIDTH);
        c.resize(700.0);
        assert_eq!(c.width(), 700.0);
        assert_eq!(c.title(), PLACEHOLDER_TITLE);
        c.resize(10_000.0);
        assert_eq!(c.width(), MAX_WIDTH);
    }

    #[test]
    fn step_year_walks_bounds() {
        let mut c = chart();
        c.step_year(1);
        assert_eq!(c.year(), Some(2020));
        c.step_year(1);
        assert_eq!(c.year(), Some(2021));
        c.step_year(5);
        assert_eq!(c.year(), Some(2022));
    }

    #[test]
    fn unknown_ticker_has_no_series() {
        let mut c = chart();
        c.update_for_ticker(Some("ZZZ"));
        assert_eq!(c.title(), "ZZZ — Price + Volume");
        assert!(c.focus_domain().is_none());
    }
}
