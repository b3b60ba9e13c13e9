//! Application state: single-owner, main-thread only.
//!
//! The dashboard holds all chart state; this wraps it with the terminal
//! concerns: focus, overlays, pointer tracking and status messages.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use ratatui::layout::Rect;

use sectorscope_core::config::DashboardConfig;
use sectorscope_core::dashboard::{Dashboard, DashboardEvent, Outcome};
use sectorscope_core::scene::Tooltip;
use sectorscope_core::selection::SelectionEvent;

/// Horizontal pixels represented by one terminal column.
pub const CELL_PX: f64 = 8.0;

const ERROR_HISTORY_CAP: usize = 50;

/// Which chart has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Scatter,
    Timeline,
}

impl Panel {
    pub fn label(self) -> &'static str {
        match self {
            Panel::Scatter => "Sectors",
            Panel::Timeline => "Timeline",
        }
    }

    pub fn toggled(self) -> Panel {
        match self {
            Panel::Scatter => Panel::Timeline,
            Panel::Timeline => Panel::Scatter,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Link,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Data => "DATA",
            ErrorCategory::Link => "LINK",
            ErrorCategory::Other => "ERR",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Which dropdown a picker stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    Sector,
    Ticker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    pub kind: PickerKind,
    pub options: Vec<String>,
    pub cursor: usize,
}

impl Picker {
    pub fn title(&self) -> &'static str {
        match self.kind {
            PickerKind::Sector => " Sector [Enter]apply [Esc]close ",
            PickerKind::Ticker => " Company [Enter]apply [Esc]close ",
        }
    }

    pub fn down(&mut self) {
        if self.cursor + 1 < self.options.len() {
            self.cursor += 1;
        }
    }

    pub fn up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn current(&self) -> Option<&str> {
        self.options.get(self.cursor).map(String::as_str)
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    Picker(Picker),
    ErrorHistory,
}

/// A left-button drag on the context strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drag {
    None,
    Brush,
}

pub struct AppState {
    pub dashboard: Dashboard,
    pub running: bool,
    pub focus: Panel,
    pub overlay: Overlay,
    pub drag: Drag,

    /// Full terminal area at the last draw or resize.
    pub viewport: Rect,
    pub pointer: Option<(u16, u16)>,
    pub tooltip: Option<Tooltip>,

    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,

    started: Instant,
}

impl AppState {
    pub fn new(config: &DashboardConfig, viewport: Rect) -> Self {
        let mut app = Self {
            dashboard: Dashboard::new(config),
            running: true,
            focus: Panel::Scatter,
            overlay: Overlay::None,
            drag: Drag::None,
            viewport,
            pointer: None,
            tooltip: None,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            started: Instant::now(),
        };
        app.resize(viewport);
        app
    }

    /// Feed an event to the dashboard and reflect the outcome in the UI.
    pub fn dispatch(&mut self, event: DashboardEvent) -> Outcome {
        let outcome = self.dashboard.handle(event);
        match &outcome {
            Outcome::Selection(SelectionEvent::Selected(t)) => self.set_status(format!("Selected {t}")),
            Outcome::Selection(SelectionEvent::Cleared) => self.set_status("Selection cleared"),
            Outcome::Tooltip(tip) => self.tooltip = Some(tip.clone()),
            Outcome::OpenLink(_) | Outcome::Nothing => {}
        }
        outcome
    }

    /// Run the auto-select timer against the time since startup.
    pub fn tick(&mut self) {
        self.tick_at(self.started.elapsed());
    }

    pub fn tick_at(&mut self, elapsed: Duration) {
        if let Some(SelectionEvent::Selected(t)) = self.dashboard.tick(elapsed) {
            self.set_status(format!("Auto-selected {t}"));
        }
    }

    /// New terminal size: both charts re-render at the matching pixel width.
    pub fn resize(&mut self, viewport: Rect) {
        self.viewport = viewport;
        self.tooltip = None;
        let width = f64::from(viewport.width.saturating_sub(2)) * CELL_PX;
        self.dispatch(DashboardEvent::Resize { width });
    }

    pub fn open_picker(&mut self, kind: PickerKind) {
        let Some(chart) = self.dashboard.scatter().ready() else {
            self.set_warning("Company data is not loaded yet");
            return;
        };
        let (options, current) = match kind {
            PickerKind::Sector => (chart.sector_options(), chart.sector_filter().to_string()),
            PickerKind::Ticker => (chart.ticker_options(), chart.ticker_filter().to_string()),
        };
        let cursor = options.iter().position(|o| *o == current).unwrap_or(0);
        self.overlay = Overlay::Picker(Picker {
            kind,
            options,
            cursor,
        });
    }

    /// Apply the highlighted picker option and close the picker.
    pub fn confirm_picker(&mut self) {
        let Overlay::Picker(picker) = std::mem::replace(&mut self.overlay, Overlay::None) else {
            return;
        };
        let Some(choice) = picker.current().map(str::to_string) else {
            return;
        };
        let event = match picker.kind {
            PickerKind::Sector => DashboardEvent::SectorChanged(choice),
            PickerKind::Ticker => DashboardEvent::TickerChanged(choice),
        };
        self.dispatch(event);
    }

    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::summary_rows as rows;

    fn app() -> AppState {
        AppState::new(&DashboardConfig::default(), Rect::new(0, 0, 120, 40))
    }

    #[test]
    fn error_history_caps_at_50() {
        let mut app = app();
        for i in 0..60 {
            app.push_error(ErrorCategory::Other, format!("error {i}"), String::new());
        }
        assert_eq!(app.error_history.len(), 50);
        assert!(app.error_history[0].message.contains("59"));
        assert_eq!(app.status_message.as_ref().map(|m| m.1), Some(StatusLevel::Error));
    }

    #[test]
    fn picker_needs_loaded_summary() {
        let mut app = app();
        app.open_picker(PickerKind::Sector);
        assert_eq!(app.overlay, Overlay::None);
        assert_eq!(app.status_message.as_ref().map(|m| m.1), Some(StatusLevel::Warning));
    }

    #[test]
    fn sector_picker_applies_choice() {
        let mut app = app();
        app.dispatch(DashboardEvent::SummaryLoaded(Ok(rows())));
        app.open_picker(PickerKind::Sector);
        let Overlay::Picker(picker) = &mut app.overlay else {
            panic!("picker not open");
        };
        assert_eq!(picker.options, vec!["All", "Energy", "Technology"]);
        picker.down();
        app.confirm_picker();
        assert_eq!(app.overlay, Overlay::None);
        let chart = app.dashboard.scatter().ready().unwrap();
        assert_eq!(chart.sector_filter(), "Energy");
        assert_eq!(app.status_message.as_ref().unwrap().0, "Selection cleared");
    }

    #[test]
    fn ticker_picker_selects() {
        let mut app = app();
        app.dispatch(DashboardEvent::SummaryLoaded(Ok(rows())));
        app.open_picker(PickerKind::Ticker);
        if let Overlay::Picker(p) = &mut app.overlay {
            p.down();
            p.down();
        }
        app.confirm_picker();
        assert_eq!(app.dashboard.selected(), Some("MSFT"));
    }

    #[test]
    fn auto_select_reports_status() {
        let mut app = app();
        app.dispatch(DashboardEvent::SummaryLoaded(Ok(rows())));
        app.tick_at(Duration::from_millis(700));
        assert_eq!(app.dashboard.selected(), Some("AAPL"));
        assert_eq!(app.status_message.as_ref().unwrap().0, "Auto-selected AAPL");
    }

    #[test]
    fn panel_toggle() {
        assert_eq!(Panel::Scatter.toggled(), Panel::Timeline);
        assert_eq!(Panel::Timeline.toggled(), Panel::Scatter);
    }
}
