//! Top-level UI layout: header, two chart panels, status bar.

pub mod chart_panel;
pub mod header;
pub mod overlays;
pub mod scene_view;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::app::{AppState, Overlay};

/// Screen regions, including the chart areas inside their borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub header: Rect,
    pub scatter_block: Rect,
    pub scatter: Rect,
    pub timeline_block: Rect,
    pub timeline: Rect,
    pub status: Rect,
}

/// Split the terminal. Input handling uses the same split to map the
/// pointer back onto a chart.
pub fn areas(viewport: Rect) -> Areas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Percentage(46),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(viewport);
    let inner = |r: Rect| Block::default().borders(Borders::ALL).inner(r);
    Areas {
        header: rows[0],
        scatter_block: rows[1],
        scatter: inner(rows[1]),
        timeline_block: rows[2],
        timeline: inner(rows[2]),
        status: rows[3],
    }
}

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let full = f.area();
    let a = areas(full);

    header::render(f, a.header, app);
    chart_panel::render_scatter(f, a.scatter_block, app);
    chart_panel::render_timeline(f, a.timeline_block, app);
    status_bar::render(f, a.status, app);

    if let (Some(tip), Some(pointer)) = (&app.tooltip, app.pointer) {
        overlays::render_tooltip(f, full, pointer, tip);
    }

    match &app.overlay {
        Overlay::Help => overlays::render_help(f, full),
        Overlay::Picker(picker) => overlays::render_picker(f, full, picker),
        Overlay::ErrorHistory => overlays::render_error_history(f, full, app),
        Overlay::None => {}
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use sectorscope_core::config::DashboardConfig;
    use sectorscope_core::dashboard::DashboardEvent;

    use crate::test_helpers::{summary_rows, timeline_data};

    fn screen(app: &AppState) -> String {
        let area = app.viewport;
        let mut terminal = Terminal::new(TestBackend::new(area.width, area.height)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buf = terminal.backend().buffer();
        let mut s = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                s.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            s.push('\n');
        }
        s
    }

    #[test]
    fn areas_stack_without_overlap() {
        let a = areas(Rect::new(0, 0, 120, 40));
        assert_eq!(a.header.height, 1);
        assert_eq!(a.status.y, 39);
        assert!(a.scatter_block.bottom() <= a.timeline_block.y);
        assert_eq!(a.scatter.x, 1);
        assert_eq!(a.timeline.width, 118);
    }

    #[test]
    fn loading_screen_renders() {
        let app = AppState::new(&DashboardConfig::default(), Rect::new(0, 0, 120, 40));
        let text = screen(&app);
        assert!(text.contains("Selected: None"));
        assert!(text.contains("Loading"));
    }

    #[test]
    fn loaded_screen_shows_badges_and_titles() {
        let mut app = AppState::new(&DashboardConfig::default(), Rect::new(0, 0, 140, 48));
        app.dispatch(DashboardEvent::SummaryLoaded(Ok(summary_rows())));
        app.dispatch(DashboardEvent::TimelineLoaded(Ok(timeline_data())));
        app.dispatch(DashboardEvent::TickerChanged("AAPL".into()));
        let text = screen(&app);
        assert!(text.contains("Selected: AAPL"));
        assert!(text.contains("Range: Full"));
        assert!(text.contains("AAPL"));
    }

    #[test]
    fn help_overlay_draws_on_top() {
        let mut app = AppState::new(&DashboardConfig::default(), Rect::new(0, 0, 120, 40));
        app.overlay = Overlay::Help;
        assert!(screen(&app).contains("Keys"));
    }
}
