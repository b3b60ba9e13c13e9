//! Input dispatch: overlays first, then global keys; mouse events are
//! mapped from terminal cells onto the chart under the pointer.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use log::warn;

use sectorscope_core::dashboard::{DashboardEvent, Outcome};

use crate::app::{AppState, Drag, ErrorCategory, Overlay, Panel, PickerKind};
use crate::link;
use crate::ui;
use crate::ui::scene_view::{cell_to_scene, half_cell};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Windows sends both Press and Release.
    if key.kind != KeyEventKind::Press {
        return;
    }

    match &app.overlay {
        Overlay::Help => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::Picker(_) => {
            handle_picker(app, key);
            return;
        }
        Overlay::None => {}
    }

    match key.code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Tab | KeyCode::BackTab => app.focus = app.focus.toggled(),
        KeyCode::Char('s') => app.open_picker(PickerKind::Sector),
        KeyCode::Char('t') => app.open_picker(PickerKind::Ticker),
        KeyCode::Char('r') => {
            app.dispatch(DashboardEvent::Reset);
        }
        KeyCode::Char('m') => {
            app.dispatch(DashboardEvent::ToggleMode);
            let mode = app.dashboard.mode();
            app.set_status(format!("Mode: {mode}"));
        }
        KeyCode::Char('[') => {
            app.dispatch(DashboardEvent::StepYear(-1));
        }
        KeyCode::Char(']') => {
            app.dispatch(DashboardEvent::StepYear(1));
        }
        KeyCode::Char('a') => {
            app.dispatch(DashboardEvent::ShowAll);
        }
        KeyCode::Char('e') => {
            app.error_scroll = 0;
            app.overlay = Overlay::ErrorHistory;
        }
        KeyCode::Char('?') | KeyCode::Char('h') => app.overlay = Overlay::Help,
        KeyCode::Esc => app.tooltip = None,
        _ => {}
    }
}

fn handle_picker(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.overlay = Overlay::None,
        KeyCode::Enter => app.confirm_picker(),
        KeyCode::Char('j') | KeyCode::Down => {
            if let Overlay::Picker(p) = &mut app.overlay {
                p.down();
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if let Overlay::Picker(p) = &mut app.overlay {
                p.up();
            }
        }
        _ => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

/// Where a terminal cell lands, in scene coordinates of one chart.
enum Target {
    Scatter(f64, f64),
    Timeline(f64, f64),
    Outside,
}

fn locate(app: &mut AppState, col: u16, row: u16) -> Target {
    let areas = ui::areas(app.viewport);
    let (sw, sh) = app.dashboard.scatter_extent();
    if let Some((x, y)) = cell_to_scene(areas.scatter, sw, sh, col, row) {
        app.dashboard.set_hit_slop(half_cell(areas.scatter, sw, sh));
        return Target::Scatter(x, y);
    }
    let (tw, th) = app.dashboard.timeline_extent();
    if let Some((x, y)) = cell_to_scene(areas.timeline, tw, th, col, row) {
        app.dashboard.set_hit_slop(half_cell(areas.timeline, tw, th));
        return Target::Timeline(x, y);
    }
    Target::Outside
}

/// Timeline x for a drag that may have left the panel.
fn timeline_x(app: &AppState, col: u16) -> f64 {
    let area = ui::areas(app.viewport).timeline;
    let (tw, _) = app.dashboard.timeline_extent();
    if area.width == 0 {
        return 0.0;
    }
    let col = col.clamp(area.x, area.x + area.width - 1);
    (f64::from(col - area.x) + 0.5) * tw / f64::from(area.width)
}

pub fn handle_mouse(app: &mut AppState, mouse: MouseEvent) {
    if app.overlay != Overlay::None {
        return;
    }
    let (col, row) = (mouse.column, mouse.row);
    app.pointer = Some((col, row));

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => match locate(app, col, row) {
            Target::Scatter(x, y) => {
                app.focus = Panel::Scatter;
                app.dispatch(DashboardEvent::ClickScatter { x, y });
            }
            Target::Timeline(x, y) => {
                app.focus = Panel::Timeline;
                let in_context = app
                    .dashboard
                    .timeline()
                    .ready()
                    .is_some_and(|c| c.in_context(x, y));
                if in_context {
                    app.drag = Drag::Brush;
                    app.tooltip = None;
                    app.dispatch(DashboardEvent::BrushStart { x, y });
                } else if let Outcome::OpenLink(url) = app.dispatch(DashboardEvent::ClickTimeline { x, y }) {
                    open_link(app, &url);
                }
            }
            Target::Outside => {}
        },
        MouseEventKind::Drag(MouseButton::Left) => {
            if app.drag == Drag::Brush {
                let x = timeline_x(app, col);
                app.dispatch(DashboardEvent::BrushDrag { x });
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if app.drag == Drag::Brush {
                app.drag = Drag::None;
                let x = timeline_x(app, col);
                app.dispatch(DashboardEvent::BrushEnd { x });
            }
        }
        MouseEventKind::Moved => {
            let outcome = match locate(app, col, row) {
                Target::Scatter(x, y) => app.dispatch(DashboardEvent::HoverScatter { x, y }),
                Target::Timeline(x, y) => app.dispatch(DashboardEvent::HoverTimeline { x, y }),
                Target::Outside => Outcome::Nothing,
            };
            if !matches!(outcome, Outcome::Tooltip(_)) {
                app.tooltip = None;
            }
        }
        _ => {}
    }
}

fn open_link(app: &mut AppState, url: &str) {
    match link::open(url) {
        Ok(()) => app.set_status(format!("Opened {url}")),
        Err(e) => {
            warn!("failed to open {url}: {e}");
            app.push_error(ErrorCategory::Link, format!("Could not open link: {e}"), url.to_string());
        }
    }
}
