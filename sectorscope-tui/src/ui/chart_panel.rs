//! The two chart panels: a border with the chart's scene inside.
//!
//! A chart that failed to load shows its message as wrapped text instead;
//! braille rows are too coarse to keep two error lines apart.

use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use sectorscope_core::dashboard::{SCATTER_ERROR, TIMELINE_ERROR};
use sectorscope_core::scene::Scene;

use crate::app::{AppState, Panel};
use crate::theme;
use crate::ui::scene_view::SceneView;

enum Body<'a> {
    Scene(Scene),
    Failed { headline: &'static str, cause: &'a str },
}

fn render_panel(f: &mut Frame, area: Rect, app: &AppState, panel: Panel, title: String, body: Body) {
    let focused = app.focus == panel;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(focused))
        .title(title)
        .title_style(theme::panel_title(focused));
    let inner = block.inner(area);
    f.render_widget(block, area);

    match body {
        Body::Scene(scene) => f.render_widget(SceneView::new(&scene), inner),
        Body::Failed { headline, cause } => {
            let text = vec![
                Line::from(""),
                Line::from(Span::styled(headline, theme::negative())),
                Line::from(Span::styled(cause, theme::muted())),
            ];
            let para = Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            f.render_widget(para, inner);
        }
    }
}

pub fn render_scatter(f: &mut Frame, area: Rect, app: &AppState) {
    let slot = app.dashboard.scatter();
    let title = match slot.ready() {
        Some(chart) => format!(
            " {} [{} | {}] ",
            Panel::Scatter.label(),
            chart.sector_filter(),
            chart.ticker_filter()
        ),
        None => format!(" {} ", Panel::Scatter.label()),
    };
    let body = match slot.error() {
        Some(cause) => Body::Failed {
            headline: SCATTER_ERROR,
            cause,
        },
        None => Body::Scene(app.dashboard.scatter_scene()),
    };
    render_panel(f, area, app, Panel::Scatter, title, body);
}

pub fn render_timeline(f: &mut Frame, area: Rect, app: &AppState) {
    let slot = app.dashboard.timeline();
    let title = match slot.ready() {
        Some(chart) => format!(" {} [{}] ", Panel::Timeline.label(), chart.title()),
        None => format!(" {} ", Panel::Timeline.label()),
    };
    let body = match slot.error() {
        Some(cause) => Body::Failed {
            headline: TIMELINE_ERROR,
            cause,
        },
        None => Body::Scene(app.dashboard.timeline_scene()),
    };
    render_panel(f, area, app, Panel::Timeline, title, body);
}
