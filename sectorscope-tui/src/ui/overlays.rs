//! Overlay widgets: tooltip, help, filter pickers, error history.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use sectorscope_core::scene::Tooltip;

use crate::app::{AppState, Picker};
use crate::theme;
use crate::ui::centered_rect;

/// Place a `w`×`h` box near the pointer, flipping left/up at the screen edge.
fn tooltip_rect(area: Rect, (col, row): (u16, u16), w: u16, h: u16) -> Rect {
    let w = w.min(area.width);
    let h = h.min(area.height);
    let right = area.x + area.width;
    let bottom = area.y + area.height;

    let x = if col + 2 + w <= right {
        col + 2
    } else {
        col.saturating_sub(w + 1).max(area.x)
    };
    let y = if row + 1 + h <= bottom {
        row + 1
    } else {
        row.saturating_sub(h).max(area.y)
    };
    Rect::new(x, y, w, h)
}

/// Tooltip box following the pointer.
pub fn render_tooltip(f: &mut Frame, area: Rect, pointer: (u16, u16), tip: &Tooltip) {
    let mut lines = vec![Line::from(Span::styled(tip.title.as_str(), theme::accent_bold()))];
    for (label, value) in &tip.rows {
        lines.push(Line::from(vec![
            Span::styled(format!("{label}: "), theme::muted()),
            Span::styled(value.as_str(), theme::text()),
        ]));
    }
    if let Some(footer) = &tip.footer {
        lines.push(Line::from(Span::styled(footer.as_str(), theme::muted())));
    }

    let content_w = lines.iter().map(Line::width).max().unwrap_or(0) as u16;
    let popup = tooltip_rect(area, pointer, content_w + 2, lines.len() as u16 + 2);
    f.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent());
    f.render_widget(Paragraph::new(lines).block(block), popup);
}

const KEYS: &[(&str, &str)] = &[
    ("click", "select a company (scatter) / open a filing (timeline)"),
    ("drag", "brush a range on the lower timeline strip"),
    ("s", "choose sector"),
    ("t", "choose company"),
    ("r", "reset filters and selection"),
    ("m", "toggle Price / Return mode"),
    ("[ ]", "previous / next year"),
    ("a", "show all dates"),
    ("Tab", "switch focused panel"),
    ("e", "error history"),
    ("q", "quit"),
];

/// Key reference.
pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 60, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Keys [any key]close ")
        .title_style(theme::accent_bold());

    let mut text = vec![Line::from("")];
    text.extend(KEYS.iter().map(|(key, what)| {
        Line::from(vec![
            Span::styled(format!("  {key:<7}"), theme::accent_bold()),
            Span::styled(*what, theme::muted()),
        ])
    }));

    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
    f.render_widget(para, popup);
}

/// Sector or company picker.
pub fn render_picker(f: &mut Frame, area: Rect, picker: &Picker) {
    let popup = centered_rect(40, 60, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(picker.title())
        .title_style(theme::accent_bold());

    let items: Vec<ListItem> = picker
        .options
        .iter()
        .map(|o| ListItem::new(Span::styled(o.as_str(), theme::text())))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(theme::accent_bold().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(picker.cursor));
    f.render_stateful_widget(list, popup, &mut state);
}

/// Error history overlay.
pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(
            " Error History ({}) [Esc]close [j/k]scroll ",
            app.error_history.len()
        ))
        .title_style(theme::negative());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        let text = Paragraph::new(Span::styled("No errors recorded.", theme::muted()));
        f.render_widget(text, inner);
        return;
    }

    let visible_height = inner.height as usize;
    let start = app.error_scroll.min(app.error_history.len() - 1);
    let end = (start + visible_height).min(app.error_history.len());

    let mut lines: Vec<Line> = Vec::new();
    for (i, err) in app.error_history.iter().enumerate().take(end).skip(start) {
        let style = if i == start {
            theme::negative().add_modifier(Modifier::BOLD)
        } else {
            theme::muted()
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", err.timestamp.format("%H:%M:%S")),
                theme::muted(),
            ),
            Span::styled(format!("[{}] ", err.category.label()), theme::warning()),
            Span::styled(err.message.as_str(), style),
        ]));

        if !err.context.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(err.context.as_str(), theme::muted()),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use sectorscope_core::config::DashboardConfig;

    use crate::app::{ErrorCategory, Overlay, PickerKind};
    use crate::test_helpers::summary_rows;
    use sectorscope_core::dashboard::DashboardEvent;

    fn draw_text(w: u16, h: u16, draw: impl FnOnce(&mut Frame, Rect)) -> String {
        let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                draw(f, area)
            })
            .unwrap();
        let buf = terminal.backend().buffer();
        let mut s = String::new();
        for y in 0..h {
            for x in 0..w {
                s.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            s.push('\n');
        }
        s
    }

    #[test]
    fn tooltip_flips_at_edges() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(tooltip_rect(area, (10, 5), 20, 6), Rect::new(12, 6, 20, 6));
        assert_eq!(tooltip_rect(area, (70, 20), 20, 6), Rect::new(49, 14, 20, 6));
    }

    #[test]
    fn tooltip_lists_rows() {
        let tip = Tooltip {
            title: "AAPL".into(),
            rows: vec![("Sector".into(), "Technology".into())],
            footer: Some("Click to open".into()),
        };
        let text = draw_text(60, 20, |f, area| render_tooltip(f, area, (2, 2), &tip));
        assert!(text.contains("AAPL"));
        assert!(text.contains("Sector: Technology"));
        assert!(text.contains("Click to open"));
    }

    #[test]
    fn picker_marks_cursor() {
        let mut app = AppState::new(&DashboardConfig::default(), Rect::new(0, 0, 100, 30));
        app.dispatch(DashboardEvent::SummaryLoaded(Ok(summary_rows())));
        app.open_picker(PickerKind::Sector);
        let Overlay::Picker(picker) = app.overlay.clone() else {
            panic!("picker not open");
        };
        let text = draw_text(100, 30, |f, area| render_picker(f, area, &picker));
        assert!(text.contains("> All"));
        assert!(text.contains("Technology"));
    }

    #[test]
    fn error_history_shows_category() {
        let mut app = AppState::new(&DashboardConfig::default(), Rect::new(0, 0, 100, 30));
        app.push_error(ErrorCategory::Link, "could not open".into(), "https://x".into());
        let text = draw_text(100, 30, |f, area| render_error_history(f, area, &app));
        assert!(text.contains("[LINK] could not open"));
        assert!(text.contains("https://x"));
    }
}
