//! Top line: selection badge, range badge, display mode and key hints.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

const HINTS: &str = "s:sector t:company r:reset m:mode [/]:year a:all ?:help q:quit";

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let d = &app.dashboard;
    let spans = vec![
        Span::styled(" SectorScope ", theme::accent_bold()),
        Span::styled(d.badge_text(), theme::accent()),
        Span::raw("  "),
        Span::styled(d.range_badge(), theme::text()),
        Span::raw("  "),
        Span::styled(format!("Mode: {}", d.mode()), theme::muted()),
        Span::raw("  "),
        Span::styled(HINTS, theme::muted()),
    ];
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
