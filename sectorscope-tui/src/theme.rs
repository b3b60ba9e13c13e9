//! Slate theme tokens for the SectorScope TUI.
//!
//! Chart marks keep the colors the scenes carry; everything around them
//! (borders, hints, status text) uses the tokens here.
//!
//! # Color Palette
//! - **Background**: Deep slate, the same surface the SVG export uses
//! - **Accent**: Sky blue (focus, selection badge)
//! - **Positive**: Green (status confirmations)
//! - **Negative**: Red (load failures, error history)
//! - **Warning**: Amber (skipped actions)
//! - **Muted**: Slate grey (hints, secondary text)

use ratatui::style::{Color, Modifier, Style};

use sectorscope_core::palette::{self, Rgba};

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::slate()
    }
}

impl Theme {
    pub fn slate() -> Self {
        Self {
            background: rgb(palette::BACKGROUND),
            accent: ACCENT,
            positive: Color::Rgb(74, 222, 128),
            negative: rgb(palette::ERROR_TEXT),
            warning: Color::Rgb(251, 191, 36),
            muted: rgb(palette::TEXT_MUTED),
            text_primary: rgb(palette::TEXT),
            text_secondary: Color::Rgb(148, 163, 184),
        }
    }
}

pub const ACCENT: Color = Color::Rgb(56, 189, 248);

/// Opaque terminal color for a palette entry.
pub fn rgb(c: Rgba) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Terminal color for a mark drawn at `opacity` over the chart background.
pub fn blended(c: Rgba, opacity: f64) -> Color {
    rgb(c.over(palette::BACKGROUND, opacity))
}

pub fn accent() -> Style {
    Style::default().fg(Theme::default().accent)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(Theme::default().muted)
}

pub fn text() -> Style {
    Style::default().fg(Theme::default().text_primary)
}

pub fn positive() -> Style {
    Style::default().fg(Theme::default().positive)
}

pub fn negative() -> Style {
    Style::default().fg(Theme::default().negative)
}

pub fn warning() -> Style {
    Style::default().fg(Theme::default().warning)
}

pub fn panel_border(focused: bool) -> Style {
    if focused {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(focused: bool) -> Style {
    if focused {
        accent_bold()
    } else {
        muted()
    }
}
