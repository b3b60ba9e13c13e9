//! Color tokens shared by the SVG and terminal renderers.

use serde::Serialize;

use crate::data::FormType;

/// sRGB color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// CSS color string: `#rrggbb` when opaque, `rgba(..)` otherwise.
    pub fn to_css(self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
        }
    }

    /// Composite over an opaque background at an extra `opacity` factor.
    pub fn over(self, background: Rgba, opacity: f64) -> Rgba {
        let alpha = (self.a * opacity).clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| -> u8 {
            (f64::from(fg) * alpha + f64::from(bg) * (1.0 - alpha)).round() as u8
        };
        Rgba::rgb(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }
}

/// Tableau 10 categorical scheme.
pub const TABLEAU10: [Rgba; 10] = [
    Rgba::rgb(0x4e, 0x79, 0xa7),
    Rgba::rgb(0xf2, 0x8e, 0x2c),
    Rgba::rgb(0xe1, 0x57, 0x59),
    Rgba::rgb(0x76, 0xb7, 0xb2),
    Rgba::rgb(0x59, 0xa1, 0x4f),
    Rgba::rgb(0xed, 0xc9, 0x49),
    Rgba::rgb(0xaf, 0x7a, 0xa1),
    Rgba::rgb(0xff, 0x9d, 0xa7),
    Rgba::rgb(0x9c, 0x75, 0x5f),
    Rgba::rgb(0xba, 0xb0, 0xab),
];

pub const BACKGROUND: Rgba = Rgba::rgb(0x0b, 0x10, 0x20);
pub const TEXT: Rgba = Rgba::rgb(0xe6, 0xe9, 0xf2);
pub const TEXT_MUTED: Rgba = Rgba::rgb(0xa7, 0xb1, 0xc6);
pub const ERROR_TEXT: Rgba = Rgba::rgb(0xfc, 0xa5, 0xa5);
pub const WHITE: Rgba = Rgba::rgb(0xff, 0xff, 0xff);

pub const GRID: Rgba = Rgba::rgba(255, 255, 255, 0.07);
pub const AXIS: Rgba = Rgba::rgba(255, 255, 255, 0.45);
pub const POINT_STROKE: Rgba = Rgba::rgba(255, 255, 255, 0.18);

pub const PRICE_LINE: Rgba = Rgba::rgba(255, 255, 255, 0.92);
pub const MA_LINE: Rgba = Rgba::rgba(139, 92, 246, 0.92);
pub const VOLUME_AREA: Rgba = Rgba::rgba(255, 255, 255, 0.10);
pub const CONTEXT_LINE: Rgba = Rgba::rgba(255, 255, 255, 0.50);
pub const CROSSHAIR: Rgba = Rgba::rgba(255, 255, 255, 0.18);
pub const BRUSH_FILL: Rgba = Rgba::rgba(119, 119, 119, 0.30);
pub const BRUSH_STROKE: Rgba = Rgba::rgba(255, 255, 255, 0.60);
pub const MARKER_STROKE: Rgba = Rgba::rgba(255, 255, 255, 0.55);
pub const DOT_STROKE: Rgba = Rgba::rgba(0, 0, 0, 0.35);

/// Marker color for a filing form.
pub fn form_color(form: FormType) -> Rgba {
    match form {
        FormType::Annual => Rgba::rgba(245, 158, 11, 0.95),
        FormType::Quarterly => Rgba::rgba(34, 197, 94, 0.95),
        FormType::Current => Rgba::rgba(239, 68, 68, 0.95),
        FormType::Other => Rgba::rgba(148, 163, 184, 0.95),
    }
}
