//! Backend-neutral drawing primitives.
//!
//! Charts build a [`Scene`] in absolute pixel coordinates (origin top-left).
//! The SVG writer and the terminal canvas both consume the same scene.

use serde::Serialize;

use crate::palette::Rgba;

pub type Point = (f64, f64);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
    /// Dash and gap lengths; solid when `None`.
    pub dash: Option<(f64, f64)>,
}

impl Stroke {
    pub fn solid(color: Rgba, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Rgba, width: f64, dash: f64, gap: f64) -> Self {
        Self {
            color,
            width,
            dash: Some((dash, gap)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mark {
    Circle {
        /// Datum identity, e.g. the ticker of a scatter point.
        key: Option<String>,
        cx: f64,
        cy: f64,
        r: f64,
        fill: Rgba,
        opacity: f64,
        stroke: Option<Stroke>,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
        opacity: f64,
    },
    /// Disconnected runs of a single polyline.
    Path {
        segments: Vec<Vec<Point>>,
        stroke: Stroke,
        opacity: f64,
    },
    /// Filled region between `top` and a horizontal baseline.
    Area {
        top: Vec<Point>,
        baseline: f64,
        fill: Rgba,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<Rgba>,
        stroke: Option<Stroke>,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        color: Rgba,
        size: f64,
        anchor: Anchor,
        bold: bool,
        /// Rotation in degrees around `(x, y)`.
        rotate: f64,
    },
}

impl Mark {
    pub fn text(x: f64, y: f64, text: impl Into<String>, color: Rgba, size: f64) -> Self {
        Mark::Text {
            x,
            y,
            text: text.into(),
            color,
            size,
            anchor: Anchor::Start,
            bold: false,
            rotate: 0.0,
        }
    }

    /// Same text mark with another anchor. No-op for other marks.
    pub fn anchored(mut self, to: Anchor) -> Self {
        if let Mark::Text { anchor, .. } = &mut self {
            *anchor = to;
        }
        self
    }

    pub fn bold(mut self) -> Self {
        if let Mark::Text { bold, .. } = &mut self {
            *bold = true;
        }
        self
    }

    pub fn rotated(mut self, degrees: f64) -> Self {
        if let Mark::Text { rotate, .. } = &mut self {
            *rotate = degrees;
        }
        self
    }

    pub fn line(from: Point, to: Point, stroke: Stroke) -> Self {
        Mark::Line {
            from,
            to,
            stroke,
            opacity: 1.0,
        }
    }
}

/// Plot-area insets in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn inner_width(&self, width: f64) -> f64 {
        (width - self.left - self.right).max(0.0)
    }

    pub fn inner_height(&self, height: f64) -> f64 {
        (height - self.top - self.bottom).max(0.0)
    }
}

/// Hover text for one datum: bold title, labelled rows, optional hint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tooltip {
    pub title: String,
    pub rows: Vec<(String, String)>,
    pub footer: Option<String>,
}

impl Tooltip {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn row(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.rows.push((label.into(), value.into()));
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(text.into());
        self
    }

    /// Value of the row labelled `label`.
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }
}

/// Everything needed to draw one chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub marks: Vec<Mark>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            marks: Vec::new(),
        }
    }

    pub fn push(&mut self, mark: Mark) {
        self.marks.push(mark);
    }

    /// All text strings, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.marks.iter().filter_map(|m| match m {
            Mark::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    /// Keyed circle for `key`, if drawn.
    pub fn circle(&self, key: &str) -> Option<&Mark> {
        self.marks
            .iter()
            .find(|m| matches!(m, Mark::Circle { key: Some(k), .. } if k == key))
    }
}

/// Clip segment `a -> b` to the rectangle `[x0, x1] × [y0, y1]`.
pub fn clip_segment(a: Point, b: Point, x0: f64, y0: f64, x1: f64, y1: f64) -> Option<(Point, Point)> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    for (p, q) in [
        (-dx, a.0 - x0),
        (dx, x1 - a.0),
        (-dy, a.1 - y0),
        (dy, y1 - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ))
}

/// Clip a polyline to a rectangle, splitting it where it leaves the box.
pub fn clip_polyline(points: &[Point], x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Vec<Point>> {
    let mut runs: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    if points.len() == 1 {
        let p = points[0];
        if p.0 >= x0 && p.0 <= x1 && p.1 >= y0 && p.1 <= y1 {
            runs.push(vec![p]);
        }
        return runs;
    }

    for pair in points.windows(2) {
        match clip_segment(pair[0], pair[1], x0, y0, x1, y1) {
            Some((s, e)) => {
                if current.last() != Some(&s) {
                    if current.len() > 1 {
                        runs.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(s);
                }
                current.push(e);
            }
            None => {
                if current.len() > 1 {
                    runs.push(std::mem::take(&mut current));
                }
                current.clear();
            }
        }
    }
    if current.len() > 1 {
        runs.push(current);
    }
    runs
}
