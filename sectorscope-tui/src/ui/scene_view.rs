//! Draws a core [`Scene`] on a braille canvas stretched over a terminal area.
//!
//! Scene coordinates have their origin top-left; the canvas has it
//! bottom-left, so every y is flipped. Text is placed by cell, so anchors
//! are resolved here and rotated labels are left out.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols::Marker;
use ratatui::text::Line as TextLine;
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line, Rectangle};
use ratatui::widgets::Widget;

use sectorscope_core::scene::{Anchor, Mark, Point, Scene};

use crate::theme::{self, Theme};

/// Map a terminal cell inside `area` to scene coordinates (cell center).
pub fn cell_to_scene(area: Rect, scene_w: f64, scene_h: f64, col: u16, row: u16) -> Option<(f64, f64)> {
    if area.width == 0 || area.height == 0 {
        return None;
    }
    let inside = col >= area.x
        && col < area.x + area.width
        && row >= area.y
        && row < area.y + area.height;
    if !inside {
        return None;
    }
    let x = (f64::from(col - area.x) + 0.5) * scene_w / f64::from(area.width);
    let y = (f64::from(row - area.y) + 0.5) * scene_h / f64::from(area.height);
    Some((x, y))
}

/// Scene pixels covered by half of one cell, the coarsest axis.
pub fn half_cell(area: Rect, scene_w: f64, scene_h: f64) -> f64 {
    if area.width == 0 || area.height == 0 {
        return 0.0;
    }
    let cw = scene_w / f64::from(area.width);
    let ch = scene_h / f64::from(area.height);
    cw.max(ch) / 2.0
}

pub struct SceneView<'a> {
    scene: &'a Scene,
    theme: Theme,
}

impl<'a> SceneView<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            theme: Theme::default(),
        }
    }
}

struct Painter {
    height: f64,
    /// Scene pixels per terminal column.
    col_px: f64,
}

impl Painter {
    fn flip(&self, (x, y): Point) -> Point {
        (x, self.height - y)
    }

    fn segment(&self, ctx: &mut Context, a: Point, b: Point, color: ratatui::style::Color) {
        let (a, b) = (self.flip(a), self.flip(b));
        ctx.draw(&Line::new(a.0, a.1, b.0, b.1, color));
    }

    fn mark(&self, ctx: &mut Context, mark: &Mark) {
        match mark {
            Mark::Circle {
                cx,
                cy,
                r,
                fill,
                opacity,
                ..
            } => {
                let (x, y) = self.flip((*cx, *cy));
                ctx.draw(&Circle {
                    x,
                    y,
                    radius: *r,
                    color: theme::blended(*fill, *opacity),
                });
            }
            Mark::Line {
                from,
                to,
                stroke,
                opacity,
            } => self.segment(ctx, *from, *to, theme::blended(stroke.color, *opacity)),
            Mark::Path {
                segments,
                stroke,
                opacity,
            } => {
                let color = theme::blended(stroke.color, *opacity);
                let dashed = stroke.dash.is_some();
                for run in segments {
                    for (i, pair) in run.windows(2).enumerate() {
                        if dashed && i % 2 == 1 {
                            continue;
                        }
                        self.segment(ctx, pair[0], pair[1], color);
                    }
                }
            }
            Mark::Area {
                top,
                baseline,
                fill,
            } => {
                let color = theme::blended(*fill, 1.0);
                for &(x, y) in top {
                    self.segment(ctx, (x, y), (x, *baseline), color);
                }
            }
            Mark::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
            } => {
                let color = stroke
                    .map(|s| theme::blended(s.color, 1.0))
                    .or_else(|| fill.map(|f| theme::blended(f, 1.0)));
                if let Some(color) = color {
                    ctx.draw(&Rectangle {
                        x: *x,
                        y: self.height - (y + height),
                        width: *width,
                        height: *height,
                        color,
                    });
                }
            }
            Mark::Text {
                x,
                y,
                text,
                color,
                anchor,
                bold,
                rotate,
                ..
            } => {
                if *rotate != 0.0 {
                    return;
                }
                let cells = text.chars().count() as f64;
                let shift = match anchor {
                    Anchor::Start => 0.0,
                    Anchor::Middle => cells / 2.0,
                    Anchor::End => cells,
                } * self.col_px;
                let mut style = Style::default().fg(theme::blended(*color, 1.0));
                if *bold {
                    style = style.add_modifier(ratatui::style::Modifier::BOLD);
                }
                let (px, py) = self.flip((x - shift, *y));
                ctx.print(px, py, TextLine::styled(text.clone(), style));
            }
        }
    }
}

impl<'a> Widget for SceneView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let (w, h) = (self.scene.width.max(1.0), self.scene.height.max(1.0));
        let painter = Painter {
            height: h,
            col_px: w / f64::from(area.width),
        };
        let scene = self.scene;
        Canvas::default()
            .background_color(self.theme.background)
            .marker(Marker::Braille)
            .x_bounds([0.0, w])
            .y_bounds([0.0, h])
            .paint(|ctx| {
                let (shapes, labels): (Vec<&Mark>, Vec<&Mark>) = scene
                    .marks
                    .iter()
                    .partition(|m| !matches!(m, Mark::Text { .. }));
                for mark in shapes {
                    painter.mark(ctx, mark);
                }
                ctx.layer();
                for mark in labels {
                    painter.mark(ctx, mark);
                }
            })
            .render(area, buf);
    }
}
