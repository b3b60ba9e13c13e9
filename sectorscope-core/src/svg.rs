//! Standalone SVG export of a [`Scene`].

use crate::palette::BACKGROUND;
use crate::scene::{Anchor, Mark, Point, Scene, Stroke};

const FONT: &str = "system-ui, -apple-system, Segoe UI, sans-serif";

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Shortest decimal rendering, capped at two fractional digits.
fn num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn stroke_attrs(stroke: &Stroke) -> String {
    let mut attrs = format!(
        " stroke=\"{}\" stroke-width=\"{}\"",
        stroke.color.to_css(),
        num(stroke.width)
    );
    if let Some((dash, gap)) = stroke.dash {
        attrs.push_str(&format!(" stroke-dasharray=\"{},{}\"", num(dash), num(gap)));
    }
    attrs
}

fn points(run: &[Point]) -> String {
    run.iter()
        .enumerate()
        .map(|(i, (x, y))| format!("{}{},{}", if i == 0 { "M" } else { "L" }, num(*x), num(*y)))
        .collect::<Vec<_>>()
        .join("")
}

fn mark(m: &Mark) -> Option<String> {
    let svg = match m {
        Mark::Circle {
            key,
            cx,
            cy,
            r,
            fill,
            opacity,
            stroke,
        } => {
            let data = key
                .as_deref()
                .map(|k| format!(" data-key=\"{}\"", escape(k)))
                .unwrap_or_default();
            format!(
                "<circle{data} cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" opacity=\"{}\"{}/>",
                num(*cx),
                num(*cy),
                num(*r),
                fill.to_css(),
                num(*opacity),
                stroke.as_ref().map(stroke_attrs).unwrap_or_default()
            )
        }
        Mark::Line {
            from,
            to,
            stroke,
            opacity,
        } => format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" opacity=\"{}\"{}/>",
            num(from.0),
            num(from.1),
            num(to.0),
            num(to.1),
            num(*opacity),
            stroke_attrs(stroke)
        ),
        Mark::Path {
            segments,
            stroke,
            opacity,
        } => {
            let d: String = segments
                .iter()
                .filter(|run| run.len() > 1)
                .map(|run| points(run))
                .collect();
            if d.is_empty() {
                return None;
            }
            format!(
                "<path d=\"{d}\" fill=\"none\" opacity=\"{}\"{}/>",
                num(*opacity),
                stroke_attrs(stroke)
            )
        }
        Mark::Area {
            top,
            baseline,
            fill,
        } => {
            let (first, last) = (top.first()?, top.last()?);
            format!(
                "<path d=\"{}L{},{}L{},{}Z\" fill=\"{}\" stroke=\"none\"/>",
                points(top),
                num(last.0),
                num(*baseline),
                num(first.0),
                num(*baseline),
                fill.to_css()
            )
        }
        Mark::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        } => format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"{}/>",
            num(*x),
            num(*y),
            num(width.max(0.0)),
            num(height.max(0.0)),
            fill.map(|f| f.to_css()).unwrap_or_else(|| "none".to_string()),
            stroke.as_ref().map(stroke_attrs).unwrap_or_default()
        ),
        Mark::Text {
            x,
            y,
            text,
            color,
            size,
            anchor,
            bold,
            rotate,
        } => {
            let anchor = match anchor {
                Anchor::Start => "start",
                Anchor::Middle => "middle",
                Anchor::End => "end",
            };
            let weight = if *bold { " font-weight=\"600\"" } else { "" };
            let transform = if *rotate != 0.0 {
                format!(
                    " transform=\"rotate({} {} {})\"",
                    num(*rotate),
                    num(*x),
                    num(*y)
                )
            } else {
                String::new()
            };
            format!(
                "<text x=\"{}\" y=\"{}\" fill=\"{}\" font-size=\"{}\" text-anchor=\"{anchor}\"{weight}{transform}>{}</text>",
                num(*x),
                num(*y),
                color.to_css(),
                num(*size),
                escape(text)
            )
        }
    };
    Some(svg)
}

/// Render `scene` as a complete SVG document on the dashboard background.
pub fn to_svg(scene: &Scene) -> String {
    let (w, h) = (num(scene.width), num(scene.height));
    let mut out = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"{FONT}\">\n"
    );
    out.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
        BACKGROUND.to_css()
    ));
    for m in scene.marks.iter().filter_map(mark) {
        out.push_str(&m);
        out.push('\n');
    }
    out.push_str("</svg>\n");
    out
}
