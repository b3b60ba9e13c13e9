use crate::axis::{self, Orient};
use crate::format;
use crate::palette::{
    form_color, BRUSH_FILL, BRUSH_STROKE, CONTEXT_LINE, CROSSHAIR, DOT_STROKE, MARKER_STROKE,
    MA_LINE, PRICE_LINE, TEXT, TEXT_MUTED, VOLUME_AREA, WHITE,
};
use crate::scale::{tick_step, time_tick_label};
use crate::scene::{clip_polyline, Anchor, Mark, Point, Scene, Stroke};

use super::{TimelineChart, CONTEXT_HEIGHT, HEIGHT, MARGIN, MARKER_CY, MARKER_R};

const X_TICKS: usize = 6;
const PRICE_TICKS: usize = 6;
const VOLUME_TICKS: usize = 5;

/// Decimals needed to tell ticks `step` apart.
fn fixed_decimals(step: f64) -> usize {
    let step = step.abs();
    if step == 0.0 || !step.is_finite() {
        return 0;
    }
    (-step.log10().floor()).max(0.0) as usize
}

impl TimelineChart {
    pub fn scene(&self) -> Scene {
        let mut scene = Scene::new(self.width, HEIGHT);
        let inner_w = self.inner_width();

        scene.push(Mark::text(MARGIN.left, MARGIN.top - 6.0, self.title(), TEXT, 12.0).bold());
        if self.series.is_empty() {
            return scene;
        }
        scene.push(
            Mark::text(MARGIN.left + inner_w, MARGIN.top - 6.0, self.range_badge(), TEXT_MUTED, 11.0)
                .anchored(Anchor::End),
        );

        self.push_focus(&mut scene);
        self.push_filings(&mut scene);
        self.push_crosshair(&mut scene);
        self.push_context(&mut scene);
        scene
    }

    fn push_focus(&self, scene: &mut Scene) {
        let (left, top) = (MARGIN.left, MARGIN.top);
        let (inner_w, inner_h) = (self.inner_width(), self.inner_height());
        let (right, bottom) = (left + inner_w, top + inner_h);
        let fx = self.focus_x();
        let py = self.price_y();
        let vy = self.volume_y();

        scene.push(
            Mark::text(left + inner_w / 2.0, bottom + 44.0, "Date", TEXT, 12.0)
                .anchored(Anchor::Middle),
        );
        scene.push(
            Mark::text(left - 52.0, top + inner_h / 2.0, self.mode.axis_label(), TEXT, 12.0)
                .anchored(Anchor::Middle)
                .rotated(-90.0),
        );
        scene.push(
            Mark::text(right + 52.0, top + inner_h / 2.0, "Volume", TEXT, 12.0)
                .anchored(Anchor::Middle)
                .rotated(90.0),
        );

        let volume: Vec<Point> = self
            .series
            .iter()
            .map(|p| (left + fx.map_date(p.date), top + vy.map(p.volume)))
            .collect();
        let top_edge: Vec<Point> =
            clip_polyline(&volume, left, f64::NEG_INFINITY, right, f64::INFINITY)
                .into_iter()
                .flatten()
                .map(|(x, y)| (x, y.clamp(top, bottom)))
                .collect();
        if !top_edge.is_empty() {
            scene.push(Mark::Area {
                top: top_edge,
                baseline: bottom,
                fill: VOLUME_AREA,
            });
        }

        let price: Vec<Point> = self
            .series
            .iter()
            .map(|p| (left + fx.map_date(p.date), top + py.map(p.display_price)))
            .collect();
        scene.push(Mark::Path {
            segments: clip_polyline(&price, left, top, right, bottom),
            stroke: Stroke::solid(PRICE_LINE, 2.0),
            opacity: 1.0,
        });

        let mut ma_segments = Vec::new();
        let mut run: Vec<Point> = Vec::new();
        for p in &self.series {
            match p.display_ma {
                Some(ma) => run.push((left + fx.map_date(p.date), top + py.map(ma))),
                None => {
                    ma_segments.extend(clip_polyline(&run, left, top, right, bottom));
                    run.clear();
                }
            }
        }
        ma_segments.extend(clip_polyline(&run, left, top, right, bottom));
        scene.push(Mark::Path {
            segments: ma_segments,
            stroke: Stroke::dashed(MA_LINE, 1.6, 4.0, 3.0),
            opacity: 0.95,
        });

        let x_ticks: Vec<axis::Tick> = fx
            .ticks(X_TICKS)
            .into_iter()
            .map(|d| (left + fx.map_date(d), time_tick_label(d)))
            .collect();
        axis::draw(scene, Orient::Bottom, bottom, left, right, &x_ticks);

        let (p0, p1) = self.price_domain;
        let decimals = fixed_decimals(tick_step(p0, p1, PRICE_TICKS));
        let price_ticks: Vec<axis::Tick> = py
            .ticks(PRICE_TICKS)
            .into_iter()
            .map(|t| (top + py.map(t), format::grouped(t, decimals)))
            .collect();
        axis::draw(scene, Orient::Left, left, top, bottom, &price_ticks);

        let volume_ticks: Vec<axis::Tick> = vy
            .ticks(VOLUME_TICKS)
            .into_iter()
            .map(|t| (top + vy.map(t), format::si(t, 2)))
            .collect();
        let (v_lo, v_hi) = vy.range();
        axis::draw(scene, Orient::Right, right, top + v_hi, top + v_lo, &volume_ticks);
    }

    fn push_filings(&self, scene: &mut Scene) {
        let (left, top) = (MARGIN.left, MARGIN.top);
        let bottom = top + self.inner_height();
        let fx = self.focus_x();

        for filing in self.visible_filings() {
            let x = left + fx.map_date(filing.filed_date);
            let color = form_color(filing.form_type());
            scene.push(Mark::Line {
                from: (x, top),
                to: (x, bottom),
                stroke: Stroke::solid(color, 1.0),
                opacity: 0.22,
            });
            scene.push(Mark::Circle {
                key: Some(format!("{}-{}", filing.form, filing.filed_date)),
                cx: x,
                cy: top + MARKER_CY,
                r: MARKER_R,
                fill: color,
                opacity: 1.0,
                stroke: Some(Stroke::solid(MARKER_STROKE, 1.0)),
            });
        }
    }

    fn push_crosshair(&self, scene: &mut Scene) {
        let Some(info) = self.hover.and_then(|i| self.hover_info(i)) else {
            return;
        };
        let top = MARGIN.top;
        scene.push(Mark::line(
            (info.x, top),
            (info.x, top + self.inner_height()),
            Stroke::solid(CROSSHAIR, 1.0),
        ));
        scene.push(Mark::Circle {
            key: None,
            cx: info.x,
            cy: info.y,
            r: 4.2,
            fill: WHITE,
            opacity: 1.0,
            stroke: Some(Stroke::solid(DOT_STROKE, 1.0)),
        });
    }

    fn push_context(&self, scene: &mut Scene) {
        let left = MARGIN.left;
        let ctx_top = self.context_top();
        let cx = self.context_x();
        let cy = self.context_y();

        let line: Vec<Point> = self
            .series
            .iter()
            .map(|p| (left + cx.map_date(p.date), ctx_top + cy.map(p.display_price)))
            .collect();
        scene.push(Mark::Path {
            segments: vec![line],
            stroke: Stroke::solid(CONTEXT_LINE, 1.35),
            opacity: 1.0,
        });

        let ticks: Vec<axis::Tick> = cx
            .ticks(X_TICKS)
            .into_iter()
            .map(|d| (left + cx.map_date(d), time_tick_label(d)))
            .collect();
        axis::draw(
            scene,
            Orient::Bottom,
            ctx_top + CONTEXT_HEIGHT,
            left,
            left + self.inner_width(),
            &ticks,
        );

        if let Some((a, b)) = self.brush_selection() {
            scene.push(Mark::Rect {
                x: a,
                y: ctx_top,
                width: b - a,
                height: CONTEXT_HEIGHT,
                fill: Some(BRUSH_FILL),
                stroke: Some(Stroke::solid(BRUSH_STROKE, 1.0)),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FilingRow, PriceRow, TimelineData};
    use chrono::{Duration, NaiveDate};

    fn chart() -> TimelineChart {
        let start = NaiveDate::from_ymd_opt(2021, 1, 4).unwrap();
        let prices = (0..300)
            .map(|i| PriceRow {
                date: start + Duration::days(i),
                ticker: "JPM".into(),
                close: 150.0 + (i as f64 / 10.0).sin() * 10.0,
                volume: 5.0e6 + 1.0e5 * (i % 7) as f64,
                sector: Some("Finance".into()),
                ret: None,
                ma20: None,
            })
            .collect();
        let filings = vec![FilingRow {
            ticker: "JPM".into(),
            filed_date: NaiveDate::from_ymd_opt(2021, 4, 14).unwrap(),
            form: "10-Q".into(),
            title: None,
            url: None,
        }];
        let mut c = TimelineChart::new(TimelineData { prices, filings }, 920.0);
        c.update_for_ticker(Some("JPM"));
        c
    }

    #[test]
    fn empty_chart_draws_only_the_title() {
        let c = TimelineChart::new(TimelineData::default(), 920.0);
        let scene = c.scene();
        assert_eq!(scene.marks.len(), 1);
        assert!(scene.contains_text("Select a company"));
    }

    #[test]
    fn full_scene_has_all_layers() {
        let c = chart();
        let scene = c.scene();
        assert!(scene.contains_text("JPM — Price + Volume (2021–2021)"));
        assert!(scene.contains_text("Range: Full"));
        assert!(scene.contains_text("Price (Adj Close)"));
        assert!(scene.circle("10-Q-2021-04-14").is_some());
        assert!(scene.marks.iter().any(|m| matches!(m, Mark::Area { .. })));
        assert!(scene.marks.iter().any(|m| matches!(m, Mark::Rect { .. })));
    }

    #[test]
    fn zoomed_paths_stay_inside_focus() {
        let mut c = chart();
        let ctx = c.context_x();
        let (d0, _) = c.context_domain().unwrap();
        let x = MARGIN.left + ctx.map(d0 + 30 * 86_400_000);
        c.brush.move_to(None);
        assert!(c.brush_start(x, c.context_top() + 5.0));
        c.brush_drag(x + 200.0);
        c.brush_end(x + 200.0);
        assert_ne!(c.focus_domain(), c.context_domain());
        let scene = c.scene();
        let (l, r) = (MARGIN.left, MARGIN.left + c.inner_width());
        for m in &scene.marks {
            if let Mark::Path { segments, stroke, .. } = m {
                if stroke.color == PRICE_LINE {
                    for p in segments.iter().flatten() {
                        assert!(p.0 >= l - 1e-9 && p.0 <= r + 1e-9);
                    }
                }
            }
        }
    }

    #[test]
    fn crosshair_appears_after_hover() {
        let mut c = chart();
        let before = c.scene().marks.len();
        c.hover(MARGIN.left + 100.0, MARGIN.top + 100.0).unwrap();
        assert_eq!(c.scene().marks.len(), before + 2);
    }

    #[test]
    fn decimals_follow_step() {
        assert_eq!(fixed_decimals(20.0), 0);
        assert_eq!(fixed_decimals(0.5), 1);
        assert_eq!(fixed_decimals(0.05), 2);
    }
}
