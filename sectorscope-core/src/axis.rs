//! Axis marks: domain line, outer ticks and labels.

use crate::palette::{AXIS, TEXT_MUTED};
use crate::scene::{Anchor, Mark, Scene, Stroke};

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;
const LABEL_SIZE: f64 = 10.0;

/// Which side of the plot the axis sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orient {
    Bottom,
    Left,
    Right,
}

/// A tick at pixel `pos` along the axis with its label.
pub type Tick = (f64, String);

/// Draw an axis whose line runs from `start` to `end` along the
/// orientation's direction, offset perpendicular at `at`.
pub fn draw(scene: &mut Scene, orient: Orient, at: f64, start: f64, end: f64, ticks: &[Tick]) {
    let stroke = Stroke::solid(AXIS, 1.0);
    match orient {
        Orient::Bottom => {
            scene.push(Mark::line((start, at), (end, at), stroke));
            for (x, label) in ticks {
                scene.push(Mark::line((*x, at), (*x, at + TICK_SIZE), stroke));
                scene.push(
                    Mark::text(
                        *x,
                        at + TICK_SIZE + TICK_PADDING + LABEL_SIZE * 0.71,
                        label.clone(),
                        TEXT_MUTED,
                        LABEL_SIZE,
                    )
                    .anchored(Anchor::Middle),
                );
            }
        }
        Orient::Left | Orient::Right => {
            let sign = if orient == Orient::Left { -1.0 } else { 1.0 };
            let anchor = if orient == Orient::Left {
                Anchor::End
            } else {
                Anchor::Start
            };
            scene.push(Mark::line((at, start), (at, end), stroke));
            for (y, label) in ticks {
                scene.push(Mark::line((at, *y), (at + sign * TICK_SIZE, *y), stroke));
                scene.push(
                    Mark::text(
                        at + sign * (TICK_SIZE + TICK_PADDING),
                        y + LABEL_SIZE * 0.32,
                        label.clone(),
                        TEXT_MUTED,
                        LABEL_SIZE,
                    )
                    .anchored(anchor),
                );
            }
        }
    }
}
