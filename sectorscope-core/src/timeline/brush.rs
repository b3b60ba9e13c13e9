//! One-dimensional brush over the context strip.
//!
//! Coordinates are local to the strip: `0.0` is its left edge. A gesture
//! starts with [`Brush::pointer_down`]; pressing inside the selection moves
//! it, pressing on an edge handle resizes it, pressing elsewhere starts a
//! new selection. Releasing with an empty selection clears the brush.

/// Half-width of the grab zone around each selection edge.
pub const HANDLE_HALF_WIDTH: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    /// New selection anchored at `origin`.
    Create { origin: f64 },
    /// Dragging the whole selection; `grab` is the pointer offset from its left edge.
    Move { grab: f64, width: f64 },
    /// Dragging one edge; `anchor` is the edge that stays put.
    Resize { anchor: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    extent: (f64, f64),
    selection: Option<(f64, f64)>,
    gesture: Option<Gesture>,
}

impl Brush {
    pub fn new(x0: f64, x1: f64) -> Self {
        Self {
            extent: (x0.min(x1), x0.max(x1)),
            selection: None,
            gesture: None,
        }
    }

    pub fn extent(&self) -> (f64, f64) {
        self.extent
    }

    pub fn selection(&self) -> Option<(f64, f64)> {
        self.selection
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.extent.0, self.extent.1)
    }

    fn ordered(&self, a: f64, b: f64) -> (f64, f64) {
        let (a, b) = (self.clamp(a), self.clamp(b));
        (a.min(b), a.max(b))
    }

    /// Replace the extent, dropping any selection and gesture.
    pub fn set_extent(&mut self, x0: f64, x1: f64) {
        *self = Self::new(x0, x1);
    }

    /// Set the selection programmatically. `None` clears it.
    pub fn move_to(&mut self, selection: Option<(f64, f64)>) -> Option<(f64, f64)> {
        self.gesture = None;
        self.selection = selection.map(|(a, b)| self.ordered(a, b));
        self.selection
    }

    /// Start a gesture at `x`. Returns the selection after the press.
    pub fn pointer_down(&mut self, x: f64) -> Option<(f64, f64)> {
        let x = self.clamp(x);
        let gesture = match self.selection {
            Some((s0, s1)) if (x - s0).abs() <= HANDLE_HALF_WIDTH => Gesture::Resize { anchor: s1 },
            Some((s0, s1)) if (x - s1).abs() <= HANDLE_HALF_WIDTH => Gesture::Resize { anchor: s0 },
            Some((s0, s1)) if x > s0 && x < s1 => Gesture::Move {
                grab: x - s0,
                width: s1 - s0,
            },
            _ => {
                self.selection = Some((x, x));
                Gesture::Create { origin: x }
            }
        };
        self.gesture = Some(gesture);
        self.selection
    }

    /// Continue the gesture. Returns the updated selection, or `None` when
    /// no gesture is in progress.
    pub fn pointer_move(&mut self, x: f64) -> Option<(f64, f64)> {
        let gesture = self.gesture?;
        let x = self.clamp(x);
        let next = match gesture {
            Gesture::Create { origin } => self.ordered(origin, x),
            Gesture::Resize { anchor } => self.ordered(anchor, x),
            Gesture::Move { grab, width } => {
                let left = (x - grab).clamp(self.extent.0, self.extent.1 - width);
                (left, left + width)
            }
        };
        self.selection = Some(next);
        self.selection
    }

    /// Finish the gesture. An empty selection is cleared.
    pub fn pointer_up(&mut self, x: f64) -> Option<(f64, f64)> {
        if self.gesture.is_some() {
            self.pointer_move(x);
        }
        self.gesture = None;
        if matches!(self.selection, Some((a, b)) if a == b) {
            self.selection = None;
        }
        self.selection
    }
}
