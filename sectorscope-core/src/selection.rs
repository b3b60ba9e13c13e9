//! The single shared selection and the events that change it.

use serde::Serialize;

/// Emitted by the scatter chart on click, dropdown change or reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SelectionEvent {
    Selected(String),
    Cleared,
}

impl SelectionEvent {
    pub fn from_ticker(ticker: Option<&str>) -> Self {
        match ticker {
            Some(t) => SelectionEvent::Selected(t.to_string()),
            None => SelectionEvent::Cleared,
        }
    }

    pub fn ticker(&self) -> Option<&str> {
        match self {
            SelectionEvent::Selected(t) => Some(t),
            SelectionEvent::Cleared => None,
        }
    }
}

/// Holds the currently selected ticker. At most one ticker is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionController {
    selected: Option<String>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Record `event`. Returns whether the selection changed.
    pub fn apply(&mut self, event: &SelectionEvent) -> bool {
        let next = event.ticker().map(str::to_string);
        if next == self.selected {
            return false;
        }
        self.selected = next;
        true
    }

    pub fn badge_text(&self) -> String {
        format!("Selected: {}", self.selected().unwrap_or("None"))
    }
}
