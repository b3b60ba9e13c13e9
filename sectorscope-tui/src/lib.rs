//! SectorScope terminal dashboard.
//!
//! The library holds the state, input handling and drawing so the binary
//! stays a thin event loop and everything else can be driven from tests.

pub mod app;
pub mod input;
pub mod link;
pub mod theme;
pub mod ui;
pub mod worker;

pub use app::AppState;
pub use theme::Theme;

#[cfg(test)]
mod test_helpers;
