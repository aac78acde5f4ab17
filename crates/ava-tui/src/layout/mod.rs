//! Layout components for the TUI.
//!
//! This module provides:
//! - [`render_app`] - Main shell layout renderer
//! - [`ScreenMode`] - Split, `LeftFocus`, `RightFocus` modes
//! - [`centered_fixed`] - Popup placement helper

mod screen_modes;
mod shell;

use ratatui::layout::Rect;

pub use screen_modes::ScreenMode;
pub use shell::{panel_areas, render_app, MIN_HEIGHT, MIN_WIDTH};

/// Create a centered rect with fixed dimensions.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
