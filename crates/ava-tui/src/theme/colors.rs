//! Color palettes for the TUI.
//!
//! Catppuccin Mocha by default; a colorless palette when `NO_COLOR` is set.

use ratatui::style::Color;

/// Theme color palette.
#[derive(Debug, Clone)]
pub struct Theme {
    // Backgrounds
    pub base: Color,
    pub surface: Color,

    // Foregrounds
    pub text: Color,
    pub subtext: Color,
    pub muted: Color,

    // Accents
    pub primary: Color,
    pub secondary: Color,

    // Semantic
    pub warning: Color,

    // Chat participants
    pub patient: Color,
    pub assistant: Color,

    // Borders
    pub border: Color,
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

impl Theme {
    /// Catppuccin Mocha theme (default dark theme).
    pub fn mocha() -> Self {
        Self {
            // Backgrounds
            base: Color::Rgb(30, 30, 46),    // #1e1e2e
            surface: Color::Rgb(49, 50, 68), // #313244

            // Foregrounds
            text: Color::Rgb(205, 214, 244),    // #cdd6f4
            subtext: Color::Rgb(166, 173, 200), // #a6adc8
            muted: Color::Rgb(108, 112, 134),   // #6c7086

            // Accents
            primary: Color::Rgb(180, 190, 254),   // #b4befe (lavender)
            secondary: Color::Rgb(148, 226, 213), // #94e2d5 (teal)

            // Semantic
            warning: Color::Rgb(249, 226, 175), // #f9e2af (yellow)

            // Chat participants
            patient: Color::Rgb(250, 179, 135),   // #fab387 (peach)
            assistant: Color::Rgb(137, 180, 250), // #89b4fa (blue)

            // Borders
            border: Color::Rgb(69, 71, 90),            // #45475a
            border_focused: Color::Rgb(180, 190, 254), // #b4befe (lavender)
        }
    }

    /// Terminal default colors only, for `NO_COLOR`.
    pub fn plain() -> Self {
        Self {
            base: Color::Reset,
            surface: Color::Reset,
            text: Color::Reset,
            subtext: Color::Reset,
            muted: Color::Reset,
            primary: Color::Reset,
            secondary: Color::Reset,
            warning: Color::Reset,
            patient: Color::Reset,
            assistant: Color::Reset,
            border: Color::Reset,
            border_focused: Color::Reset,
        }
    }
}
