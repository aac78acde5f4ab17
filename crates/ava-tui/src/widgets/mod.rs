//! UI widgets for the TUI.
//!
//! This module provides:
//! - [`StatusBar`] - Top bar with the app title and per-panel status
//! - [`PanelView`] - One patient panel (profile, chat, input)
//! - [`FooterHints`] - Bottom keybinding hints
//! - [`HelpOverlay`] - Key binding popup

mod chat_view;
mod footer_hints;
mod help;
mod input_bar;
mod panel_view;
mod profile_card;
mod status_bar;
mod text_input;

pub use chat_view::ChatView;
pub use footer_hints::{hints_for_state, FooterHints, KeyHint};
pub use help::HelpOverlay;
pub use input_bar::InputBar;
pub use panel_view::{chat_area, PanelView};
pub use profile_card::ProfileCard;
pub use status_bar::{PanelStatus, StatusBar};
pub use text_input::TextInputState;
