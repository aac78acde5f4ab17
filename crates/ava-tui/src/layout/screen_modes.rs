//! Screen display modes for the TUI.
//!
//! - Split: left panel (50%) | right panel (50%)
//! - `LeftFocus`: left panel (100%)
//! - `RightFocus`: right panel (100%)

use ava_engine::PanelId;

/// Screen display modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenMode {
    /// Both panels side by side.
    #[default]
    Split,
    /// Left panel only.
    LeftFocus,
    /// Right panel only.
    RightFocus,
}

impl ScreenMode {
    /// Mode that shows only `panel`.
    pub fn zoom(panel: PanelId) -> Self {
        match panel {
            PanelId::Left => Self::LeftFocus,
            PanelId::Right => Self::RightFocus,
        }
    }

    /// Whether this mode shows a single panel.
    pub fn is_zoomed(self) -> bool {
        self != Self::Split
    }

    /// Panels visible in this mode, left first.
    pub fn visible(self) -> &'static [PanelId] {
        match self {
            Self::Split => &PanelId::ALL,
            Self::LeftFocus => &[PanelId::Left],
            Self::RightFocus => &[PanelId::Right],
        }
    }

    /// Short label for the footer.
    pub fn label(self) -> &'static str {
        match self {
            Self::Split => "Split",
            Self::LeftFocus => "Left",
            Self::RightFocus => "Right",
        }
    }
}
