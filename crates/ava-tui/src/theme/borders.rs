//! Border sets for Unicode and ASCII fallback.
//!
//! Supports `NO_COLOR` environment variable by using ASCII borders.

use ratatui::symbols::border;

use super::icons::IconMode;

/// Border set based on icon mode.
#[derive(Debug, Clone, Default)]
pub struct BorderSet {
    mode: IconMode,
}

/// Pure ASCII corners and edges.
const ASCII: border::Set = border::Set {
    top_left: "+",
    top_right: "+",
    bottom_left: "+",
    bottom_right: "+",
    vertical_left: "|",
    vertical_right: "|",
    horizontal_top: "-",
    horizontal_bottom: "-",
};

/// ASCII with `=` edges to mark focus.
const ASCII_FOCUSED: border::Set = border::Set {
    top_left: "+",
    top_right: "+",
    bottom_left: "+",
    bottom_right: "+",
    vertical_left: "|",
    vertical_right: "|",
    horizontal_top: "=",
    horizontal_bottom: "=",
};

impl BorderSet {
    /// Create a new border set with the specified mode.
    pub fn new(mode: IconMode) -> Self {
        Self { mode }
    }

    /// Normal (unfocused) borders.
    pub fn normal(&self) -> border::Set {
        match self.mode {
            IconMode::Unicode => border::ROUNDED,
            IconMode::Ascii => ASCII,
        }
    }

    /// Focused borders.
    pub fn focused(&self) -> border::Set {
        match self.mode {
            IconMode::Unicode => border::THICK,
            IconMode::Ascii => ASCII_FOCUSED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unicode_borders() {
        let borders = BorderSet::new(IconMode::Unicode);
        assert_eq!(borders.normal().top_left, "╭");
        assert_eq!(borders.focused().top_left, "┏");
    }

    #[test]
    fn test_ascii_borders() {
        let borders = BorderSet::new(IconMode::Ascii);
        assert_eq!(borders.normal().top_left, "+");
        assert_eq!(borders.normal().horizontal_top, "-");
        assert_eq!(borders.focused().horizontal_top, "=");
    }
}
