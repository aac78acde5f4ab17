//! Icon sets for Unicode and ASCII fallback.

/// Icon mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconMode {
    /// Standard Unicode symbols.
    #[default]
    Unicode,
    /// ASCII-only fallback (also used with `NO_COLOR`).
    Ascii,
}

impl IconMode {
    /// Pick the mode from the `NO_COLOR` environment variable.
    pub fn detect() -> Self {
        Self::for_no_color(std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()))
    }

    /// ASCII when `no_color` is set, Unicode otherwise.
    pub fn for_no_color(no_color: bool) -> Self {
        if no_color {
            Self::Ascii
        } else {
            Self::Unicode
        }
    }
}

/// Icon set based on configured mode.
#[derive(Debug, Clone, Default)]
pub struct IconSet {
    mode: IconMode,
}

impl IconSet {
    /// Create a new icon set with the specified mode.
    pub fn new(mode: IconMode) -> Self {
        Self { mode }
    }

    pub fn bullet(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "•",
            IconMode::Ascii => "-",
        }
    }

    pub fn dot(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "●",
            IconMode::Ascii => "*",
        }
    }

    pub fn separator(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => " │ ",
            IconMode::Ascii => " | ",
        }
    }

    pub fn cursor(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "█",
            IconMode::Ascii => "_",
        }
    }

    /// Animation frames for the typing indicator.
    pub fn typing_frames(&self) -> &'static [&'static str] {
        match self.mode {
            IconMode::Unicode => &["●○○", "○●○", "○○●"],
            IconMode::Ascii => &[".  ", ".. ", "..."],
        }
    }

    /// Typing indicator frame for `tick`.
    pub fn typing_frame(&self, tick: u64) -> &'static str {
        let frames = self.typing_frames();
        #[allow(clippy::cast_possible_truncation)]
        frames[(tick % frames.len() as u64) as usize]
    }
}
