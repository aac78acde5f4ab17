//! Footer status bar widget.
//!
//! Format: `Split │ Sarah │ <notice>            [Enter] Send │ [F1] Help`
//!
//! The left side shows the screen mode, the focused patient and the latest
//! notice; the right side lists keybinding hints for the current state.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::layout::ScreenMode;
use crate::theme::{IconSet, Theme};

/// A single keybinding hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHint {
    /// The key or key combination (e.g., "Tab", "Ctrl+P").
    pub key: String,
    /// The action description (e.g., "Switch", "Quit").
    pub action: String,
}

impl KeyHint {
    /// Create a new key hint.
    pub fn new(key: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
        }
    }
}

/// Footer status bar widget.
pub struct FooterHints<'a> {
    hints: &'a [KeyHint],
    theme: &'a Theme,
    icons: &'a IconSet,
    screen_mode: Option<ScreenMode>,
    focused: Option<&'a str>,
    notice: Option<&'a str>,
}

impl<'a> FooterHints<'a> {
    /// Create a new footer hints widget.
    pub fn new(hints: &'a [KeyHint], theme: &'a Theme, icons: &'a IconSet) -> Self {
        Self {
            hints,
            theme,
            icons,
            screen_mode: None,
            focused: None,
            notice: None,
        }
    }

    /// Set screen mode to display.
    #[must_use]
    pub fn screen_mode(mut self, mode: ScreenMode) -> Self {
        self.screen_mode = Some(mode);
        self
    }

    /// Set the focused patient name to display.
    #[must_use]
    pub fn focused(mut self, name: &'a str) -> Self {
        self.focused = Some(name);
        self
    }

    /// Set a transient notice (e.g. why a submission was ignored).
    #[must_use]
    pub fn notice(mut self, notice: Option<&'a str>) -> Self {
        self.notice = notice;
        self
    }
}

impl Widget for FooterHints<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let separator = self.icons.separator();
        let muted = Style::default().fg(self.theme.muted);
        let mut left_spans = Vec::new();
        let mut right_spans = Vec::new();

        if let Some(mode) = self.screen_mode {
            left_spans.push(Span::styled(mode.label(), Style::default().fg(self.theme.subtext)));
        }

        if let Some(name) = self.focused {
            if !left_spans.is_empty() {
                left_spans.push(Span::styled(separator, muted));
            }
            left_spans.push(Span::styled(name, Style::default().fg(self.theme.primary)));
        }

        if let Some(notice) = self.notice {
            left_spans.push(Span::styled(separator, muted));
            left_spans.push(Span::styled(notice, Style::default().fg(self.theme.warning)));
        }

        for (i, hint) in self.hints.iter().enumerate() {
            if i > 0 {
                right_spans.push(Span::styled(separator, muted));
            }
            right_spans.push(Span::styled("[", muted));
            right_spans.push(Span::styled(
                hint.key.as_str(),
                Style::default().fg(self.theme.primary),
            ));
            right_spans.push(Span::styled("] ", muted));
            right_spans.push(Span::styled(
                hint.action.as_str(),
                Style::default().fg(self.theme.subtext),
            ));
        }

        let left_width: usize = left_spans.iter().map(|s| s.content.width()).sum();
        let right_width: usize = right_spans.iter().map(|s| s.content.width()).sum();
        let total_width = area.width as usize;

        // Drop hints entirely rather than overlap the left side.
        if left_width + right_width + 1 > total_width {
            right_spans.clear();
        } else {
            let padding = total_width - left_width - right_width;
            left_spans.push(Span::raw(" ".repeat(padding)));
        }
        left_spans.extend(right_spans);

        Paragraph::new(Line::from(left_spans))
            .style(Style::default().bg(self.theme.surface))
            .render(area, buf);
    }
}

/// Hints for the current state.
///
/// Editing hints are left out while the focused panel waits for a reply.
#[must_use]
pub fn hints_for_state(screen_mode: ScreenMode, waiting: bool) -> Vec<KeyHint> {
    let mut hints = Vec::new();
    if !waiting {
        hints.push(KeyHint::new("Enter", "Send"));
    }
    hints.push(KeyHint::new("Tab", "Switch"));
    if screen_mode.is_zoomed() {
        hints.push(KeyHint::new("F4", "Split"));
    } else {
        hints.push(KeyHint::new("F2/F3", "Zoom"));
    }
    hints.push(KeyHint::new("Ctrl+P", "Profile"));
    hints.push(KeyHint::new("F1", "Help"));
    hints.push(KeyHint::new("Esc", "Quit"));
    hints
}
