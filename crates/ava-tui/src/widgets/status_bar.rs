//! Status bar widget for the top of the TUI.
//!
//! Format: `● Ava │ Patient Conversations │ Sarah ●○○ │ Michael`

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::{IconSet, Theme};

/// Application title shown in the status bar.
pub const APP_TITLE: &str = "Patient Conversations";

/// Per-panel entry in the status bar.
#[derive(Debug, Clone)]
pub struct PanelStatus<'a> {
    /// Patient first name.
    pub name: &'a str,
    /// Whether the panel has keyboard focus.
    pub focused: bool,
    /// Whether a reply is pending.
    pub typing: bool,
}

/// Status bar widget.
pub struct StatusBar<'a> {
    panels: &'a [PanelStatus<'a>],
    theme: &'a Theme,
    icons: &'a IconSet,
    tick: u64,
    warning: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    /// Create a new status bar widget.
    pub fn new(panels: &'a [PanelStatus<'a>], theme: &'a Theme, icons: &'a IconSet) -> Self {
        Self {
            panels,
            theme,
            icons,
            tick: 0,
            warning: None,
        }
    }

    /// Animation tick for typing markers.
    #[must_use]
    pub fn tick(mut self, tick: u64) -> Self {
        self.tick = tick;
        self
    }

    /// Replace the panel list with a warning.
    #[must_use]
    pub fn warning(mut self, warning: &'a str) -> Self {
        self.warning = Some(warning);
        self
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let separator = Span::styled(self.icons.separator(), Style::default().fg(self.theme.muted));
        let mut spans = vec![
            Span::styled(
                format!("{} ", self.icons.dot()),
                Style::default().fg(self.theme.primary),
            ),
            Span::styled(
                ava_engine::ASSISTANT_NAME,
                Style::default()
                    .fg(self.theme.text)
                    .add_modifier(Modifier::BOLD),
            ),
        ];

        if let Some(warning) = self.warning {
            spans.push(separator);
            spans.push(Span::styled(warning, Style::default().fg(self.theme.warning)));
        } else {
            spans.push(separator.clone());
            spans.push(Span::styled(APP_TITLE, Style::default().fg(self.theme.subtext)));
            for panel in self.panels {
                spans.push(separator.clone());
                let style = if panel.focused {
                    Style::default()
                        .fg(self.theme.primary)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.subtext)
                };
                spans.push(Span::styled(panel.name, style));
                if panel.typing {
                    spans.push(Span::styled(
                        format!(" {}", self.icons.typing_frame(self.tick)),
                        Style::default().fg(self.theme.assistant),
                    ));
                }
            }
        }

        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(self.theme.surface))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    fn render(bar: StatusBar<'_>) -> String {
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        bar.render(area, &mut buf);
        buffer_to_string(&buf)
    }

    #[test]
    fn test_status_bar_lists_panels() {
        let panels = [
            PanelStatus {
                name: "Sarah",
                focused: true,
                typing: true,
            },
            PanelStatus {
                name: "Michael",
                focused: false,
                typing: false,
            },
        ];
        let theme = Theme::default();
        let icons = IconSet::default();
        let screen = render(StatusBar::new(&panels, &theme, &icons));
        assert_eq!(
            screen,
            "● Ava │ Patient Conversations │ Sarah ●○○ │ Michael"
        );
    }

    #[test]
    fn test_warning_replaces_panels() {
        let theme = Theme::default();
        let icons = IconSet::default();
        let screen = render(StatusBar::new(&[], &theme, &icons).warning("Terminal too small"));
        assert_eq!(screen, "● Ava │ Terminal too small");
    }
}
