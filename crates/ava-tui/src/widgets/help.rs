//! Help overlay listing the key bindings.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::layout::centered_fixed;
use crate::theme::{BorderSet, Theme};

const HELP_TEXT: &str = "
  Chat
    Enter             Send question
    Up / Down         Recall previous questions
    PgUp / PgDn       Scroll transcript

  Panels
    Tab               Switch panel
    F2 / F3           Show only Sarah / Michael
    F4                Show both panels
    Ctrl+P            Toggle profile cards

  General
    F1                Toggle this help
    Esc / Ctrl+C      Quit

  [Press any key to close]
";

/// Centered help popup.
pub struct HelpOverlay<'a> {
    theme: &'a Theme,
    borders: &'a BorderSet,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a Theme, borders: &'a BorderSet) -> Self {
        Self { theme, borders }
    }
}

impl Widget for HelpOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = 52.min(area.width.saturating_sub(4));
        let height = 21.min(area.height.saturating_sub(2));
        let overlay_area = centered_fixed(width, height, area);

        Clear.render(overlay_area, buf);

        let block = Block::default()
            .title(" Help ")
            .title_style(
                Style::default()
                    .fg(self.theme.primary)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_set(self.borders.focused())
            .border_style(Style::default().fg(self.theme.border_focused))
            .style(Style::default().bg(self.theme.base));

        Paragraph::new(HELP_TEXT)
            .block(block)
            .style(Style::default().fg(self.theme.text))
            .render(overlay_area, buf);
    }
}
