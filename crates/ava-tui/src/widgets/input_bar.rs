//! Input line at the bottom of each panel.
//!
//! Shows the focused panel's cursor, a placeholder when empty, and a waiting
//! indicator instead of the text while a reply is pending.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

use super::TextInputState;
use crate::theme::{BorderSet, IconSet, Theme};

/// Placeholder shown in an empty input.
pub const PLACEHOLDER: &str = "Type your question...";

const PROMPT: &str = "> ";

/// Bordered single-line input.
pub struct InputBar<'a> {
    input: &'a TextInputState,
    theme: &'a Theme,
    borders: &'a BorderSet,
    icons: &'a IconSet,
    focused: bool,
    waiting: bool,
}

impl<'a> InputBar<'a> {
    /// Create a new input bar widget.
    pub fn new(
        input: &'a TextInputState,
        theme: &'a Theme,
        borders: &'a BorderSet,
        icons: &'a IconSet,
    ) -> Self {
        Self {
            input,
            theme,
            borders,
            icons,
            focused: false,
            waiting: false,
        }
    }

    /// Set whether the input bar is focused.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Disable editing and show the waiting indicator.
    #[must_use]
    pub fn waiting(mut self, waiting: bool) -> Self {
        self.waiting = waiting;
        self
    }

    /// Characters to drop from the front so the cursor stays visible.
    fn skip_for_cursor(&self, width: usize) -> usize {
        let cursor = self.input.cursor();
        let widths: Vec<usize> = self
            .input
            .content()
            .chars()
            .map(|c| c.width().unwrap_or(0))
            .collect();
        // One cell for the cursor block itself.
        let budget = width.saturating_sub(PROMPT.len() + 1);
        let mut skip = 0;
        let mut used: usize = widths[..cursor.min(widths.len())].iter().sum();
        while used > budget && skip < cursor {
            used -= widths[skip];
            skip += 1;
        }
        skip
    }

    fn input_line(&self, width: usize) -> Line<'static> {
        let text_style = Style::default().fg(self.theme.text);
        let prompt = Span::styled(PROMPT, Style::default().fg(self.theme.primary));

        if self.input.is_empty() {
            let mut spans = vec![prompt];
            if self.focused {
                spans.push(Span::styled(self.icons.cursor(), text_style));
            }
            spans.push(Span::styled(PLACEHOLDER, Style::default().fg(self.theme.muted)));
            return Line::from(spans);
        }

        if !self.focused {
            return Line::from(vec![
                prompt,
                Span::styled(self.input.content().to_string(), text_style),
            ]);
        }

        let skip = self.skip_for_cursor(width);
        let cursor = self.input.cursor();
        let before: String = self
            .input
            .content()
            .chars()
            .skip(skip)
            .take(cursor - skip)
            .collect();
        let after: String = self.input.content().chars().skip(cursor).collect();
        Line::from(vec![
            prompt,
            Span::styled(before, text_style),
            Span::styled(self.icons.cursor(), text_style),
            Span::styled(after, text_style),
        ])
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (border_set, border_style) = if self.focused && !self.waiting {
            (
                self.borders.focused(),
                Style::default().fg(self.theme.border_focused),
            )
        } else {
            (self.borders.normal(), Style::default().fg(self.theme.border))
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border_set)
            .border_style(border_style);
        let width = block.inner(area).width as usize;

        let line = if self.waiting {
            Line::from(Span::styled(
                format!("{} Waiting for Ava...", self.icons.dot()),
                Style::default()
                    .fg(self.theme.muted)
                    .add_modifier(Modifier::ITALIC),
            ))
        } else {
            self.input_line(width)
        };

        Paragraph::new(line).block(block).render(area, buf);
    }
}
