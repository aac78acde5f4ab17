//! Transcript view for one panel.
//!
//! Patient messages hug the panel's own side (left for the left panel, right
//! for the right one) and Ava's replies are centered. While a reply is pending
//! an animated "Ava is typing" line follows the history. The view sticks to
//! the bottom unless scrolled back.

use ava_engine::{Message, PanelId, Role, ASSISTANT_NAME};
use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::{IconSet, Theme};

/// Shown when the conversation has not started.
pub const EMPTY_HINT: &str = "Ask Ava a question to start the conversation.";

/// Transcript widget.
pub struct ChatView<'a> {
    messages: &'a [Message],
    theme: &'a Theme,
    icons: &'a IconSet,
    side: PanelId,
    typing: bool,
    tick: u64,
    scroll: usize,
}

impl<'a> ChatView<'a> {
    /// Create a chat view over `messages`.
    pub fn new(messages: &'a [Message], theme: &'a Theme, icons: &'a IconSet) -> Self {
        Self {
            messages,
            theme,
            icons,
            side: PanelId::Left,
            typing: false,
            tick: 0,
            scroll: 0,
        }
    }

    /// Panel the transcript belongs to; patient messages align to its side.
    #[must_use]
    pub fn side(mut self, side: PanelId) -> Self {
        self.side = side;
        self
    }

    /// Show the typing indicator, animated by `tick`.
    #[must_use]
    pub fn typing(mut self, typing: bool, tick: u64) -> Self {
        self.typing = typing;
        self.tick = tick;
        self
    }

    /// Lines scrolled back from the bottom.
    #[must_use]
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    /// Build the wrapped transcript for a given width.
    pub fn lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if self.messages.is_empty() && !self.typing {
            lines.push(
                Line::from(Span::styled(
                    EMPTY_HINT,
                    Style::default().fg(self.theme.muted),
                ))
                .alignment(Alignment::Center),
            );
            return lines;
        }

        let wrap_width = width.saturating_sub(2).max(1);
        for (i, message) in self.messages.iter().enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            let (alignment, color) = match message.role {
                Role::User => (self.patient_alignment(), self.theme.patient),
                Role::Assistant => (Alignment::Center, self.theme.assistant),
            };
            let time = message.timestamp.with_timezone(&Local).format("%H:%M");
            lines.push(
                Line::from(vec![
                    Span::styled(
                        message.sender.clone(),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!(" {time}"), Style::default().fg(self.theme.muted)),
                ])
                .alignment(alignment),
            );
            for row in textwrap::wrap(&message.text, wrap_width) {
                lines.push(
                    Line::from(Span::styled(
                        row.into_owned(),
                        Style::default().fg(self.theme.text),
                    ))
                    .alignment(alignment),
                );
            }
        }

        if self.typing {
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            lines.push(
                Line::from(vec![
                    Span::styled(
                        format!("{ASSISTANT_NAME} is typing "),
                        Style::default()
                            .fg(self.theme.muted)
                            .add_modifier(Modifier::ITALIC),
                    ),
                    Span::styled(
                        self.icons.typing_frame(self.tick),
                        Style::default().fg(self.theme.assistant),
                    ),
                ])
                .alignment(Alignment::Center),
            );
        }

        lines
    }

    /// Furthest the view can scroll back when rendered into `area`.
    pub fn max_scroll(&self, area: Rect) -> usize {
        if area.height == 0 || area.width == 0 {
            return 0;
        }
        self.lines(area.width as usize)
            .len()
            .saturating_sub(area.height as usize)
    }

    fn patient_alignment(&self) -> Alignment {
        match self.side {
            PanelId::Left => Alignment::Left,
            PanelId::Right => Alignment::Right,
        }
    }
}

impl Widget for ChatView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let lines = self.lines(area.width as usize);
        let bottom = lines.len().saturating_sub(area.height as usize);
        let offset = bottom.saturating_sub(self.scroll);
        #[allow(clippy::cast_possible_truncation)]
        let offset = offset.min(u16::MAX as usize) as u16;
        Paragraph::new(lines).scroll((offset, 0)).render(area, buf);
    }
}
