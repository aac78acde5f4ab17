//! Patient profile card shown above the chat.

use ava_engine::Profile;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::theme::{IconSet, Theme};

/// Read-only profile summary.
pub struct ProfileCard<'a> {
    profile: &'a Profile,
    theme: &'a Theme,
    icons: &'a IconSet,
}

impl<'a> ProfileCard<'a> {
    pub fn new(profile: &'a Profile, theme: &'a Theme, icons: &'a IconSet) -> Self {
        Self {
            profile,
            theme,
            icons,
        }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let heading = Style::default()
            .fg(self.theme.primary)
            .add_modifier(Modifier::BOLD);
        let item = Style::default().fg(self.theme.subtext);

        let mut lines = Vec::new();
        for (title, entries) in self.profile.sections() {
            lines.push(Line::from(Span::styled(title, heading)));
            for entry in entries {
                lines.push(Line::from(vec![
                    Span::styled(format!("{} ", self.icons.bullet()), item),
                    Span::styled(entry, item),
                ]));
            }
        }
        lines.push(Line::from(Span::styled("Example Question", heading)));
        lines.push(Line::from(Span::styled(
            format!("\"{}\"", self.profile.example),
            Style::default()
                .fg(self.theme.text)
                .add_modifier(Modifier::ITALIC),
        )));
        lines
    }
}

impl Widget for ProfileCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.lines())
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
