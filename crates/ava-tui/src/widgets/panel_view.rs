//! One patient panel: bordered frame holding the profile card, chat title,
//! transcript and input line.

use std::rc::Rc;

use ava_engine::Panel;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::{ChatView, InputBar, ProfileCard, TextInputState};
use crate::theme::{BorderSet, IconSet, Theme};

/// Inner height below which the profile card is hidden.
const PROFILE_MIN_HEIGHT: u16 = 14;

/// Panel widget.
pub struct PanelView<'a> {
    panel: &'a Panel,
    input: &'a TextInputState,
    theme: &'a Theme,
    borders: &'a BorderSet,
    icons: &'a IconSet,
    focused: bool,
    show_profile: bool,
    scroll: usize,
    tick: u64,
}

impl<'a> PanelView<'a> {
    pub fn new(
        panel: &'a Panel,
        input: &'a TextInputState,
        theme: &'a Theme,
        borders: &'a BorderSet,
        icons: &'a IconSet,
    ) -> Self {
        Self {
            panel,
            input,
            theme,
            borders,
            icons,
            focused: false,
            show_profile: true,
            scroll: 0,
            tick: 0,
        }
    }

    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    #[must_use]
    pub fn show_profile(mut self, show: bool) -> Self {
        self.show_profile = show;
        self
    }

    #[must_use]
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    #[must_use]
    pub fn tick(mut self, tick: u64) -> Self {
        self.tick = tick;
        self
    }
}

/// Chat transcript area of a panel drawn into `area`.
pub fn chat_area(area: Rect, show_profile: bool) -> Rect {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    sections(inner, show_profile).1[2]
}

/// Profile card, title, transcript and input rows inside the border.
///
/// Returns whether the profile card fits alongside the rows.
fn sections(inner: Rect, show_profile: bool) -> (bool, Rc<[Rect]>) {
    let show_profile = show_profile && inner.height >= PROFILE_MIN_HEIGHT;
    let profile = if show_profile {
        Constraint::Percentage(40)
    } else {
        Constraint::Length(0)
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            profile,
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(inner);
    (show_profile, chunks)
}

impl Widget for PanelView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (border_set, border_style, title_style) = if self.focused {
            (
                self.borders.focused(),
                Style::default().fg(self.theme.border_focused),
                Style::default()
                    .fg(self.theme.primary)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            (
                self.borders.normal(),
                Style::default().fg(self.theme.border),
                Style::default().fg(self.theme.subtext),
            )
        };

        let profile = self.panel.profile();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border_set)
            .border_style(border_style)
            .title(Span::styled(format!(" {} ", profile.name), title_style));
        let inner = block.inner(area);
        block.render(area, buf);

        let (show_profile, chunks) = sections(inner, self.show_profile);

        if show_profile {
            ProfileCard::new(profile, self.theme, self.icons).render(chunks[0], buf);
        }

        Paragraph::new(Line::from(Span::styled(
            profile.chat_title(),
            Style::default()
                .fg(self.theme.secondary)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        let waiting = self.panel.is_awaiting_reply();
        ChatView::new(self.panel.session().history(), self.theme, self.icons)
            .side(self.panel.id())
            .typing(waiting, self.tick)
            .scroll(self.scroll)
            .render(chunks[2], buf);

        InputBar::new(self.input, self.theme, self.borders, self.icons)
            .focused(self.focused)
            .waiting(waiting)
            .render(chunks[3], buf);
    }
}
