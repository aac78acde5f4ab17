//! Main shell layout with 3 regions.
//!
//! Regions:
//! 1. Status Bar (top, 1 line)
//! 2. Panel area (split 50/50, or one zoomed panel)
//! 3. Footer Hints (bottom, 1 line)

use std::rc::Rc;

use ava_engine::PanelId;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Widget,
};

use super::ScreenMode;
use crate::app::App;
use crate::widgets::{hints_for_state, FooterHints, HelpOverlay, PanelStatus, PanelView, StatusBar};

/// Minimum terminal width.
pub const MIN_WIDTH: u16 = 40;
/// Minimum terminal height.
pub const MIN_HEIGHT: u16 = 12;

/// Render the whole application into `buf`.
pub fn render_app(app: &App, area: Rect, buf: &mut Buffer) {
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        render_too_small(app, area, buf);
        return;
    }

    let chunks = regions(area);

    let statuses: Vec<PanelStatus<'_>> = app
        .panels
        .iter()
        .map(|panel| PanelStatus {
            name: panel.profile().first_name(),
            focused: panel.id() == app.focused,
            typing: panel.is_awaiting_reply(),
        })
        .collect();
    StatusBar::new(&statuses, &app.theme, &app.icons)
        .tick(app.tick)
        .render(chunks[0], buf);

    render_panels(app, chunks[1], buf);

    let focused = app.panels.panel(app.focused);
    let hints = hints_for_state(app.screen_mode, focused.is_awaiting_reply());
    FooterHints::new(&hints, &app.theme, &app.icons)
        .screen_mode(app.screen_mode)
        .focused(focused.profile().first_name())
        .notice(app.notice.as_deref())
        .render(chunks[2], buf);

    if app.show_help {
        HelpOverlay::new(&app.theme, &app.borders).render(area, buf);
    }
}

fn regions(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Min(0),    // Panels
            Constraint::Length(1), // Footer hints
        ])
        .split(area)
}

/// Visible panels and their areas, left to right.
fn split_panels(mode: ScreenMode, area: Rect) -> Vec<(PanelId, Rect)> {
    let visible = mode.visible();
    #[allow(clippy::cast_possible_truncation)]
    let share = (100 / visible.len()) as u16;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(visible.iter().map(|_| Constraint::Percentage(share)))
        .split(area);
    visible.iter().copied().zip(chunks.iter().copied()).collect()
}

/// Where each visible panel lands when the app is drawn into `area`.
///
/// Empty when the terminal is too small to show panels.
pub fn panel_areas(mode: ScreenMode, area: Rect) -> Vec<(PanelId, Rect)> {
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        return Vec::new();
    }
    split_panels(mode, regions(area)[1])
}

/// Render the visible panels side by side.
fn render_panels(app: &App, area: Rect, buf: &mut Buffer) {
    for (id, chunk) in split_panels(app.screen_mode, area) {
        PanelView::new(
            app.panels.panel(id),
            app.input(id),
            &app.theme,
            &app.borders,
            &app.icons,
        )
        .focused(id == app.focused)
        .show_profile(app.show_profiles)
        .scroll(app.scroll[id.index()])
        .tick(app.tick)
        .render(chunk, buf);
    }
}

/// Render "terminal too small" warning.
fn render_too_small(app: &App, area: Rect, buf: &mut Buffer) {
    let warning = format!("Terminal too small, resize to at least {MIN_WIDTH}x{MIN_HEIGHT}");
    let line = Rect::new(area.x, area.y, area.width, area.height.min(1));
    StatusBar::new(&[], &app.theme, &app.icons)
        .warning(&warning)
        .render(line, buf);
}
