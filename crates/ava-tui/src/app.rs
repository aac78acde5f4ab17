//! Application state and update logic for the Ava TUI.

use ava_engine::{Delivery, PanelId, Panels, Rejection, Scheduler, SubmitOutcome};
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use tracing::debug;

use crate::event::{key_to_action, Action};
use crate::layout::{panel_areas, ScreenMode};
use crate::theme::{BorderSet, IconMode, IconSet, Theme};
use crate::widgets::{chat_area, ChatView, TextInputState};

/// Ticks a notice stays visible (~3 seconds at 4 Hz).
const NOTICE_TTL: u32 = 12;

/// Lines moved per scroll step.
const SCROLL_STEP: usize = 3;

/// Main application state.
#[derive(Debug)]
pub struct App {
    /// Both patient panels.
    pub panels: Panels,
    /// Input line per panel, indexed by [`PanelId::index`].
    pub inputs: [TextInputState; 2],
    /// Lines scrolled back from the bottom, per panel.
    pub scroll: [usize; 2],
    /// Scroll limit per panel as of the last layout.
    max_scroll: [usize; 2],
    /// Panel receiving keyboard input.
    pub focused: PanelId,
    /// Split or zoomed view.
    pub screen_mode: ScreenMode,
    /// Whether help overlay is visible.
    pub show_help: bool,
    /// Whether profile cards are visible.
    pub show_profiles: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Tick counter for animations.
    pub tick: u64,
    /// Transient footer message.
    pub notice: Option<String>,
    notice_ttl: u32,
    /// Color palette.
    pub theme: Theme,
    /// Border characters.
    pub borders: BorderSet,
    /// Icon characters.
    pub icons: IconSet,
}

impl App {
    /// Create the app around `panels`.
    pub fn new(panels: Panels, mode: IconMode) -> Self {
        let theme = match mode {
            IconMode::Unicode => Theme::mocha(),
            IconMode::Ascii => Theme::plain(),
        };
        Self {
            panels,
            inputs: [TextInputState::new(), TextInputState::new()],
            scroll: [0, 0],
            max_scroll: [0, 0],
            focused: PanelId::Left,
            screen_mode: ScreenMode::Split,
            show_help: false,
            show_profiles: true,
            should_quit: false,
            tick: 0,
            notice: None,
            notice_ttl: 0,
            theme,
            borders: BorderSet::new(mode),
            icons: IconSet::new(mode),
        }
    }

    /// Input line of `panel`.
    pub fn input(&self, panel: PanelId) -> &TextInputState {
        &self.inputs[panel.index()]
    }

    fn focused_input(&mut self) -> &mut TextInputState {
        &mut self.inputs[self.focused.index()]
    }

    /// Map a key press to an action and apply it.
    pub fn handle_key(&mut self, key: KeyEvent, scheduler: &dyn Scheduler) {
        self.handle_action(key_to_action(key), scheduler);
    }

    /// Handle an action.
    pub fn handle_action(&mut self, action: Action, scheduler: &dyn Scheduler) {
        match action {
            Action::Quit => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.panels.cancel_all();
                    self.should_quit = true;
                }
                return;
            }
            Action::Help => {
                self.show_help = !self.show_help;
                return;
            }
            Action::None => return,
            _ => {}
        }

        // If help is showing, any key closes it
        if self.show_help {
            self.show_help = false;
            return;
        }

        match action {
            Action::ToggleProfiles => self.show_profiles = !self.show_profiles,
            Action::NextPanel => {
                self.focused = self.focused.toggle();
                if self.screen_mode.is_zoomed() {
                    self.screen_mode = ScreenMode::zoom(self.focused);
                }
            }
            Action::Zoom(panel) => {
                self.focused = panel;
                self.screen_mode = ScreenMode::zoom(panel);
            }
            Action::Split => self.screen_mode = ScreenMode::Split,
            Action::Submit => {
                self.submit_focused(scheduler);
            }
            Action::ScrollUp => {
                let index = self.focused.index();
                self.scroll[index] = self.scroll[index]
                    .saturating_add(SCROLL_STEP)
                    .min(self.max_scroll[index]);
            }
            Action::ScrollDown => {
                let scroll = &mut self.scroll[self.focused.index()];
                *scroll = scroll.saturating_sub(SCROLL_STEP);
            }
            edit => self.edit_focused(edit),
        }
    }

    /// Apply an editing action to the focused input.
    ///
    /// Input is disabled while the focused panel waits for a reply.
    fn edit_focused(&mut self, action: Action) {
        if self.panels.panel(self.focused).is_awaiting_reply() {
            return;
        }
        let input = self.focused_input();
        match action {
            Action::Insert(c) => input.insert(c),
            Action::Backspace => input.backspace(),
            Action::Delete => input.delete(),
            Action::CursorLeft => input.move_left(),
            Action::CursorRight => input.move_right(),
            Action::Home => input.move_home(),
            Action::End => input.move_end(),
            Action::HistoryPrev => input.history_prev(),
            Action::HistoryNext => input.history_next(),
            _ => {}
        }
    }

    /// Insert pasted text into the focused input as a single line.
    pub fn paste(&mut self, text: &str) {
        if self.show_help || self.panels.panel(self.focused).is_awaiting_reply() {
            return;
        }
        let line = text.replace(['\r', '\n'], " ");
        self.focused_input().insert_str(&line);
    }

    /// Submit the focused panel's input.
    ///
    /// The input is cleared only when the submission is accepted; a rejected
    /// submission keeps the text and shows a notice.
    pub fn submit_focused(&mut self, scheduler: &dyn Scheduler) -> SubmitOutcome {
        let id = self.focused;
        let text = self.inputs[id.index()].content().to_string();
        let outcome = self.panels.submit(id, &text, scheduler);
        match outcome {
            SubmitOutcome::Accepted { .. } => {
                self.inputs[id.index()].submit();
                self.scroll[id.index()] = 0;
                self.clear_notice();
            }
            SubmitOutcome::Rejected(reason) => {
                debug!(panel = %id, ?reason, "submission rejected");
                let message = match reason {
                    Rejection::EmptyInput => "Type a question first",
                    Rejection::ReplyPending => "Ava is still replying",
                };
                self.set_notice(message);
            }
        }
        outcome
    }

    /// Recompute scroll limits for the panels visible in `area`.
    ///
    /// Called before each draw so scrolling stops where the transcript ends.
    pub fn fit_scroll(&mut self, area: Rect) {
        for (id, panel_area) in panel_areas(self.screen_mode, area) {
            let panel = self.panels.panel(id);
            let max = ChatView::new(panel.session().history(), &self.theme, &self.icons)
                .side(id)
                .typing(panel.is_awaiting_reply(), self.tick)
                .max_scroll(chat_area(panel_area, self.show_profiles));
            let index = id.index();
            self.max_scroll[index] = max;
            self.scroll[index] = self.scroll[index].min(max);
        }
    }

    /// Hand a due reply to its panel.
    pub fn deliver(&mut self, delivery: Delivery) {
        self.panels.deliver(delivery);
        self.scroll[delivery.panel.index()] = 0;
    }

    /// Set a temporary notice message.
    fn set_notice(&mut self, message: &str) {
        self.notice = Some(message.to_string());
        self.notice_ttl = NOTICE_TTL;
    }

    fn clear_notice(&mut self) {
        self.notice = None;
        self.notice_ttl = 0;
    }

    /// Increment tick counter and expire the notice.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        if self.notice_ttl > 0 {
            self.notice_ttl -= 1;
            if self.notice_ttl == 0 {
                self.notice = None;
            }
        }
    }

    /// App with a small fixed data set, for tests.
    #[cfg(test)]
    pub(crate) fn new_for_test() -> Self {
        Self::new(crate::test_utils::test_panels(), IconMode::Unicode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ava_engine::{DeliveryOutcome, ManualScheduler, Role};

    fn type_text(app: &mut App, text: &str, scheduler: &dyn Scheduler) {
        for c in text.chars() {
            app.handle_action(Action::Insert(c), scheduler);
        }
    }

    #[test]
    fn test_new_app_defaults() {
        let app = App::new_for_test();
        assert_eq!(app.focused, PanelId::Left);
        assert_eq!(app.screen_mode, ScreenMode::Split);
        assert!(app.show_profiles);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_typing_goes_to_focused_panel() {
        let mut app = App::new_for_test();
        let scheduler = ManualScheduler::new();

        type_text(&mut app, "hi", &scheduler);
        app.handle_action(Action::NextPanel, &scheduler);
        type_text(&mut app, "yo", &scheduler);

        assert_eq!(app.input(PanelId::Left).content(), "hi");
        assert_eq!(app.input(PanelId::Right).content(), "yo");
        assert_eq!(app.focused, PanelId::Right);
    }

    #[test]
    fn test_submit_and_deliver_flow() {
        let mut app = App::new_for_test();
        let scheduler = ManualScheduler::new();

        type_text(&mut app, "Is my fatigue from the medication?", &scheduler);
        app.handle_action(Action::Submit, &scheduler);

        assert!(app.input(PanelId::Left).is_empty());
        assert!(app.panels.panel(PanelId::Left).is_awaiting_reply());

        for delivery in scheduler.drain() {
            app.deliver(delivery);
        }
        let history = app.panels.panel(PanelId::Left).session().history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].role, Role::Assistant);
        assert_eq!(history[1].text, "It may be the hormone therapy.");
    }

    #[test]
    fn test_empty_submission_keeps_input_and_shows_notice() {
        let mut app = App::new_for_test();
        let scheduler = ManualScheduler::new();

        type_text(&mut app, "   ", &scheduler);
        let outcome = app.submit_focused(&scheduler);

        assert_eq!(outcome, SubmitOutcome::Rejected(Rejection::EmptyInput));
        assert_eq!(app.input(PanelId::Left).content(), "   ");
        assert_eq!(app.notice.as_deref(), Some("Type a question first"));
        assert!(scheduler.pending().is_empty());
    }

    #[test]
    fn test_input_disabled_while_awaiting_reply() {
        let mut app = App::new_for_test();
        let scheduler = ManualScheduler::new();

        type_text(&mut app, "first", &scheduler);
        app.handle_action(Action::Submit, &scheduler);
        type_text(&mut app, "second", &scheduler);
        assert!(app.input(PanelId::Left).is_empty());

        // The other panel stays usable.
        app.handle_action(Action::NextPanel, &scheduler);
        type_text(&mut app, "other", &scheduler);
        assert_eq!(app.input(PanelId::Right).content(), "other");
    }

    #[test]
    fn test_submit_while_awaiting_is_rejected() {
        let mut app = App::new_for_test();
        let scheduler = ManualScheduler::new();

        type_text(&mut app, "first", &scheduler);
        app.handle_action(Action::Submit, &scheduler);
        let outcome = app.submit_focused(&scheduler);

        assert_eq!(outcome, SubmitOutcome::Rejected(Rejection::ReplyPending));
        assert_eq!(app.notice.as_deref(), Some("Ava is still replying"));
        assert_eq!(scheduler.pending().len(), 1);
        assert_eq!(app.panels.panel(PanelId::Left).session().history().len(), 1);
    }

    #[test]
    fn test_notice_expires_after_ttl() {
        let mut app = App::new_for_test();
        let scheduler = ManualScheduler::new();
        app.submit_focused(&scheduler);
        assert!(app.notice.is_some());

        for _ in 0..NOTICE_TTL {
            app.tick();
        }
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_history_recall() {
        let mut app = App::new_for_test();
        let scheduler = ManualScheduler::new();

        type_text(&mut app, "fatigue", &scheduler);
        app.handle_action(Action::Submit, &scheduler);
        for delivery in scheduler.drain() {
            assert_eq!(
                app.panels.deliver(delivery),
                DeliveryOutcome::Delivered
            );
        }

        app.handle_action(Action::HistoryPrev, &scheduler);
        assert_eq!(app.input(PanelId::Left).content(), "fatigue");
        app.handle_action(Action::HistoryNext, &scheduler);
        assert!(app.input(PanelId::Left).is_empty());
    }

    #[test]
    fn test_zoom_and_split() {
        let mut app = App::new_for_test();
        let scheduler = ManualScheduler::new();

        app.handle_action(Action::Zoom(PanelId::Right), &scheduler);
        assert_eq!(app.screen_mode, ScreenMode::RightFocus);
        assert_eq!(app.focused, PanelId::Right);

        // Switching panels while zoomed follows focus.
        app.handle_action(Action::NextPanel, &scheduler);
        assert_eq!(app.screen_mode, ScreenMode::LeftFocus);

        app.handle_action(Action::Split, &scheduler);
        assert_eq!(app.screen_mode, ScreenMode::Split);
        assert_eq!(app.focused, PanelId::Left);
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let mut app = App::new_for_test();
        let scheduler = ManualScheduler::new();

        app.handle_action(Action::Help, &scheduler);
        assert!(app.show_help);
        app.handle_action(Action::Insert('x'), &scheduler);
        assert!(!app.show_help);
        assert!(app.input(PanelId::Left).is_empty());

        app.handle_action(Action::Help, &scheduler);
        app.handle_action(Action::Quit, &scheduler);
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_quit_cancels_pending_replies() {
        let mut app = App::new_for_test();
        let scheduler = ManualScheduler::new();

        type_text(&mut app, "fatigue", &scheduler);
        app.handle_action(Action::Submit, &scheduler);
        app.handle_action(Action::Quit, &scheduler);

        assert!(app.should_quit);
        assert!(!app.panels.panel(PanelId::Left).is_awaiting_reply());
    }

    /// Ask and answer `count` questions in the left panel.
    fn fill_left_transcript(app: &mut App, count: usize, scheduler: &ManualScheduler) {
        for _ in 0..count {
            type_text(app, "fatigue", scheduler);
            app.handle_action(Action::Submit, scheduler);
            for delivery in scheduler.drain() {
                app.deliver(delivery);
            }
        }
    }

    #[test]
    fn test_scroll_is_bounded_by_transcript() {
        let mut app = App::new_for_test();
        let scheduler = ManualScheduler::new();
        let area = Rect::new(0, 0, 80, 24);

        // Nothing to scroll on an empty transcript.
        app.fit_scroll(area);
        for _ in 0..10 {
            app.handle_action(Action::ScrollUp, &scheduler);
        }
        assert_eq!(app.scroll[0], 0);

        fill_left_transcript(&mut app, 6, &scheduler);
        app.fit_scroll(area);
        for _ in 0..100 {
            app.handle_action(Action::ScrollUp, &scheduler);
        }
        let max = app.scroll[0];
        assert!(max > 0);
        assert_eq!(max, app.max_scroll[0]);

        // The first step down is visible immediately.
        app.handle_action(Action::ScrollDown, &scheduler);
        assert_eq!(app.scroll[0], max.saturating_sub(SCROLL_STEP));
    }

    #[test]
    fn test_fit_scroll_clamps_after_resize() {
        let mut app = App::new_for_test();
        let scheduler = ManualScheduler::new();
        fill_left_transcript(&mut app, 6, &scheduler);

        app.fit_scroll(Rect::new(0, 0, 80, 24));
        for _ in 0..100 {
            app.handle_action(Action::ScrollUp, &scheduler);
        }
        let small_window = app.scroll[0];

        app.fit_scroll(Rect::new(0, 0, 80, 60));
        assert!(app.scroll[0] < small_window);
        assert_eq!(app.scroll[0], app.max_scroll[0]);
    }

    #[test]
    fn test_scroll_resets_on_delivery() {
        let mut app = App::new_for_test();
        let scheduler = ManualScheduler::new();
        fill_left_transcript(&mut app, 6, &scheduler);
        app.fit_scroll(Rect::new(0, 0, 80, 24));

        app.handle_action(Action::ScrollUp, &scheduler);
        assert_eq!(app.scroll[0], SCROLL_STEP);
        app.handle_action(Action::ScrollDown, &scheduler);
        app.handle_action(Action::ScrollDown, &scheduler);
        assert_eq!(app.scroll[0], 0);

        type_text(&mut app, "fatigue", &scheduler);
        app.handle_action(Action::Submit, &scheduler);
        app.handle_action(Action::ScrollUp, &scheduler);
        for delivery in scheduler.drain() {
            app.deliver(delivery);
        }
        assert_eq!(app.scroll[0], 0);
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut app = App::new_for_test();
        let scheduler = ManualScheduler::new();

        app.paste("Is my fatigue\nfrom the medication?");
        assert_eq!(
            app.input(PanelId::Left).content(),
            "Is my fatigue from the medication?"
        );

        app.handle_action(Action::Submit, &scheduler);
        app.paste("ignored while waiting");
        assert!(app.input(PanelId::Left).is_empty());
    }

    #[test]
    fn test_toggle_profiles() {
        let mut app = App::new_for_test();
        let scheduler = ManualScheduler::new();
        app.handle_action(Action::ToggleProfiles, &scheduler);
        assert!(!app.show_profiles);
    }

    #[test]
    fn test_ascii_mode_uses_plain_theme() {
        let app = App::new(crate::test_utils::test_panels(), IconMode::Ascii);
        assert_eq!(app.borders.normal().top_left, "+");
        assert_eq!(app.theme.text, ratatui::style::Color::Reset);
    }
}
