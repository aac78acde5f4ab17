//! Test utilities for ava-tui rendering and integration tests.

use ava_engine::{
    ManualScheduler, Message, PanelId, Panels, QaDocument, QaEntry, ReplyDelay,
};
use ratatui::{buffer::Buffer, layout::Rect};

use crate::app::App;
use crate::layout::render_app;

pub use crate::headless::buffer_to_string;

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Delay used by test panels.
pub const TEST_DELAY_MS: u64 = 1200;

/// One canned answer per panel.
pub fn test_document() -> QaDocument {
    QaDocument {
        left: vec![QaEntry::new(
            "fatigue medication",
            "It may be the hormone therapy.",
        )],
        right: vec![QaEntry::new(
            "recurrence risk statistics",
            "Your five-year recurrence risk is low.",
        )],
    }
}

/// Sarah and Michael over [`test_document`] with a fixed delay.
pub fn test_panels() -> Panels {
    Panels::from_document(test_document(), ReplyDelay::fixed(TEST_DELAY_MS))
}

/// Create a test app with the test panels.
pub fn create_test_app() -> App {
    App::new_for_test()
}

/// A finished question and answer from Sarah's panel.
pub fn conversation() -> Vec<Message> {
    let mut panels = test_panels();
    let scheduler = ManualScheduler::new();
    panels.submit(PanelId::Left, "Is my fatigue from the medication?", &scheduler);
    for delivery in scheduler.drain() {
        panels.deliver(delivery);
    }
    panels.panel(PanelId::Left).session().history().to_vec()
}

/// Render the app at the given size and return the screen text.
pub fn render_app_to_string(app: &App, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    render_app(app, area, &mut buffer);
    buffer_to_string(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_fixture() {
        let messages = conversation();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].text, "It may be the hormone therapy.");
    }

    #[test]
    fn test_render_app_default_size() {
        let app = create_test_app();
        let screen = render_app_to_string(&app, TEST_WIDTH, TEST_HEIGHT);
        assert_eq!(screen.lines().count(), usize::from(TEST_HEIGHT));
        assert!(screen.contains("Sarah Martinez"));
    }
}
