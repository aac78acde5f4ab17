//! Event handling for the Ava TUI.

use ava_engine::PanelId;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc;

/// Events that can occur in the TUI.
#[derive(Debug, Clone)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Text was pasted (bracketed paste).
    Paste(String),
    /// A tick event for UI updates.
    Tick,
    /// Terminal was resized.
    Resize(u16, u16),
}

/// Event handler that runs in a background thread.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new event handler with the specified tick rate.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx_clone = tx.clone();

        // crossterm polling is blocking, so it gets its own thread
        std::thread::spawn(move || {
            let tick_rate = Duration::from_millis(tick_rate_ms);
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    if let Ok(evt) = event::read() {
                        let event = match evt {
                            CrosstermEvent::Key(key) => Some(Event::Key(key)),
                            CrosstermEvent::Paste(text) => Some(Event::Paste(text)),
                            CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
                            _ => None,
                        };
                        if let Some(e) = event {
                            if tx_clone.send(e).is_err() {
                                break;
                            }
                        }
                    }
                } else if tx_clone.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Get the next event, blocking until one is available.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Key action that can be performed in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Help,
    ToggleProfiles,
    NextPanel,
    Zoom(PanelId),
    Split,
    Submit,
    Insert(char),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    Home,
    End,
    HistoryPrev,
    HistoryNext,
    ScrollUp,
    ScrollDown,
    None,
}

/// Convert a key event to an action.
///
/// Plain characters always go to the focused input; commands use
/// function keys or Ctrl.
pub fn key_to_action(key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Action::Quit,
            KeyCode::Char('p') => Action::ToggleProfiles,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Esc => Action::Quit,
        KeyCode::F(1) => Action::Help,
        KeyCode::F(2) => Action::Zoom(PanelId::Left),
        KeyCode::F(3) => Action::Zoom(PanelId::Right),
        KeyCode::F(4) => Action::Split,
        KeyCode::Tab | KeyCode::BackTab => Action::NextPanel,
        KeyCode::Enter => Action::Submit,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Delete => Action::Delete,
        KeyCode::Left => Action::CursorLeft,
        KeyCode::Right => Action::CursorRight,
        KeyCode::Home => Action::Home,
        KeyCode::End => Action::End,
        KeyCode::Up => Action::HistoryPrev,
        KeyCode::Down => Action::HistoryNext,
        KeyCode::PageUp => Action::ScrollUp,
        KeyCode::PageDown => Action::ScrollDown,
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::ALT) => Action::Insert(c),
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(key_to_action(key(KeyCode::Esc)), Action::Quit);
        assert_eq!(key_to_action(ctrl('c')), Action::Quit);
    }

    #[test]
    fn test_letters_are_typed_not_commands() {
        assert_eq!(key_to_action(key(KeyCode::Char('q'))), Action::Insert('q'));
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT)),
            Action::Insert('Q')
        );
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT)),
            Action::None
        );
    }

    #[test]
    fn test_panel_keys() {
        assert_eq!(key_to_action(key(KeyCode::Tab)), Action::NextPanel);
        assert_eq!(key_to_action(ctrl('p')), Action::ToggleProfiles);
        assert_eq!(key_to_action(key(KeyCode::F(2))), Action::Zoom(PanelId::Left));
        assert_eq!(key_to_action(key(KeyCode::F(3))), Action::Zoom(PanelId::Right));
        assert_eq!(key_to_action(key(KeyCode::F(4))), Action::Split);
        assert_eq!(key_to_action(key(KeyCode::F(1))), Action::Help);
    }

    #[test]
    fn test_editing_keys() {
        assert_eq!(key_to_action(key(KeyCode::Enter)), Action::Submit);
        assert_eq!(key_to_action(key(KeyCode::Backspace)), Action::Backspace);
        assert_eq!(key_to_action(key(KeyCode::Up)), Action::HistoryPrev);
        assert_eq!(key_to_action(key(KeyCode::PageUp)), Action::ScrollUp);
        assert_eq!(key_to_action(ctrl('z')), Action::None);
    }
}
