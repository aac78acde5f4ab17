//! Headless mode for the Ava TUI.
//!
//! Runs the TUI against a `TestBackend`, enabling end-to-end testing and
//! automation. Actions are sent via channels and screen state is captured
//! after each render. Replies are scheduled on the Tokio timer exactly as in
//! the interactive TUI.

use ava_engine::{PanelId, Panels, TokioScheduler};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::app::App;
use crate::event::Action;
use crate::layout::{render_app, ScreenMode};
use crate::theme::IconMode;

/// Default terminal dimensions for headless mode.
pub const DEFAULT_WIDTH: u16 = 80;
pub const DEFAULT_HEIGHT: u16 = 24;

/// State captured from the headless TUI after each render.
#[derive(Debug, Clone, Default)]
pub struct HeadlessState {
    /// Panel with keyboard focus.
    pub focused: PanelId,
    /// Split or zoomed view.
    pub screen_mode: ScreenMode,
    /// Text contents of the terminal buffer.
    pub screen_contents: String,
    /// Whether the TUI should quit.
    pub should_quit: bool,
    /// Whether help overlay is visible.
    pub show_help: bool,
    /// Whether each panel is waiting for a reply, left first.
    pub awaiting: [bool; 2],
    /// Message count per panel, left first.
    pub history_len: [usize; 2],
}

/// Handle to control a headless TUI instance.
///
/// Use this to send actions and observe state changes.
pub struct HeadlessHandle {
    action_tx: mpsc::UnboundedSender<Action>,
    state_rx: watch::Receiver<HeadlessState>,
}

impl HeadlessHandle {
    /// Send an action to the TUI.
    ///
    /// Returns `true` if the action was sent successfully.
    pub fn send_action(&self, action: Action) -> bool {
        self.action_tx.send(action).is_ok()
    }

    /// Type `text` into the focused input, one character at a time.
    pub fn type_text(&self, text: &str) -> bool {
        text.chars().all(|c| self.send_action(Action::Insert(c)))
    }

    /// Get the current state of the TUI.
    pub fn state(&self) -> HeadlessState {
        self.state_rx.borrow().clone()
    }

    /// Wait until a condition is met on the state.
    ///
    /// Returns the state when the condition is met, or `None` if timed out.
    pub async fn wait_for<F>(
        &mut self,
        condition: F,
        timeout: std::time::Duration,
    ) -> Option<HeadlessState>
    where
        F: Fn(&HeadlessState) -> bool,
    {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let state = self.state();
            if condition(&state) {
                return Some(state);
            }

            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return None;
            }

            match tokio::time::timeout(remaining, self.state_rx.changed()).await {
                Ok(Ok(())) => {}
                // Timed out, or the TUI task ended.
                Ok(Err(_)) | Err(_) => return None,
            }
        }
    }

    /// Wait for specific text to appear on screen.
    pub async fn wait_for_text(
        &mut self,
        text: &str,
        timeout: std::time::Duration,
    ) -> Option<HeadlessState> {
        self.wait_for(|s| s.screen_contents.contains(text), timeout)
            .await
    }

    /// Check if the TUI has quit.
    pub fn has_quit(&self) -> bool {
        self.state().should_quit
    }
}

/// Configuration for headless mode.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Terminal width.
    pub width: u16,
    /// Terminal height.
    pub height: u16,
    /// Tick rate in milliseconds.
    pub tick_rate_ms: u64,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tick_rate_ms: 50, // Faster tick rate for testing
        }
    }
}

/// Run the TUI in headless mode.
///
/// Returns a handle to control the TUI and a join handle for the background task.
///
/// # Example
///
/// ```ignore
/// let (mut handle, task) = run_tui_headless(panels, HeadlessConfig::default());
///
/// handle.type_text("Why am I so tired?");
/// handle.send_action(Action::Submit);
///
/// let state = handle.wait_for_text("Ava", Duration::from_secs(5)).await;
///
/// handle.send_action(Action::Quit);
/// task.await.unwrap();
/// ```
pub fn run_tui_headless(
    panels: Panels,
    config: HeadlessConfig,
) -> (HeadlessHandle, JoinHandle<Result<(), String>>) {
    let (action_tx, action_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(HeadlessState::default());

    let task = tokio::spawn(async move {
        run_headless_loop(panels, config, action_rx, state_tx)
            .await
            .map_err(|e| e.to_string())
    });

    let handle = HeadlessHandle {
        action_tx,
        state_rx,
    };

    (handle, task)
}

async fn run_headless_loop(
    panels: Panels,
    config: HeadlessConfig,
    mut action_rx: mpsc::UnboundedReceiver<Action>,
    state_tx: watch::Sender<HeadlessState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let backend = TestBackend::new(config.width, config.height);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(panels, IconMode::Unicode);
    let (scheduler, mut deliveries) = TokioScheduler::new();
    let tick_duration = std::time::Duration::from_millis(config.tick_rate_ms);

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            app.fit_scroll(area);
            render_app(&app, area, frame.buffer_mut());
        })?;

        let _ = state_tx.send(capture_state(&app, terminal.backend().buffer()));

        if app.should_quit {
            break;
        }

        tokio::select! {
            Some(action) = action_rx.recv() => app.handle_action(action, &scheduler),
            Some(delivery) = deliveries.recv() => app.deliver(delivery),
            () = tokio::time::sleep(tick_duration) => app.tick(),
        }
    }

    Ok(())
}

fn capture_state(app: &App, buffer: &Buffer) -> HeadlessState {
    HeadlessState {
        focused: app.focused,
        screen_mode: app.screen_mode,
        screen_contents: buffer_to_string(buffer),
        should_quit: app.should_quit,
        show_help: app.show_help,
        awaiting: PanelId::ALL.map(|id| app.panels.panel(id).is_awaiting_reply()),
        history_len: PanelId::ALL.map(|id| app.panels.panel(id).session().history().len()),
    }
}

/// Convert a terminal buffer to a string representation.
///
/// Trailing whitespace is trimmed from each row.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                result.push_str(cell.symbol());
            }
        }
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }

    result
}
