//! ava-tui: Terminal UI for the Ava two-panel chat demo
//!
//! This crate provides the TUI layer for Ava, including:
//! - Split screen with one patient panel per side
//! - Profile cards, transcripts and typing indicators
//! - Headless mode for testing and automation

mod app;
mod event;
pub mod headless;
mod layout;
#[cfg(test)]
pub mod test_utils;
mod theme;
mod widgets;

pub use app::App;
pub use ava_engine;
pub use event::{key_to_action, Action, Event, EventHandler};
pub use layout::{ScreenMode, MIN_HEIGHT, MIN_WIDTH};
pub use theme::IconMode;

use ava_engine::{Delivery, Panels, Scheduler, TokioScheduler};
use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableBracketedPaste, EnableBracketedPaste, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use tokio::sync::mpsc;
use tracing::info;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application.
///
/// This is the main entry point for the TUI. It sets up the terminal,
/// runs the event loop, and restores the terminal on exit. Pending replies
/// are cancelled on the way out.
pub async fn run_tui(panels: Panels, tick_rate_ms: u64) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal with RAII guard for cleanup
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(panels, IconMode::detect());
    let (scheduler, mut deliveries) = TokioScheduler::new();
    let mut events = EventHandler::new(tick_rate_ms);
    info!(tick_rate_ms, "TUI started");

    let result = run_loop(
        &mut terminal,
        &mut app,
        &mut events,
        &scheduler,
        &mut deliveries,
    )
    .await;

    app.panels.cancel_all();
    info!("TUI stopped");

    // Restore cursor before guard drops
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    scheduler: &dyn Scheduler,
    deliveries: &mut mpsc::UnboundedReceiver<Delivery>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            app.fit_scroll(area);
            layout::render_app(app, area, frame.buffer_mut());
        })?;

        if app.should_quit {
            break;
        }

        tokio::select! {
            event = events.next() => match event {
                Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key, scheduler);
                }
                Some(Event::Paste(text)) => app.paste(&text),
                Some(Event::Tick) => app.tick(),
                Some(Event::Key(_) | Event::Resize(..)) => {}
                None => break,
            },
            Some(delivery) = deliveries.recv() => app.deliver(delivery),
        }
    }

    Ok(())
}
