//! healthbot-tui: Terminal UI for the HealthBot chat assistant
//!
//! This crate provides the TUI layer for HealthBot, including:
//! - The conversation pane with markdown-rendered replies
//! - A multi-line input bar and header/footer chrome
//! - The event loop that sends one request at a time and settles it

mod app;
pub mod conversation;
mod event;
pub mod layout;
#[cfg(test)]
pub mod test_utils;
pub mod text;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use event::{key_to_action, mouse_to_action, Action, Event, EventHandler};
pub use healthbot_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use healthbot_engine::{CompletionClient, CompletionError, Config, Message};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Tick interval driving the thinking animation.
const TICK_RATE_MS: u64 = 250;

type CompletionTask = JoinHandle<Result<Message, CompletionError>>;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen,
            ShowCursor
        );
    }
}

/// Run the TUI application.
///
/// This is the main entry point for the TUI. It sets up the terminal,
/// runs the event loop, and restores the terminal on exit.
pub async fn run_tui(
    config: &Config,
    client: Arc<dyn CompletionClient>,
) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let mut events = EventHandler::new(TICK_RATE_MS);
    info!(
        transport = %config.transport,
        endpoint = config.endpoint_url(),
        configured = app.conversation.is_configured(),
        "tui started"
    );

    let result = run_loop(&mut terminal, &mut app, &mut events, client).await;

    terminal.show_cursor()?;
    info!(messages = app.conversation.len(), "tui exited");

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    client: Arc<dyn CompletionClient>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut pending: Option<CompletionTask> = None;

    loop {
        terminal.draw(|frame| layout::render_shell(frame, app))?;

        match events.next().await {
            Some(Event::Key(key)) => app.handle_action(key_to_action(key)),
            Some(Event::Mouse(mouse)) => app.handle_action(mouse_to_action(mouse)),
            Some(Event::Tick) => app.tick(),
            // Next draw picks up the new size
            Some(Event::Resize(_, _)) => {}
            None => {
                warn!("terminal input closed, exiting");
                app.should_quit = true;
            }
        }

        if let Some(payload) = app.take_outbound() {
            let client = Arc::clone(&client);
            pending = Some(tokio::spawn(async move { client.complete(&payload).await }));
        }

        if pending.as_ref().is_some_and(JoinHandle::is_finished) {
            if let Some(handle) = pending.take() {
                app.settle(join_outcome(handle.await));
            }
        }

        if app.should_quit {
            if let Some(handle) = pending.take() {
                handle.abort();
            }
            break;
        }
    }

    Ok(())
}

/// Flatten a finished request task into a completion outcome.
fn join_outcome(
    joined: Result<Result<Message, CompletionError>, tokio::task::JoinError>,
) -> Result<Message, CompletionError> {
    joined.unwrap_or_else(|e| {
        warn!(error = %e, "completion task failed");
        Err(CompletionError::Unavailable(e.to_string()))
    })
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_version() {
        let version = tui_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }

    #[tokio::test]
    async fn test_join_outcome_maps_panics() {
        let handle: CompletionTask = tokio::spawn(async { panic!("request task crashed") });
        let outcome = join_outcome(handle.await);
        assert!(matches!(outcome, Err(CompletionError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_join_outcome_passes_through() {
        let handle: CompletionTask = tokio::spawn(async { Ok(Message::assistant("Hi there")) });
        let outcome = join_outcome(handle.await).unwrap();
        assert_eq!(outcome.content, "Hi there");
    }
}
