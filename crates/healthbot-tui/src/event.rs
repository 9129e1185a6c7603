//! Event handling for the HealthBot TUI.

use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent,
    MouseEventKind,
};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

/// Events that can occur in the TUI.
#[derive(Debug, Clone)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event occurred.
    Mouse(MouseEvent),
    /// A tick event for UI updates.
    Tick,
    /// Terminal was resized.
    Resize(u16, u16),
}

/// Event handler that runs in a background thread.
///
/// When the terminal stops answering the thread exits and [`next`](Self::next)
/// returns `None`.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Create a new event handler with the specified tick rate.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        // crossterm polling is blocking, keep it off the runtime
        std::thread::spawn(move || {
            let tick_rate = Duration::from_millis(tick_rate_ms);
            let next = || -> io::Result<Option<CrosstermEvent>> {
                if event::poll(tick_rate)? {
                    event::read().map(Some)
                } else {
                    Ok(None)
                }
            };
            pump(next, &tx);
        });

        Self { rx }
    }

    /// Get the next event, blocking until one is available.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Forward terminal events to `tx` until the receiver is dropped or the
/// terminal reports an error. `next` yields `Ok(None)` when a tick passed
/// without input.
fn pump(
    mut next: impl FnMut() -> io::Result<Option<CrosstermEvent>>,
    tx: &mpsc::UnboundedSender<Event>,
) {
    loop {
        let events = match next() {
            Ok(Some(raw)) => translate(raw),
            Ok(None) => vec![Event::Tick],
            Err(e) => {
                warn!(error = %e, "terminal input failed, stopping event thread");
                return;
            }
        };
        for event in events {
            if tx.send(event).is_err() {
                return;
            }
        }
    }
}

/// Map a crossterm event to TUI events.
///
/// Key releases are dropped. Pasted text is replayed as key presses so
/// newlines stay newlines instead of submitting.
fn translate(raw: CrosstermEvent) -> Vec<Event> {
    match raw {
        CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => vec![Event::Key(key)],
        CrosstermEvent::Mouse(mouse) => vec![Event::Mouse(mouse)],
        CrosstermEvent::Resize(w, h) => vec![Event::Resize(w, h)],
        CrosstermEvent::Paste(text) => text
            .chars()
            .filter(|ch| *ch != '\r')
            .map(|ch| {
                let key = if ch == '\n' {
                    KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL)
                } else {
                    KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE)
                };
                Event::Key(key)
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Action that a key or mouse event maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Submit,
    Newline,
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    None,
}

/// Convert a key event to an action.
pub fn key_to_action(key: KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl {
        return match key.code {
            KeyCode::Char('c') => Action::Quit,
            KeyCode::Char('j') => Action::Newline,
            KeyCode::Char('a') => Action::Home,
            KeyCode::Char('e') => Action::End,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Enter
            if key
                .modifiers
                .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
        {
            Action::Newline
        }
        KeyCode::Enter => Action::Submit,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Delete => Action::Delete,
        KeyCode::Left => Action::Left,
        KeyCode::Right => Action::Right,
        KeyCode::Home => Action::Home,
        KeyCode::End => Action::End,
        KeyCode::Up => Action::ScrollUp,
        KeyCode::Down => Action::ScrollDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Char(ch) => Action::Insert(ch),
        _ => Action::None,
    }
}

/// Convert a mouse event to an action. Only the wheel is used.
pub fn mouse_to_action(mouse: MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::ScrollUp => Action::ScrollUp,
        MouseEventKind::ScrollDown => Action::ScrollDown,
        _ => Action::None,
    }
}
