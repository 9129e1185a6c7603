//! Main shell layout with 4 regions.
//!
//! Regions:
//! 1. Header (top, 1 line)
//! 2. Conversation pane (expands)
//! 3. Input bar (3 to 6 lines, grows with the buffer)
//! 4. Footer hints (bottom, 1 line)

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::App;
use crate::conversation::ConversationPane;
use crate::widgets::{
    hints_for_state, input_bar_height, FooterHints, Header, HeaderContent, InputBar,
};

/// Minimum terminal width.
pub const MIN_WIDTH: u16 = 40;
/// Minimum terminal height.
pub const MIN_HEIGHT: u16 = 12;

const INPUT_MIN_HEIGHT: u16 = 3;
const INPUT_MAX_HEIGHT: u16 = 6;

/// Render the main shell layout.
pub fn render_shell(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let content = HeaderContent::too_small(MIN_WIDTH, MIN_HEIGHT);
        frame.render_widget(Header::new(&content, &app.theme), area);
        return;
    }

    let input_height =
        input_bar_height(&app.input, area.width, INPUT_MIN_HEIGHT, INPUT_MAX_HEIGHT);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(input_height),
            Constraint::Length(1),
        ])
        .split(area);

    let header = HeaderContent::new(app.model_label.clone(), app.header_status());
    frame.render_widget(Header::new(&header, &app.theme), chunks[0]);

    let pane = ConversationPane::new(&app.conversation, &app.theme).tick(app.tick);
    frame.render_stateful_widget(pane, chunks[1], &mut app.scroll);

    let in_flight = app.conversation.is_in_flight();
    let configured = app.conversation.is_configured();
    let placeholder = app.placeholder();
    let input = InputBar::new(&app.input, &app.theme)
        .placeholder(&placeholder)
        .loading(in_flight && configured)
        .disabled(!configured);
    frame.render_widget(input, chunks[2]);

    let hints = hints_for_state(in_flight, configured);
    let state = if app.scroll.is_following() {
        "Following"
    } else {
        "Scrolled"
    };
    frame.render_widget(FooterHints::new(&hints, &app.theme).state(state), chunks[3]);
}
