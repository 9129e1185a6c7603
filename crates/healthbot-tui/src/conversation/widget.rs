//! Conversation pane widget.
//!
//! Shows the visible transcript inside a bordered block and keeps the
//! scroll state in sync with the content height.

use healthbot_engine::Conversation;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};

use crate::theme::Theme;

use super::scroll::TranscriptScroll;
use super::transcript::transcript_lines;

/// Conversation pane widget.
///
/// ```text
/// ┌ Conversation ───────────────────────┐
/// │HealthBot                            │
/// │  Hello! I am HealthBot, an advanced │
/// │  AI healthcare assistant. ...       │
/// │                                     │
/// │You                                  │
/// │  I have a headache                  │
/// └─────────────────────────────────────┘
/// ```
pub struct ConversationPane<'a> {
    conversation: &'a Conversation,
    theme: &'a Theme,
    tick: u64,
}

impl<'a> ConversationPane<'a> {
    /// Create a new conversation pane.
    pub fn new(conversation: &'a Conversation, theme: &'a Theme) -> Self {
        Self {
            conversation,
            theme,
            tick: 0,
        }
    }

    /// Animation tick for the thinking placeholder.
    #[must_use]
    pub fn tick(mut self, tick: u64) -> Self {
        self.tick = tick;
        self
    }
}

impl StatefulWidget for ConversationPane<'_> {
    type State = TranscriptScroll;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let mut block = Block::default()
            .title(" Conversation ")
            .title_style(Style::default().fg(self.theme.text))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.base));

        if !state.is_following() {
            block = block.title_bottom(
                Line::styled(" ↓ newer messages below ", Style::default().fg(self.theme.info))
                    .right_aligned(),
            );
        }

        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let lines = transcript_lines(self.conversation, self.theme, inner.width as usize, self.tick);
        let viewport = inner.height as usize;
        let offset = state.resolve(lines.len(), viewport);

        let visible: Vec<Line<'static>> = lines.into_iter().skip(offset).take(viewport).collect();
        Paragraph::new(visible).render(inner, buf);
    }
}
