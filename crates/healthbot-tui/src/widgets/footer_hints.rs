//! Footer line with keybinding hints.
//!
//! Format: `Ready                     [Enter] send │ [Shift+Enter] newline │ [Esc] quit`

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::Theme;

/// A single keybinding hint.
#[derive(Debug, Clone)]
pub struct KeyHint {
    /// The key or key combination (e.g., "Enter", "PgUp/PgDn").
    pub key: String,
    /// The action description (e.g., "send", "quit").
    pub action: String,
}

impl KeyHint {
    /// Create a new key hint.
    pub fn new(key: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
        }
    }
}

/// Footer widget: a state label on the left, hints right-aligned.
pub struct FooterHints<'a> {
    hints: &'a [KeyHint],
    theme: &'a Theme,
    state: Option<&'a str>,
}

impl<'a> FooterHints<'a> {
    /// Create a new footer hints widget.
    pub fn new(hints: &'a [KeyHint], theme: &'a Theme) -> Self {
        Self {
            hints,
            theme,
            state: None,
        }
    }

    /// Set the state label shown on the left.
    #[must_use]
    pub fn state(mut self, state: &'a str) -> Self {
        self.state = Some(state);
        self
    }
}

/// Hints for the current conversation state.
///
/// Sending is only advertised when a submission could be accepted.
#[must_use]
pub fn hints_for_state(in_flight: bool, configured: bool) -> Vec<KeyHint> {
    let mut hints = Vec::new();
    if configured && !in_flight {
        hints.push(KeyHint::new("Enter", "send"));
        hints.push(KeyHint::new("Shift+Enter", "newline"));
    }
    hints.push(KeyHint::new("PgUp/PgDn", "scroll"));
    hints.push(KeyHint::new("Esc", "quit"));
    hints
}

impl Widget for FooterHints<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut left_spans = Vec::new();
        let mut right_spans = Vec::new();

        if let Some(state) = self.state {
            left_spans.push(Span::styled(state, Style::default().fg(self.theme.subtext)));
        }

        for (i, hint) in self.hints.iter().enumerate() {
            if i > 0 {
                right_spans.push(Span::styled(" │ ", Style::default().fg(self.theme.muted)));
            }
            right_spans.push(Span::styled("[", Style::default().fg(self.theme.muted)));
            right_spans.push(Span::styled(&hint.key, Style::default().fg(self.theme.primary)));
            right_spans.push(Span::styled("] ", Style::default().fg(self.theme.muted)));
            right_spans.push(Span::styled(&hint.action, Style::default().fg(self.theme.subtext)));
        }

        let left_width: usize = left_spans.iter().map(Span::width).sum();
        let right_width: usize = right_spans.iter().map(Span::width).sum();
        let gap = usize::from(!left_spans.is_empty());
        let padding = (area.width as usize)
            .saturating_sub(left_width + right_width)
            .max(gap);
        if padding > 0 {
            left_spans.push(Span::raw(" ".repeat(padding)));
        }
        left_spans.extend(right_spans);

        let paragraph =
            Paragraph::new(Line::from(left_spans)).style(Style::default().bg(self.theme.surface));
        paragraph.render(area, buf);
    }
}
