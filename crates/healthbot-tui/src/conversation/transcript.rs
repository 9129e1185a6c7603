//! Turns the visible conversation into styled, wrapped lines.

use healthbot_engine::{Conversation, Entry, Role};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::text::{render_markdown, wrap_lines};
use crate::theme::Theme;

/// Indent applied to message bodies under their role label.
const BODY_INDENT: &str = "  ";

/// Build the transcript for `conversation` at `width` columns.
///
/// The system message is skipped. While a request is in flight a
/// `Thinking` placeholder follows the last message; `tick` animates it.
pub fn transcript_lines(
    conversation: &Conversation,
    theme: &Theme,
    width: usize,
    tick: u64,
) -> Vec<Line<'static>> {
    let body_width = width.saturating_sub(BODY_INDENT.len()).max(1);
    let mut lines = Vec::new();

    for entry in conversation.entries() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.extend(entry_lines(entry, theme, body_width));
    }

    if conversation.is_in_flight() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(label_line(Role::Assistant.label(), theme.assistant));
        lines.push(Line::from(vec![
            Span::raw(BODY_INDENT),
            Span::styled(thinking_text(tick), Style::default().fg(theme.muted)),
        ]));
    }

    lines
}

/// `Thinking` followed by one to three dots, cycling with `tick`.
pub fn thinking_text(tick: u64) -> String {
    let dots = usize::try_from(tick % 3).unwrap_or(0) + 1;
    format!("Thinking{}", ".".repeat(dots))
}

fn entry_lines(entry: Entry<'_>, theme: &Theme, body_width: usize) -> Vec<Line<'static>> {
    let Entry { message, failed } = entry;
    let color = match message.role {
        _ if failed => theme.error,
        Role::User => theme.user,
        Role::Assistant | Role::System => theme.assistant,
    };

    let body = if failed {
        message
            .content
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(theme.error))))
            .collect()
    } else {
        render_markdown(&message.content, theme)
    };

    let mut lines = vec![label_line(message.role.label(), color)];
    for line in wrap_lines(body, body_width) {
        let mut spans = Vec::with_capacity(line.spans.len() + 1);
        spans.push(Span::raw(BODY_INDENT));
        spans.extend(line.spans);
        lines.push(Line::from(spans));
    }
    lines
}

fn label_line(label: &'static str, color: ratatui::style::Color) -> Line<'static> {
    Line::from(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}
