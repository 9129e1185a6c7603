//! Header line at the top of the TUI.
//!
//! Format: `● HealthBot │ AI Mental Health Chat Assistant │ model │ status`

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::Theme;

/// Application name shown in the header.
pub const APP_NAME: &str = "HealthBot";

/// Tagline shown next to the application name.
pub const TAGLINE: &str = "AI Mental Health Chat Assistant";

/// Connection state summarised in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStatus {
    Ready,
    Waiting,
    NotConfigured,
}

impl HeaderStatus {
    fn label(self) -> &'static str {
        match self {
            HeaderStatus::Ready => "ready",
            HeaderStatus::Waiting => "waiting for reply",
            HeaderStatus::NotConfigured => "not configured",
        }
    }
}

/// Header content.
#[derive(Debug, Clone)]
pub struct HeaderContent {
    pub title: String,
    pub tagline: String,
    /// Model or proxy endpoint label.
    pub model: Option<String>,
    pub status: Option<HeaderStatus>,
}

impl HeaderContent {
    /// Standard header with the given model label and status.
    pub fn new(model: impl Into<String>, status: HeaderStatus) -> Self {
        Self {
            title: APP_NAME.into(),
            tagline: TAGLINE.into(),
            model: Some(model.into()),
            status: Some(status),
        }
    }

    /// Create a "terminal too small" warning.
    pub fn too_small(min_width: u16, min_height: u16) -> Self {
        Self {
            title: "Warning".into(),
            tagline: format!("Terminal too small, resize to at least {min_width}x{min_height}"),
            model: None,
            status: None,
        }
    }
}

/// Header widget.
pub struct Header<'a> {
    content: &'a HeaderContent,
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(content: &'a HeaderContent, theme: &'a Theme) -> Self {
        Self { content, theme }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let separator = || Span::styled(" │ ", Style::default().fg(self.theme.muted));

        let mut spans = vec![
            Span::styled("● ", Style::default().fg(self.theme.primary)),
            Span::styled(
                &self.content.title,
                Style::default()
                    .fg(self.theme.text)
                    .add_modifier(Modifier::BOLD),
            ),
            separator(),
            Span::styled(&self.content.tagline, Style::default().fg(self.theme.subtext)),
        ];

        if let Some(ref model) = self.content.model {
            spans.push(separator());
            spans.push(Span::styled(model, Style::default().fg(self.theme.subtext)));
        }

        if let Some(status) = self.content.status {
            let color = match status {
                HeaderStatus::Ready => self.theme.primary,
                HeaderStatus::Waiting => self.theme.info,
                HeaderStatus::NotConfigured => self.theme.warning,
            };
            spans.push(separator());
            spans.push(Span::styled(status.label(), Style::default().fg(color)));
        }

        let paragraph =
            Paragraph::new(Line::from(spans)).style(Style::default().bg(self.theme.surface));
        paragraph.render(area, buf);
    }
}
