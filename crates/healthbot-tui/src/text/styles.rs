//! Markdown styling configuration.
//!
//! Replies are structured around `##` sections, bullet lists and the
//! occasional table, so those get the strongest accents.

use pulldown_cmark::HeadingLevel;
use ratatui::style::{Modifier, Style};

use crate::theme::Theme;

/// Styles for rendering markdown elements.
#[derive(Debug, Clone)]
pub struct MarkdownStyles {
    pub h1: Style,
    /// Section headings such as "Quick Summary".
    pub h2: Style,
    /// H3 and deeper.
    pub h3: Style,
    pub code: Style,
    pub code_block: Style,
    pub emphasis: Style,
    pub strong: Style,
    pub strikethrough: Style,
    /// Bullets, numbers and task boxes.
    pub list_marker: Style,
    pub link: Style,
    /// Quoted text and its bar.
    pub blockquote: Style,
    /// Body text.
    pub text: Style,
    /// Horizontal rules and table separators.
    pub rule: Style,
    pub table_header: Style,
}

impl MarkdownStyles {
    /// Create styles from a theme.
    pub fn from_theme(theme: &Theme) -> Self {
        let bold = Modifier::BOLD;
        Self {
            h1: Style::new().fg(theme.primary).add_modifier(bold | Modifier::UNDERLINED),
            h2: Style::new().fg(theme.primary).add_modifier(bold),
            h3: Style::new().fg(theme.secondary).add_modifier(bold),
            code: Style::new().fg(theme.secondary).bg(theme.surface),
            code_block: Style::new().fg(theme.secondary).bg(theme.surface),
            emphasis: Style::new().add_modifier(Modifier::ITALIC),
            strong: Style::new().add_modifier(bold),
            strikethrough: Style::new().add_modifier(Modifier::CROSSED_OUT),
            list_marker: Style::new().fg(theme.assistant),
            link: Style::new().fg(theme.info).add_modifier(Modifier::UNDERLINED),
            blockquote: Style::new().fg(theme.subtext).add_modifier(Modifier::ITALIC),
            text: Style::new().fg(theme.text),
            rule: Style::new().fg(theme.border),
            table_header: Style::new().fg(theme.primary).add_modifier(bold),
        }
    }

    /// Style for a heading of `level`.
    pub fn heading(&self, level: HeadingLevel) -> Style {
        match level {
            HeadingLevel::H1 => self.h1,
            HeadingLevel::H2 => self.h2,
            _ => self.h3,
        }
    }
}

impl Default for MarkdownStyles {
    fn default() -> Self {
        Self::from_theme(&Theme::default())
    }
}
