//! Full-width input bar widget.
//!
//! Always visible at the bottom of the screen for text entry.
//! Supports multi-line input with Shift+Enter or Ctrl+J for newlines.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::TextInputState;
use crate::theme::Theme;

/// Columns taken by the `> ` prompt in front of each row.
const PROMPT_WIDTH: u16 = 2;

/// One cell of a display row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Glyph {
    Char(char),
    Cursor,
}

/// Columns left for text in a bar `width` columns wide.
fn text_width(width: u16) -> usize {
    usize::from(width.saturating_sub(2 + PROMPT_WIDTH)).max(1)
}

/// Split the buffer into display rows of at most `width` cells.
///
/// Buffer lines longer than `width` continue on the next row. The cursor
/// takes a cell of its own so it is never pushed out of view. Returns the
/// rows and the index of the row holding the cursor.
fn layout_rows(input: &TextInputState, width: usize) -> (Vec<Vec<Glyph>>, usize) {
    let mut rows = Vec::new();
    let mut cursor_row = 0;
    let mut line_start = 0;

    for line in input.content().split('\n') {
        let mut glyphs: Vec<Glyph> = line.chars().map(Glyph::Char).collect();
        let len = glyphs.len();
        if (line_start..=line_start + len).contains(&input.cursor) {
            glyphs.insert(input.cursor - line_start, Glyph::Cursor);
        }
        line_start += len + 1;

        if glyphs.is_empty() {
            rows.push(Vec::new());
            continue;
        }
        for chunk in glyphs.chunks(width) {
            if chunk.contains(&Glyph::Cursor) {
                cursor_row = rows.len();
            }
            rows.push(chunk.to_vec());
        }
    }

    (rows, cursor_row)
}

/// Rows the bar needs for `input` at `width` columns, borders included,
/// clamped to `min..=max`.
pub fn input_bar_height(input: &TextInputState, width: u16, min: u16, max: u16) -> u16 {
    let (rows, _) = layout_rows(input, text_width(width));
    u16::try_from(rows.len() + 2).unwrap_or(max).clamp(min, max)
}

/// Full-width input bar for text entry.
pub struct InputBar<'a> {
    input: &'a TextInputState,
    theme: &'a Theme,
    placeholder: &'a str,
    loading: bool,
    disabled: bool,
}

impl<'a> InputBar<'a> {
    /// Create a new input bar widget.
    pub fn new(input: &'a TextInputState, theme: &'a Theme) -> Self {
        Self {
            input,
            theme,
            placeholder: "",
            loading: false,
            disabled: false,
        }
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Show the waiting state instead of the buffer.
    #[must_use]
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Render the placeholder as a warning; the buffer is not editable.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Styled rows for the buffer and the index of the cursor row.
    fn build_input_lines(&self, width: usize) -> (Vec<Line<'static>>, usize) {
        let (rows, cursor_row) = layout_rows(self.input, width);
        let prompt_style = Style::default().fg(self.theme.primary);
        let text_style = Style::default().fg(self.theme.text);
        let cursor_style = Style::default()
            .fg(self.theme.primary)
            .add_modifier(Modifier::SLOW_BLINK);

        let lines = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                let prompt = if index == 0 { "> " } else { "  " };
                let mut spans = vec![Span::styled(prompt, prompt_style)];
                let mut run = String::new();
                for glyph in row {
                    match glyph {
                        Glyph::Char(ch) => run.push(ch),
                        Glyph::Cursor => {
                            if !run.is_empty() {
                                spans.push(Span::styled(std::mem::take(&mut run), text_style));
                            }
                            spans.push(Span::styled("█", cursor_style));
                        }
                    }
                }
                if !run.is_empty() {
                    spans.push(Span::styled(run, text_style));
                }
                Line::from(spans)
            })
            .collect();

        (lines, cursor_row)
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if !self.disabled && !self.loading {
            Style::default().fg(self.theme.border_focused)
        } else {
            Style::default().fg(self.theme.border)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner_height = area.height.saturating_sub(2) as usize;

        let paragraph = if self.loading {
            Paragraph::new(format!("● {}", self.placeholder))
                .block(block)
                .style(Style::default().fg(self.theme.info))
        } else if self.disabled {
            Paragraph::new(format!("! {}", self.placeholder))
                .block(block)
                .style(Style::default().fg(self.theme.warning))
        } else if self.input.is_empty() {
            let line = Line::from(vec![
                Span::styled("> ", Style::default().fg(self.theme.primary)),
                Span::styled("█", Style::default().fg(self.theme.primary)),
                Span::styled(self.placeholder, Style::default().fg(self.theme.muted)),
            ]);
            Paragraph::new(line).block(block)
        } else {
            let (lines, cursor_line) = self.build_input_lines(text_width(area.width));

            // Keep the cursor row visible
            let scroll_offset = if lines.len() <= inner_height {
                0
            } else {
                cursor_line.saturating_sub(inner_height.saturating_sub(1))
            };

            Paragraph::new(lines)
                .block(block)
                .scroll((u16::try_from(scroll_offset).unwrap_or(u16::MAX), 0))
        };

        paragraph.render(area, buf);
    }
}
