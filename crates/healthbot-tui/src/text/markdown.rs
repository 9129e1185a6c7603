//! Markdown rendering using pulldown-cmark.
//!
//! Provides [`render_markdown`] to convert markdown text to styled ratatui Lines.
//! Replies use the GitHub flavour: tables, strikethrough and task lists are on.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::Style,
    text::{Line, Span},
};

use crate::theme::Theme;

use super::styles::MarkdownStyles;

/// Width of a horizontal rule (`---`).
const RULE_WIDTH: usize = 32;

/// Separator between table cells.
const CELL_SEPARATOR: &str = " │ ";

/// Render markdown text to styled ratatui Lines.
///
/// Lines are not wrapped; pass the result through
/// [`wrap_lines`](super::wrap_lines) for the target width. Trailing blank
/// lines are removed.
pub fn render_markdown(input: &str, theme: &Theme) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(input, options);
    let styles = MarkdownStyles::from_theme(theme);

    let mut renderer = MarkdownRenderer::new(styles);
    renderer.run(parser);
    renderer.finish()
}

/// Cells collected for the table currently being rendered.
#[derive(Default)]
struct TableState {
    in_head: bool,
    row: Vec<Vec<Span<'static>>>,
}

/// Internal renderer that processes pulldown-cmark events.
struct MarkdownRenderer {
    /// Accumulated output lines.
    lines: Vec<Line<'static>>,
    /// Style configuration.
    styles: MarkdownStyles,
    /// Stack of active styles for nested formatting.
    style_stack: Vec<Style>,
    /// Current line being built.
    current_spans: Vec<Span<'static>>,
    /// One entry per open list: next number for ordered lists, None for bullets.
    list_stack: Vec<Option<u64>>,
    /// Whether we're inside a code block.
    in_code_block: bool,
    /// Blockquote nesting depth.
    quote_depth: usize,
    /// Pending list marker to prepend to next text.
    pending_list_marker: Option<String>,
    /// Task list checkbox state (Some(checked) if in task item).
    task_checkbox: Option<bool>,
    /// Set while inside a table.
    table: Option<TableState>,
}

impl MarkdownRenderer {
    fn new(styles: MarkdownStyles) -> Self {
        Self {
            lines: Vec::new(),
            styles,
            style_stack: Vec::new(),
            current_spans: Vec::new(),
            list_stack: Vec::new(),
            in_code_block: false,
            quote_depth: 0,
            pending_list_marker: None,
            task_checkbox: None,
            table: None,
        }
    }

    fn run<'a>(&mut self, parser: impl Iterator<Item = Event<'a>>) {
        for event in parser {
            self.handle_event(event);
        }
        self.flush_line();
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        while self.lines.last().is_some_and(is_blank) {
            self.lines.pop();
        }
        self.lines
    }

    #[allow(clippy::too_many_lines)]
    fn handle_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.flush_line();
                let style = self.styles.heading(level);
                self.style_stack.push(style);
            }
            Event::End(TagEnd::Heading(_)) => {
                self.flush_line();
                self.style_stack.pop();
            }

            Event::Start(Tag::Emphasis) => {
                self.style_stack.push(self.styles.emphasis);
            }
            Event::Start(Tag::Strong) => {
                self.style_stack.push(self.styles.strong);
            }
            Event::Start(Tag::Strikethrough) => {
                self.style_stack.push(self.styles.strikethrough);
            }
            Event::Start(Tag::Link { .. } | Tag::Image { .. }) => {
                self.style_stack.push(self.styles.link);
            }
            Event::End(
                TagEnd::Emphasis
                | TagEnd::Strong
                | TagEnd::Strikethrough
                | TagEnd::Link
                | TagEnd::Image,
            ) => {
                self.style_stack.pop();
            }

            Event::Start(Tag::CodeBlock(_)) => {
                self.flush_line();
                self.in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                self.flush_line();
                self.in_code_block = false;
                self.blank_line();
            }

            Event::Start(Tag::List(start)) => {
                self.flush_line();
                self.list_stack.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                self.flush_line();
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.blank_line();
                }
            }

            Event::Start(Tag::Item) => {
                self.flush_line();
                self.pending_list_marker = Some(self.next_list_marker());
            }
            Event::End(TagEnd::Item) => {
                self.flush_line();
                self.task_checkbox = None;
            }
            Event::TaskListMarker(checked) => {
                self.task_checkbox = Some(checked);
            }

            Event::Start(Tag::BlockQuote) => {
                self.flush_line();
                self.quote_depth += 1;
            }
            Event::End(TagEnd::BlockQuote) => {
                self.flush_line();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }

            Event::Start(Tag::Table(_)) => {
                self.flush_line();
                self.table = Some(TableState::default());
            }
            Event::Start(Tag::TableHead) => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = true;
                }
            }
            Event::End(TagEnd::TableHead) => {
                let width = self.flush_row();
                self.lines
                    .push(Line::from(Span::styled("─".repeat(width), self.styles.rule)));
                if let Some(table) = self.table.as_mut() {
                    table.in_head = false;
                }
            }
            Event::End(TagEnd::TableRow) => {
                self.flush_row();
            }
            Event::End(TagEnd::TableCell) => {
                let cell = std::mem::take(&mut self.current_spans);
                if let Some(table) = self.table.as_mut() {
                    table.row.push(cell);
                }
            }
            Event::End(TagEnd::Table) => {
                self.table = None;
                self.blank_line();
            }

            Event::Rule => {
                self.flush_line();
                self.lines.push(Line::from(Span::styled(
                    "─".repeat(RULE_WIDTH),
                    self.styles.rule,
                )));
                self.blank_line();
            }

            Event::End(TagEnd::Paragraph) => {
                self.flush_line();
                self.blank_line();
            }

            Event::Text(text) => {
                self.add_text(&text);
            }
            Event::Code(code) => {
                self.begin_inline();
                self.current_spans
                    .push(Span::styled(code.into_string(), self.styles.code));
            }

            Event::SoftBreak => {
                self.add_text(" ");
            }
            Event::HardBreak => {
                self.flush_line();
            }

            Event::Start(
                Tag::Paragraph
                | Tag::TableRow
                | Tag::TableCell
                | Tag::FootnoteDefinition(_)
                | Tag::MetadataBlock(_)
                | Tag::HtmlBlock,
            )
            | Event::End(
                TagEnd::FootnoteDefinition | TagEnd::MetadataBlock(_) | TagEnd::HtmlBlock,
            )
            | Event::Html(_)
            | Event::InlineHtml(_)
            | Event::FootnoteReference(_) => {}
        }
    }

    fn add_text(&mut self, text: &str) {
        if self.in_code_block {
            for line in text.lines() {
                let indent = "  ".repeat(self.list_stack.len());
                self.current_spans.push(Span::styled(
                    format!("{indent}  {line}"),
                    self.styles.code_block,
                ));
                self.flush_line();
            }
            return;
        }

        self.begin_inline();
        let style = self.current_style();
        self.current_spans.push(Span::styled(text.to_string(), style));
    }

    /// Emit list markers and quote bars owed before the first inline content.
    fn begin_inline(&mut self) {
        if let Some(marker) = self.pending_list_marker.take() {
            self.current_spans
                .push(Span::styled(marker, self.styles.list_marker));
            if let Some(checked) = self.task_checkbox.take() {
                let checkbox = if checked { "[x] " } else { "[ ] " };
                self.current_spans
                    .push(Span::styled(checkbox, self.styles.list_marker));
            }
        }

        if self.quote_depth > 0 && self.table.is_none() && self.current_spans.is_empty() {
            self.current_spans.push(Span::styled(
                "│ ".repeat(self.quote_depth),
                self.styles.blockquote,
            ));
        }
    }

    fn next_list_marker(&mut self) -> String {
        let indent = "  ".repeat(self.list_stack.len().saturating_sub(1));
        match self.list_stack.last_mut() {
            Some(Some(number)) => {
                let marker = format!("{indent}{number}. ");
                *number += 1;
                marker
            }
            _ => format!("{indent}• "),
        }
    }

    /// Write the collected table row as one line. Returns its width in chars.
    fn flush_row(&mut self) -> usize {
        let Some(table) = self.table.as_mut() else {
            return 0;
        };
        let cells = std::mem::take(&mut table.row);
        let header = table.in_head;

        let mut spans = Vec::new();
        for (i, cell) in cells.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(CELL_SEPARATOR, self.styles.rule));
            }
            for span in cell {
                if header {
                    spans.push(Span::styled(span.content, self.styles.table_header));
                } else {
                    spans.push(span);
                }
            }
        }

        let width = spans.iter().map(|s| s.content.chars().count()).sum();
        self.lines.push(Line::from(spans));
        width
    }

    fn current_style(&self) -> Style {
        let mut style = if self.quote_depth > 0 {
            self.styles.blockquote
        } else {
            self.styles.text
        };
        for s in &self.style_stack {
            style = style.patch(*s);
        }
        style
    }

    fn flush_line(&mut self) {
        if !self.current_spans.is_empty() {
            let spans = std::mem::take(&mut self.current_spans);
            self.lines.push(Line::from(spans));
        }
    }

    /// Push a separating blank line unless one is already there.
    fn blank_line(&mut self) {
        if self.lines.last().is_some_and(|l| !is_blank(l)) {
            self.lines.push(Line::from(""));
        }
    }
}

fn is_blank(line: &Line<'_>) -> bool {
    line.spans.iter().all(|s| s.content.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Modifier;

    fn render(md: &str) -> Vec<Line<'static>> {
        render_markdown(md, &Theme::default())
    }

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_render_simple_text() {
        assert_eq!(texts(&render("Hello, world!")), vec!["Hello, world!"]);
    }

    #[test]
    fn test_render_heading_is_bold() {
        let lines = render("## 🩺 Quick Summary");
        assert_eq!(texts(&lines)[0], "🩺 Quick Summary");
        assert!(lines[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_render_nested_formatting() {
        let lines = render("**bold and *italic* text**");
        let italic = lines[0]
            .spans
            .iter()
            .find(|s| s.content == "italic")
            .unwrap();
        assert!(italic.style.add_modifier.contains(Modifier::BOLD));
        assert!(italic.style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn test_render_inline_code() {
        let lines = render("Use `code` here");
        assert_eq!(texts(&lines), vec!["Use code here"]);
        let theme = Theme::default();
        assert_eq!(lines[0].spans[1].style.bg, Some(theme.surface));
    }

    #[test]
    fn test_render_code_block() {
        let lines = render("```rust\nfn main() {}\n```");
        assert_eq!(texts(&lines), vec!["  fn main() {}"]);
    }

    #[test]
    fn test_render_bullet_list() {
        assert_eq!(
            texts(&render("- Rest\n- Fluids")),
            vec!["• Rest", "• Fluids"]
        );
    }

    #[test]
    fn test_render_ordered_list_numbers() {
        assert_eq!(
            texts(&render("3. Third\n4. Fourth")),
            vec!["3. Third", "4. Fourth"]
        );
    }

    #[test]
    fn test_render_nested_list_indents() {
        assert_eq!(
            texts(&render("- Outer\n  - Inner")),
            vec!["• Outer", "  • Inner"]
        );
    }

    #[test]
    fn test_render_list_item_starting_with_code() {
        assert_eq!(texts(&render("- `ibuprofen` dose")), vec!["• ibuprofen dose"]);
    }

    #[test]
    fn test_render_checkbox() {
        assert_eq!(
            texts(&render("- [ ] Unchecked\n- [x] Checked")),
            vec!["• [ ] Unchecked", "• [x] Checked"]
        );
    }

    #[test]
    fn test_render_blockquote() {
        assert_eq!(texts(&render("> This is a quote")), vec!["│ This is a quote"]);
    }

    #[test]
    fn test_render_strikethrough() {
        let lines = render("~~gone~~");
        assert!(lines[0].spans[0]
            .style
            .add_modifier
            .contains(Modifier::CROSSED_OUT));
    }

    #[test]
    fn test_render_table() {
        let md = "| Option | Effect |\n|---|---|\n| Rest | Recovery |\n| Water | Hydration |";
        let lines = texts(&render(md));
        assert_eq!(
            lines,
            vec![
                "Option │ Effect",
                "───────────────",
                "Rest │ Recovery",
                "Water │ Hydration",
            ]
        );
    }

    #[test]
    fn test_render_rule() {
        let lines = texts(&render("above\n\n---\n\nbelow"));
        assert_eq!(lines[0], "above");
        assert!(lines.iter().any(|l| l == &"─".repeat(RULE_WIDTH)));
        assert_eq!(lines.last().map(String::as_str), Some("below"));
    }

    #[test]
    fn test_render_empty() {
        assert!(render("").is_empty());
    }

    #[test]
    fn test_render_multiple_paragraphs() {
        assert_eq!(
            texts(&render("First paragraph.\n\nSecond paragraph.")),
            vec!["First paragraph.", "", "Second paragraph."]
        );
    }

    #[test]
    fn test_render_plain_text_without_markup() {
        let lines = render("Just a sentence with no markup at all.");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans.len(), 1);
    }
}
