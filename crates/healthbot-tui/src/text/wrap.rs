//! Text wrapping for styled ratatui Lines.
//!
//! Wrap points come from `textwrap`; styles are carried over character by
//! character so a bold word split across two rows stays bold on both.

use ratatui::style::Style;
use ratatui::text::{Line, Span};

/// Wrap a vector of Lines to fit within the specified width.
/// Each line that exceeds the width will be split into multiple lines.
/// Styling is preserved across wrapped lines. Blank lines are kept.
pub fn wrap_lines(lines: Vec<Line<'static>>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return lines;
    }

    let mut result = Vec::with_capacity(lines.len());
    for line in lines {
        result.extend(wrap_line(line, width));
    }
    result
}

/// Wrap a single Line to fit within the specified width.
fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    let total_width: usize = line.spans.iter().map(|s| s.content.chars().count()).sum();
    if total_width <= width {
        return vec![line];
    }

    let styled: Vec<(char, Style)> = line
        .spans
        .iter()
        .flat_map(|span| span.content.chars().map(move |ch| (ch, span.style)))
        .collect();
    let plain: String = styled.iter().map(|(ch, _)| ch).collect();

    let mut result = Vec::new();
    let mut idx = 0;

    for row in textwrap::wrap(&plain, width) {
        // textwrap drops the whitespace at each break point
        while idx < styled.len() {
            let (ch, _) = styled[idx];
            if ch.is_whitespace() && !row.starts_with(ch) {
                idx += 1;
            } else {
                break;
            }
        }

        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut run = String::new();
        let mut run_style: Option<Style> = None;

        for expected in row.chars() {
            let (ch, style) = styled.get(idx).copied().unwrap_or((expected, Style::default()));
            idx += 1;

            match run_style {
                Some(s) if s != style => {
                    spans.push(Span::styled(std::mem::take(&mut run), s));
                    run_style = Some(style);
                }
                None => run_style = Some(style),
                Some(_) => {}
            }
            run.push(ch);
        }

        if !run.is_empty() {
            spans.push(Span::styled(run, run_style.unwrap_or_default()));
        }
        if !spans.is_empty() {
            result.push(Line::from(spans));
        }
    }

    if result.is_empty() {
        result.push(Line::from(""));
    }

    result
}
