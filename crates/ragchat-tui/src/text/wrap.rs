//! Wrapping styled Lines to a column width.

use ratatui::{
    style::Style,
    text::{Line, Span},
};

/// Wrap every Line to `width` columns, keeping span styles.
///
/// Blank lines are kept as blank lines. A width of zero disables wrapping.
pub fn wrap_lines(lines: Vec<Line<'static>>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return lines;
    }
    lines
        .into_iter()
        .flat_map(|line| wrap_line(line, width))
        .collect()
}

fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    if line.width() <= width {
        return vec![line];
    }

    let styled: Vec<(char, Style)> = line
        .spans
        .iter()
        .flat_map(|span| span.content.chars().map(move |ch| (ch, span.style)))
        .collect();
    let plain: String = styled.iter().map(|(ch, _)| ch).collect();

    let mut result = Vec::new();
    let mut pos = 0;

    for piece in textwrap::wrap(&plain, width) {
        // textwrap drops the whitespace it breaks on
        while pos < styled.len() && styled[pos].0.is_whitespace() && !piece.starts_with(styled[pos].0) {
            pos += 1;
        }

        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut run = String::new();
        let mut run_style: Option<Style> = None;

        for expected in piece.chars() {
            let Some(&(ch, style)) = styled.get(pos) else {
                run.push(expected);
                continue;
            };
            pos += 1;
            if run_style.is_some_and(|s| s != style) {
                spans.push(Span::styled(std::mem::take(&mut run), run_style.unwrap_or_default()));
            }
            run_style = Some(style);
            run.push(ch);
        }
        if !run.is_empty() {
            spans.push(Span::styled(run, run_style.unwrap_or_default()));
        }
        result.push(Line::from(spans));
    }

    if result.is_empty() {
        result.push(Line::default());
    }
    result
}
