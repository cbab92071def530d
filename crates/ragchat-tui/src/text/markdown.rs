//! Markdown rendering using pulldown-cmark.
//!
//! Provides [`render_markdown`] to convert message text to styled ratatui
//! Lines, and [`render_literal`] for when markdown rendering is turned off.
//! Raw HTML is never interpreted; it comes through as literal text.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::Style,
    text::{Line, Span},
};

use crate::theme::Theme;

use super::styles::MarkdownStyles;

/// Render markdown text to styled ratatui Lines.
///
/// Trailing blank lines are dropped so messages stack tightly.
pub fn render_markdown(input: &str, theme: &Theme) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(input, options);
    let styles = MarkdownStyles::from_theme(theme);

    let mut renderer = MarkdownRenderer::new(styles);
    renderer.run(parser);

    let mut lines = renderer.lines;
    while lines.last().is_some_and(|l| l.width() == 0) {
        lines.pop();
    }
    lines
}

/// Render text literally, one Line per input line, with no markup handling.
pub fn render_literal(input: &str, theme: &Theme) -> Vec<Line<'static>> {
    let style = Style::default().fg(theme.text);
    input
        .lines()
        .map(|line| Line::from(Span::styled(line.to_string(), style)))
        .collect()
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
    /// Open lists; `Some(n)` is an ordered list whose next item is `n`.
    list_stack: Vec<Option<u64>>,
    /// Whether we're inside a code block.
    in_code_block: bool,
    /// Whether we're inside a blockquote.
    in_blockquote: bool,
    /// Pending list marker to prepend to next text.
    pending_list_marker: Option<String>,
    /// Task list checkbox state (Some(checked) if in task item).
    task_checkbox: Option<bool>,
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
            in_blockquote: false,
            pending_list_marker: None,
            task_checkbox: None,
        }
    }

    fn run<'a>(&mut self, parser: impl Iterator<Item = Event<'a>>) {
        for event in parser {
            self.handle_event(event);
        }
        self.flush_line();
    }

    fn indent(&self) -> String {
        "  ".repeat(self.list_stack.len().saturating_sub(1))
    }

    #[allow(clippy::too_many_lines)]
    fn handle_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.flush_line();
                let style = self.styles.for_heading(level);
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
            Event::Start(Tag::Link { .. }) => {
                self.style_stack.push(self.styles.link);
            }
            Event::End(TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link) => {
                self.style_stack.pop();
            }

            Event::Start(Tag::CodeBlock(_)) => {
                self.flush_line();
                self.in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                self.flush_line();
                self.in_code_block = false;
                self.lines.push(Line::from(""));
            }

            Event::Start(Tag::List(start)) => {
                self.flush_line();
                self.list_stack.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.lines.push(Line::from(""));
                }
            }

            Event::Start(Tag::Item) => {
                self.flush_line();
                let indent = self.indent();
                let marker = match self.list_stack.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                self.pending_list_marker = Some(marker);
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
                self.in_blockquote = true;
            }
            Event::End(TagEnd::BlockQuote) => {
                self.flush_line();
                self.in_blockquote = false;
            }

            Event::End(TagEnd::Paragraph) => {
                self.flush_line();
                // Tight list items hold paragraphs; no gap inside lists
                if self.list_stack.is_empty() {
                    self.lines.push(Line::from(""));
                }
            }

            Event::Text(text) => {
                self.add_text(&text);
            }
            Event::Code(code) => {
                self.take_list_marker();
                self.current_spans
                    .push(Span::styled(format!("`{code}`"), self.styles.code));
            }

            // Shown verbatim, never interpreted
            Event::Html(html) | Event::InlineHtml(html) => {
                for (i, line) in html.lines().enumerate() {
                    if i > 0 {
                        self.flush_line();
                    }
                    self.take_list_marker();
                    self.current_spans
                        .push(Span::styled(line.to_string(), self.styles.raw));
                }
            }

            Event::SoftBreak => {
                self.add_text(" ");
            }
            Event::HardBreak => {
                self.flush_line();
            }
            Event::Rule => {
                self.flush_line();
                self.lines
                    .push(Line::from(Span::styled("─".repeat(24), self.styles.marker)));
            }

            Event::Start(
                Tag::Paragraph
                | Tag::Image { .. }
                | Tag::Table(_)
                | Tag::TableHead
                | Tag::TableRow
                | Tag::TableCell
                | Tag::FootnoteDefinition(_)
                | Tag::MetadataBlock(_)
                | Tag::HtmlBlock,
            )
            | Event::End(
                TagEnd::Image
                | TagEnd::Table
                | TagEnd::TableHead
                | TagEnd::TableRow
                | TagEnd::TableCell
                | TagEnd::FootnoteDefinition
                | TagEnd::MetadataBlock(_)
                | TagEnd::HtmlBlock,
            )
            | Event::FootnoteReference(_) => {}
        }
    }

    fn take_list_marker(&mut self) {
        if let Some(marker) = self.pending_list_marker.take() {
            self.current_spans
                .push(Span::styled(marker, self.styles.marker));
            if let Some(checked) = self.task_checkbox.take() {
                let checkbox = if checked { "[x] " } else { "[ ] " };
                self.current_spans
                    .push(Span::styled(checkbox, self.styles.marker));
            }
        }
    }

    fn add_text(&mut self, text: &str) {
        if self.in_code_block {
            let indent = self.indent();
            for line in text.lines() {
                self.current_spans.push(Span::styled(
                    format!("{indent}  {line}"),
                    self.styles.code,
                ));
                self.flush_line();
            }
            return;
        }

        self.take_list_marker();

        if self.in_blockquote && self.current_spans.is_empty() {
            self.current_spans
                .push(Span::styled("> ".to_string(), self.styles.blockquote));
        }

        let style = self.current_style();
        self.current_spans.push(Span::styled(text.to_string(), style));
    }

    fn current_style(&self) -> Style {
        let mut style = self.styles.text;
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
}
