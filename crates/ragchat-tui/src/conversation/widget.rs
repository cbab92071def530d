//! Conversation pane widget.
//!
//! Combines the message list (scrollable) with an input area at the bottom.

use ragchat_engine::{Conversation, InputState};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    symbols::line,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};

use crate::theme::Theme;

use super::lines::{conversation_lines, LineOptions};
use super::placeholder::input_placeholder;
use super::scroll::ScrollState;

/// Fixed height for the input area (in lines).
const INPUT_HEIGHT: u16 = 3;

/// Height for the divider line.
const DIVIDER_HEIGHT: u16 = 1;

/// Shown while the conversation is empty.
const EMPTY_TEXT: &str = "Upload a PDF with /upload <path>, then ask about it.";

/// Conversation pane widget combining messages and input.
///
/// ```text
/// ┌─ Conversation ──────────────────────┐
/// │ You  14:02                           │
/// │ What does section 3 cover?           │
/// │                                      │
/// │ Assistant  14:02                     │
/// │ Section 3 covers pricing...          │
/// │ Sources: report.pdf                  │
/// ├──────────────────────────────────────┤
/// │ > Ask a question about your docu...  │
/// └──────────────────────────────────────┘
/// ```
pub struct ConversationPane<'a> {
    conversation: &'a Conversation,
    input: &'a InputState,
    theme: &'a Theme,
    markdown: bool,
    send_enabled: bool,
    tick: u64,
}

impl<'a> ConversationPane<'a> {
    /// Create a new conversation pane.
    pub fn new(conversation: &'a Conversation, input: &'a InputState, theme: &'a Theme) -> Self {
        Self {
            conversation,
            input,
            theme,
            markdown: true,
            send_enabled: true,
            tick: 0,
        }
    }

    /// Render message text as markdown (default) or literally.
    #[must_use]
    pub fn markdown(mut self, markdown: bool) -> Self {
        self.markdown = markdown;
        self
    }

    /// Whether sending is currently possible (affects placeholder text).
    #[must_use]
    pub fn send_enabled(mut self, enabled: bool) -> Self {
        self.send_enabled = enabled;
        self
    }

    /// Animation tick for the typing indicator.
    #[must_use]
    pub fn tick(mut self, tick: u64) -> Self {
        self.tick = tick;
        self
    }

    fn render_messages(&self, area: Rect, buf: &mut Buffer, scroll: &mut ScrollState) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        if self.conversation.is_empty() {
            let line = Line::from(Span::styled(EMPTY_TEXT, Style::default().fg(self.theme.muted)));
            Paragraph::new(line).render(
                Rect::new(area.x, area.y + area.height / 2, area.width, 1),
                buf,
            );
            return;
        }

        let opts = LineOptions {
            theme: self.theme,
            markdown: self.markdown,
            tick: self.tick,
        };
        let lines = conversation_lines(self.conversation, opts, area.width as usize);
        let top = scroll.resolve(lines.len(), area.height as usize);

        let visible: Vec<Line<'static>> = lines
            .into_iter()
            .skip(top)
            .take(area.height as usize)
            .collect();
        Paragraph::new(visible).render(area, buf);
    }

    /// Render the input area.
    fn render_input(&self, area: Rect, buf: &mut Buffer) {
        let prompt = "> ";
        let focused = self.input.is_focused();
        let text_style = Style::default().fg(self.theme.text);
        let prompt_style = Style::default().fg(if focused {
            self.theme.primary
        } else {
            self.theme.muted
        });

        if self.input.is_empty() {
            let mut spans = vec![Span::styled(prompt, prompt_style)];
            if focused && self.send_enabled {
                spans.push(Span::styled("_", text_style));
            }
            spans.push(Span::styled(
                input_placeholder(self.send_enabled, focused),
                Style::default().fg(self.theme.muted),
            ));
            Paragraph::new(Line::from(spans)).render(area, buf);
            return;
        }

        let cursor_pos = self.input.cursor();
        let mut lines: Vec<Line<'_>> = Vec::new();
        let mut spans: Vec<Span<'_>> = vec![Span::styled(prompt, prompt_style)];
        let mut cursor_drawn = false;

        for (i, ch) in self.input.content().chars().enumerate() {
            if focused && i == cursor_pos {
                spans.push(Span::styled("|", text_style));
                cursor_drawn = true;
            }
            if ch == '\n' {
                lines.push(Line::from(std::mem::take(&mut spans)));
                // Continuation lines align under the text
                spans.push(Span::raw(" ".repeat(prompt.len())));
            } else {
                spans.push(Span::styled(ch.to_string(), text_style));
            }
        }
        if focused && !cursor_drawn {
            spans.push(Span::styled("_", text_style));
        }
        lines.push(Line::from(spans));

        // Keep the cursor's line in view when the draft outgrows the box
        let height = area.height as usize;
        let skip = lines.len().saturating_sub(height);
        let lines: Vec<Line<'_>> = lines.into_iter().skip(skip).collect();
        Paragraph::new(lines).render(area, buf);
    }

    /// Render a horizontal divider line.
    fn render_divider(&self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 {
            return;
        }
        let line = Line::from(Span::styled(
            line::HORIZONTAL.repeat(area.width as usize),
            Style::default().fg(self.theme.border),
        ));
        Paragraph::new(line).render(area, buf);
    }
}

impl StatefulWidget for ConversationPane<'_> {
    type State = ScrollState;

    fn render(self, area: Rect, buf: &mut Buffer, scroll: &mut ScrollState) {
        let border_style = if self.input.is_focused() {
            Style::default().fg(self.theme.border_focused)
        } else {
            Style::default().fg(self.theme.border)
        };

        let title = if scroll.is_following() {
            " Conversation ".to_string()
        } else {
            format!(" Conversation (↑{}) ", scroll.offset())
        };

        let block = Block::default()
            .title(title)
            .title_style(Style::default().fg(self.theme.text))
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(self.theme.base));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < INPUT_HEIGHT + DIVIDER_HEIGHT + 1 {
            // Not enough space - just show input
            self.render_input(inner, buf);
            return;
        }

        let messages_height = inner.height - INPUT_HEIGHT - DIVIDER_HEIGHT;
        let divider_y = inner.y + messages_height;
        let input_y = divider_y + DIVIDER_HEIGHT;

        let messages_area = Rect::new(inner.x, inner.y, inner.width, messages_height);
        let divider_area = Rect::new(inner.x, divider_y, inner.width, DIVIDER_HEIGHT);
        let input_area = Rect::new(inner.x, input_y, inner.width, INPUT_HEIGHT);

        self.render_messages(messages_area, buf, scroll);
        self.render_divider(divider_area, buf);
        self.render_input(input_area, buf);
    }
}
