//! Turning conversation messages into styled terminal lines.

use chrono::Local;
use ragchat_engine::{Conversation, Message, Sender};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::text::{render_literal, render_markdown, wrap_lines};
use crate::theme::Theme;

/// Frames of the typing indicator, advanced once per tick.
const TYPING_FRAMES: [&str; 4] = ["●∙∙", "∙●∙", "∙∙●", "∙●∙"];

/// Options shared by every message in one render.
#[derive(Debug, Clone, Copy)]
pub struct LineOptions<'a> {
    pub theme: &'a Theme,
    pub markdown: bool,
    pub tick: u64,
}

/// Lines for one message: a header, the body, and the sources line if any.
pub fn message_lines(message: &Message, opts: LineOptions<'_>) -> Vec<Line<'static>> {
    let theme = opts.theme;
    let (name, color) = match message.sender {
        Sender::User => ("You", theme.user),
        Sender::Bot => ("Assistant", theme.bot),
    };
    let time = message.timestamp.with_timezone(&Local).format("%H:%M");

    let mut lines = vec![Line::from(vec![
        Span::styled(name, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(format!("  {time}"), Style::default().fg(theme.muted)),
    ])];

    if message.is_placeholder() {
        lines.push(typing_indicator(theme, opts.tick));
        return lines;
    }

    let body = if opts.markdown {
        render_markdown(&message.text, theme)
    } else {
        render_literal(&message.text, theme)
    };
    lines.extend(body);

    if let Some(sources) = message.sources_line() {
        lines.push(Line::from(Span::styled(
            sources,
            Style::default()
                .fg(theme.subtext)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

fn typing_indicator(theme: &Theme, tick: u64) -> Line<'static> {
    // tick % 4 always fits in usize
    #[allow(clippy::cast_possible_truncation)]
    let frame = TYPING_FRAMES[(tick % TYPING_FRAMES.len() as u64) as usize];
    Line::from(vec![
        Span::styled(frame, Style::default().fg(theme.bot)),
        Span::styled(" thinking", Style::default().fg(theme.muted)),
    ])
}

/// All conversation lines wrapped to `width`, with a blank line between
/// messages.
pub fn conversation_lines(
    conversation: &Conversation,
    opts: LineOptions<'_>,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, message) in conversation.messages().iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        lines.extend(wrap_lines(message_lines(message, opts), width));
    }
    lines
}
