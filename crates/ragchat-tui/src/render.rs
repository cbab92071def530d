//! Screen layout.
//!
//! Regions:
//! 1. Status bar (top, 1 line)
//! 2. Conversation pane (fills the rest)
//! 3. Footer hints (bottom, 1 line)

use ragchat_engine::Backend;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

use crate::app::App;
use crate::commands::COMMANDS;
use crate::conversation::ConversationPane;
use crate::theme::Theme;
use crate::widgets::{hints_for_state, FooterHints, StatusBar};

/// Minimum terminal width.
pub const MIN_WIDTH: u16 = 40;
/// Minimum terminal height.
pub const MIN_HEIGHT: u16 = 10;

const KEY_HELP: &[(&str, &str)] = &[
    ("Enter", "Send message"),
    ("Ctrl+Enter", "Insert newline"),
    ("Up/Down", "History (empty input) or scroll"),
    ("PgUp/PgDn", "Scroll a page"),
    ("Esc", "Leave input (then j/k scroll, q quit)"),
    ("End", "Jump to newest (outside input)"),
    ("F1", "Toggle this help"),
    ("Ctrl+C", "Quit"),
];

/// Draw the whole screen.
pub fn draw<B: Backend>(frame: &mut Frame<'_>, app: &mut App<B>) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        render_too_small(frame, &app.theme);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Min(0),    // Conversation
            Constraint::Length(1), // Footer hints
        ])
        .split(area);

    let controller = &app.controller;

    let status_bar = StatusBar::new(&app.server_url, controller.upload_status(), &app.theme);
    frame.render_widget(status_bar, chunks[0]);

    let pane = ConversationPane::new(controller.conversation(), controller.input(), &app.theme)
        .markdown(app.render_markdown)
        .send_enabled(controller.send_enabled())
        .tick(app.tick_count);
    frame.render_stateful_widget(pane, chunks[1], &mut app.scroll);

    let input = controller.input();
    let hints = hints_for_state(input.is_focused(), input.content(), controller.send_enabled());
    let label = if input.is_focused() { "Input" } else { "Scroll" };
    let footer = FooterHints::new(&hints, &app.theme)
        .label(label)
        .notification(app.notification.as_deref());
    frame.render_widget(footer, chunks[2]);

    if app.show_help {
        render_help_overlay(area, frame.buffer_mut(), &app.theme);
    }
}

fn render_too_small(frame: &mut Frame<'_>, theme: &Theme) {
    let area = frame.area();
    let line = Line::from(Span::styled(
        format!("Terminal too small (need {MIN_WIDTH}x{MIN_HEIGHT})"),
        Style::default().fg(theme.warning),
    ));
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(theme.surface)),
        area,
    );
}

/// Center a fixed-size rect within `area`.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Render the keys and commands overlay.
pub fn render_help_overlay(area: Rect, buf: &mut Buffer, theme: &Theme) {
    let key_style = Style::default().fg(theme.primary);
    let text_style = Style::default().fg(theme.text);
    let heading = Style::default()
        .fg(theme.subtext)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![Line::from(Span::styled("Keys", heading))];
    for (key, what) in KEY_HELP {
        lines.push(Line::from(vec![
            Span::styled(format!("  {key:<12}"), key_style),
            Span::styled(*what, text_style),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Commands", heading)));
    for cmd in COMMANDS {
        let usage = match cmd.args {
            Some(args) => format!("/{} {args}", cmd.name),
            None => format!("/{}", cmd.name),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {usage:<16}"), key_style),
            Span::styled(cmd.description, text_style),
        ]));
    }
    lines.push(Line::from(Span::styled(
        "  Start a message with // to send a literal /",
        Style::default().fg(theme.muted),
    )));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "[Esc to close]",
        Style::default().fg(theme.muted),
    )));

    let width = 62.min(area.width.saturating_sub(4));
    // Content plus borders
    let height = u16::try_from(lines.len() + 2)
        .unwrap_or(u16::MAX)
        .min(area.height.saturating_sub(2));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Help ")
        .title_style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.overlay));

    Paragraph::new(lines).block(block).render(overlay_area, buf);
}
