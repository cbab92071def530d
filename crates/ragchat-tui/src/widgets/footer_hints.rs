//! Footer hints widget.
//!
//! Format: `Input │ notification            [Enter] send │ [F1] help`
//!
//! The left side names what has focus, or shows a transient notification.
//! The right side lists the keys that apply right now.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::commands::get_completions;
use crate::theme::Theme;

/// A single keybinding hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHint {
    /// The key or key combination (e.g., "Enter", "Ctrl+C").
    pub key: String,
    /// The action description (e.g., "send", "quit").
    pub action: String,
}

impl KeyHint {
    /// Create a new key hint.
    pub fn new(key: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
        }
    }
}

/// Footer hints widget.
pub struct FooterHints<'a> {
    hints: &'a [KeyHint],
    theme: &'a Theme,
    label: &'a str,
    notification: Option<&'a str>,
}

impl<'a> FooterHints<'a> {
    /// Create a new footer hints widget.
    pub fn new(hints: &'a [KeyHint], theme: &'a Theme) -> Self {
        Self {
            hints,
            theme,
            label: "",
            notification: None,
        }
    }

    /// Set the focus label shown on the left.
    #[must_use]
    pub fn label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }

    /// Set a notification to show after the label.
    #[must_use]
    pub fn notification(mut self, notification: Option<&'a str>) -> Self {
        self.notification = notification;
        self
    }
}

impl Widget for FooterHints<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let separator = || Span::styled(" │ ", Style::default().fg(self.theme.muted));

        let mut left_spans = vec![Span::styled(
            self.label,
            Style::default().fg(self.theme.primary),
        )];
        if let Some(note) = self.notification {
            left_spans.push(separator());
            left_spans.push(Span::styled(note, Style::default().fg(self.theme.warning)));
        }

        let mut right_spans = Vec::new();
        for (i, hint) in self.hints.iter().enumerate() {
            if i > 0 {
                right_spans.push(separator());
            }
            right_spans.push(Span::styled("[", Style::default().fg(self.theme.muted)));
            right_spans.push(Span::styled(&hint.key, Style::default().fg(self.theme.primary)));
            right_spans.push(Span::styled("] ", Style::default().fg(self.theme.muted)));
            right_spans.push(Span::styled(&hint.action, Style::default().fg(self.theme.subtext)));
        }

        let left_width: usize = left_spans.iter().map(Span::width).sum();
        let right_width: usize = right_spans.iter().map(Span::width).sum();
        let total_width = area.width as usize;

        // Notifications win over hints when space runs out
        if left_width + right_width <= total_width {
            left_spans.push(Span::raw(" ".repeat(total_width - left_width - right_width)));
            left_spans.extend(right_spans);
        }

        let paragraph =
            Paragraph::new(Line::from(left_spans)).style(Style::default().bg(self.theme.surface));
        paragraph.render(area, buf);
    }
}

/// Hints for the current input state.
///
/// While a slash command is being typed, matching commands replace the
/// usual hints.
#[must_use]
pub fn hints_for_state(focused: bool, draft: &str, send_enabled: bool) -> Vec<KeyHint> {
    if !focused {
        return vec![
            KeyHint::new("Enter", "type"),
            KeyHint::new("j/k", "scroll"),
            KeyHint::new("End", "follow"),
            KeyHint::new("?", "help"),
            KeyHint::new("q", "quit"),
        ];
    }

    if crate::commands::is_command(draft) {
        let matches = get_completions(draft);
        if !matches.is_empty() {
            return matches
                .into_iter()
                .map(|c| {
                    let key = match c.args {
                        Some(args) => format!("/{} {args}", c.name),
                        None => format!("/{}", c.name),
                    };
                    KeyHint::new(key, c.description)
                })
                .collect();
        }
    }

    let mut hints = Vec::new();
    if send_enabled {
        hints.push(KeyHint::new("Enter", "send"));
    }
    hints.push(KeyHint::new("Ctrl+Enter", "newline"));
    hints.push(KeyHint::new("/", "commands"));
    hints.push(KeyHint::new("F1", "help"));
    hints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    fn keys(hints: &[KeyHint]) -> Vec<&str> {
        hints.iter().map(|h| h.key.as_str()).collect()
    }

    #[test]
    fn test_focused_hints() {
        let hints = hints_for_state(true, "", true);
        assert_eq!(keys(&hints)[0], "Enter");
        assert!(keys(&hints).contains(&"F1"));
    }

    #[test]
    fn test_send_hint_hidden_while_waiting() {
        let hints = hints_for_state(true, "", false);
        assert!(!keys(&hints).contains(&"Enter"));
    }

    #[test]
    fn test_blurred_hints() {
        let hints = hints_for_state(false, "", true);
        assert!(keys(&hints).contains(&"q"));
    }

    #[test]
    fn test_command_completion_hints() {
        let hints = hints_for_state(true, "/up", true);
        assert_eq!(keys(&hints), vec!["/upload <path>"]);
    }

    #[test]
    fn test_render_right_aligned() {
        let theme = Theme::default();
        let hints = vec![KeyHint::new("F1", "help")];
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        FooterHints::new(&hints, &theme)
            .label("Input")
            .render(area, &mut buf);

        let text = buffer_to_string(&buf);
        assert!(text.starts_with("Input"));
        assert!(text.trim_end().ends_with("[F1] help"));
    }

    #[test]
    fn test_notification_shown() {
        let theme = Theme::default();
        let hints = FooterHints::new(&[], &theme);
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        hints
            .label("Input")
            .notification(Some("Unknown command: /nope"))
            .render(area, &mut buf);
        assert!(buffer_to_string(&buf).contains("Unknown command: /nope"));
    }
}
