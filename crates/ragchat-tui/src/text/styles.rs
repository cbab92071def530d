//! Styles for markdown elements in message bodies.

use pulldown_cmark::HeadingLevel;
use ratatui::style::{Modifier, Style};

use crate::theme::Theme;

/// Styles for rendering markdown elements.
#[derive(Debug, Clone)]
pub struct MarkdownStyles {
    pub text: Style,
    pub heading: Style,
    pub subheading: Style,
    /// Inline code and code block lines.
    pub code: Style,
    pub emphasis: Style,
    pub strong: Style,
    pub strikethrough: Style,
    pub link: Style,
    pub blockquote: Style,
    /// Bullets, numbers, checkboxes and rules.
    pub marker: Style,
    /// Raw HTML, shown as typed.
    pub raw: Style,
}

impl MarkdownStyles {
    pub fn from_theme(theme: &Theme) -> Self {
        let text = Style::default().fg(theme.text);
        Self {
            text,
            heading: text.fg(theme.primary).add_modifier(Modifier::BOLD),
            subheading: text.add_modifier(Modifier::BOLD),
            code: Style::default().fg(theme.secondary).bg(theme.surface),
            emphasis: Style::default().add_modifier(Modifier::ITALIC),
            strong: Style::default().add_modifier(Modifier::BOLD),
            strikethrough: Style::default().add_modifier(Modifier::CROSSED_OUT),
            link: Style::default()
                .fg(theme.info)
                .add_modifier(Modifier::UNDERLINED),
            blockquote: Style::default()
                .fg(theme.subtext)
                .add_modifier(Modifier::ITALIC),
            marker: Style::default().fg(theme.muted),
            raw: Style::default().fg(theme.subtext),
        }
    }

    /// H1 stands out; every deeper level is just bold.
    pub fn for_heading(&self, level: HeadingLevel) -> Style {
        match level {
            HeadingLevel::H1 => self.heading,
            _ => self.subheading,
        }
    }
}
