//! Status bar widget for the top of the TUI.
//!
//! Format: `● ragchat │ http://127.0.0.1:8000 │ ✓ Ready! (5 chunks)`

use ragchat_engine::{StatusTone, UploadStatus};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::text::truncate_to_width;
use crate::theme::Theme;

/// Shown before any upload has been attempted.
const NO_DOCUMENT_TEXT: &str = "No document uploaded";

/// Status bar widget.
pub struct StatusBar<'a> {
    server_url: &'a str,
    upload: Option<&'a UploadStatus>,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    /// Create a new status bar widget.
    pub fn new(server_url: &'a str, upload: Option<&'a UploadStatus>, theme: &'a Theme) -> Self {
        Self {
            server_url,
            upload,
            theme,
        }
    }

    fn tone_color(&self, tone: StatusTone) -> Color {
        match tone {
            StatusTone::Neutral => self.theme.warning,
            StatusTone::Success => self.theme.success,
            StatusTone::Error => self.theme.error,
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let separator = Span::styled(" │ ", Style::default().fg(self.theme.muted));
        let mut spans = vec![
            Span::styled("● ", Style::default().fg(self.theme.primary)),
            Span::styled("ragchat", Style::default().fg(self.theme.text)),
            separator.clone(),
            Span::styled(self.server_url, Style::default().fg(self.theme.subtext)),
            separator,
        ];

        let used: usize = spans.iter().map(Span::width).sum();
        let room = (area.width as usize).saturating_sub(used);

        let (text, color) = match self.upload {
            Some(status) => (status.text.as_str(), self.tone_color(status.tone)),
            None => (NO_DOCUMENT_TEXT, self.theme.muted),
        };
        spans.push(Span::styled(
            truncate_to_width(text, room),
            Style::default().fg(color),
        ));

        let paragraph =
            Paragraph::new(Line::from(spans)).style(Style::default().bg(self.theme.surface));
        paragraph.render(area, buf);
    }
}
