//! Test utilities for ragchat-tui rendering and key handling tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ragchat_engine::{ApiError, Backend, ChatReply, ChatRequest, SelectedFile, UploadReceipt};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

use crate::app::{App, AppOptions};
use crate::theme::Theme;

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Backend that answers every request the same way and counts calls.
#[derive(Debug, Default)]
pub struct MockBackend {
    /// Chunk count for uploads; `None` makes uploads fail with a 400.
    pub chunks: Option<u64>,
    pub chat_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
}

#[async_trait]
impl Backend for MockBackend {
    async fn upload(&self, _file: &SelectedFile) -> Result<UploadReceipt, ApiError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        match self.chunks {
            Some(chunks) => Ok(UploadReceipt {
                chunks,
                message: None,
            }),
            None => Err(ApiError::Server {
                status: 400,
                detail: Some("Bad PDF".into()),
            }),
        }
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ChatReply {
            answer: format!("echo: {}", request.message),
            sources: Some(vec!["doc.pdf".into()]),
        })
    }
}

/// Create a test terminal with the default dimensions (80x24).
pub fn create_test_terminal() -> Terminal<TestBackend> {
    create_test_terminal_sized(TEST_WIDTH, TEST_HEIGHT)
}

/// Create a test terminal with custom dimensions.
pub fn create_test_terminal_sized(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).expect("Failed to create test terminal")
}

/// Create a test app over a [`MockBackend`] whose uploads succeed.
pub fn create_test_app() -> App<MockBackend> {
    create_test_app_with(MockBackend {
        chunks: Some(5),
        ..MockBackend::default()
    })
}

/// Create a test app over the given backend.
pub fn create_test_app_with(backend: MockBackend) -> App<MockBackend> {
    App::new(
        Arc::new(backend),
        AppOptions {
            server_url: "http://127.0.0.1:8000".into(),
            render_markdown: true,
            theme: Theme::default(),
        },
    )
}

/// Type text into the app one key at a time.
pub fn type_text(app: &mut App<MockBackend>, text: &str) {
    for ch in text.chars() {
        let _ = app.handle_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
    }
}

/// Convert a buffer to a string, one line per row with trailing spaces trimmed.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            let cell = buffer.cell((x, y)).unwrap();
            result.push_str(cell.symbol());
        }
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;

    #[test]
    fn test_create_test_terminal() {
        let terminal = create_test_terminal();
        let size = terminal.size().unwrap();
        assert_eq!(size.width, TEST_WIDTH);
        assert_eq!(size.height, TEST_HEIGHT);
    }

    #[test]
    fn test_create_test_app() {
        let app = create_test_app();
        assert!(app.controller.conversation().is_empty());
        assert!(app.controller.input().is_focused());
    }

    #[test]
    fn test_buffer_to_string() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Hello", ratatui::style::Style::default());
        buffer.set_string(0, 1, "World", ratatui::style::Style::default());

        assert_eq!(buffer_to_string(&buffer), "Hello\nWorld\n");
    }
}
