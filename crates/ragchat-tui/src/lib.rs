//! ragchat-tui: Terminal UI for the ragchat document chat client
//!
//! This crate provides the interactive layer for ragchat, including:
//! - The conversation pane with markdown rendering and a typing indicator
//! - Upload status bar and footer hints
//! - Slash commands (`/upload`, `/help`, `/quit`)
//! - The event loop that runs backend requests on tokio tasks

mod app;
pub mod commands;
mod conversation;
mod event;
mod render;
mod text;
mod theme;
mod widgets;

#[cfg(test)]
pub mod test_utils;

pub use app::{App, AppOptions, Request};
pub use event::{Action, Event, EventHandler};
pub use ragchat_engine;
pub use theme::{Theme, ThemeName};

use std::io::{self, stdout};
use std::sync::Arc;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ragchat_engine::{
    ApiError, Backend, ChatReply, Config, HttpBackend, PendingChat, PendingUpload, UploadReceipt,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application against the configured backend.
///
/// This is the main entry point for the TUI. It sets up the terminal,
/// runs the event loop, and restores the terminal on exit.
pub async fn run_tui(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let backend = Arc::new(HttpBackend::new(&config.server_url)?);
    let options = AppOptions {
        server_url: backend.base_url().to_string(),
        render_markdown: config.render_markdown,
        theme: Theme::by_name(&config.theme),
    };
    let mut app = App::new(backend, options);

    // Setup terminal with RAII guard for cleanup
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut events = EventHandler::new(config.tick_rate_ms);
    info!(server = %app.server_url, "TUI started");

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    // Restore cursor before guard drops
    terminal.show_cursor()?;

    result
}

async fn run_loop<B: Backend + 'static>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<B>,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut in_flight = InFlight::default();

    loop {
        terminal.draw(|frame| render::draw(frame, app))?;

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    if let Some(request) = app.handle_key(key) {
                        in_flight.start(app.controller.backend(), request);
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Tick => app.tick(),
                // Terminal will handle resize automatically
                Event::Resize(_, _) => {}
            }
        }

        in_flight.collect(app).await;

        if app.should_quit {
            in_flight.abort_all();
            break;
        }
    }

    Ok(())
}

type ChatTask = JoinHandle<Result<ChatReply, ApiError>>;
type UploadTask = JoinHandle<Result<UploadReceipt, ApiError>>;

/// Backend requests running on tokio tasks, paired with their pending state.
#[derive(Default)]
struct InFlight {
    chats: Vec<(PendingChat, ChatTask)>,
    uploads: Vec<(PendingUpload, UploadTask)>,
}

impl InFlight {
    /// Spawn the backend call for `request`.
    fn start<B: Backend + 'static>(&mut self, backend: Arc<B>, request: Request) {
        match request {
            Request::Chat(pending) => {
                let chat = pending.request().clone();
                let handle = tokio::spawn(async move { backend.chat(&chat).await });
                self.chats.push((pending, handle));
            }
            Request::Upload(pending) => {
                let file = pending.file().clone();
                debug!(file = %file.name, "Starting upload");
                let handle = tokio::spawn(async move { backend.upload(&file).await });
                self.uploads.push((pending, handle));
            }
        }
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.chats.is_empty() && self.uploads.is_empty()
    }

    /// Hand every finished request to the app. Unfinished ones are left alone.
    async fn collect<B: Backend>(&mut self, app: &mut App<B>) {
        let mut i = 0;
        while i < self.chats.len() {
            if self.chats[i].1.is_finished() {
                let (pending, handle) = self.chats.remove(i);
                app.finish_chat(pending, join_result(handle.await));
            } else {
                i += 1;
            }
        }

        let mut i = 0;
        while i < self.uploads.len() {
            if self.uploads[i].1.is_finished() {
                let (pending, handle) = self.uploads.remove(i);
                app.finish_upload(pending, join_result(handle.await));
            } else {
                i += 1;
            }
        }
    }

    fn abort_all(self) {
        for (_, handle) in self.chats {
            handle.abort();
        }
        for (_, handle) in self.uploads {
            handle.abort();
        }
    }
}

/// Flatten a task result; a panicked or cancelled task counts as a failure.
fn join_result<T>(
    joined: Result<Result<T, ApiError>, tokio::task::JoinError>,
) -> Result<T, ApiError> {
    joined.unwrap_or_else(|e| Err(ApiError::Task(e.to_string())))
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
