//! Application state and update logic for the ragchat TUI.

use std::path::PathBuf;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use ragchat_engine::{
    ApiError, Backend, ChatReply, ConversationController, PendingChat, PendingUpload,
    SelectedFile, UploadReceipt,
};
use tracing::debug;

use crate::commands::{is_command, is_escaped_slash, parse_command, unescape_slash, Command};
use crate::conversation::{ScrollState, WHEEL_STEP};
use crate::event::{key_to_action, Action};
use crate::theme::Theme;

/// Ticks a notification stays visible.
const NOTIFICATION_TICKS: usize = 12;

/// Display settings taken from config and CLI flags.
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Backend base URL, shown in the status bar.
    pub server_url: String,
    /// Render message text as markdown.
    pub render_markdown: bool,
    /// Color palette.
    pub theme: Theme,
}

/// Work the event loop must start on a background task.
#[derive(Debug)]
pub enum Request {
    /// Send a chat message.
    Chat(PendingChat),
    /// Upload a document.
    Upload(PendingUpload),
}

/// Application state.
#[derive(Debug)]
pub struct App<B> {
    /// Conversation, upload status and input.
    pub controller: ConversationController<B>,

    /// Color palette.
    pub theme: Theme,

    /// Render message text as markdown.
    pub render_markdown: bool,

    /// Backend base URL.
    pub server_url: String,

    /// Message list scroll position.
    pub scroll: ScrollState,

    /// Whether the help overlay is visible.
    pub show_help: bool,

    /// Whether the app should quit.
    pub should_quit: bool,

    /// Transient message shown in the footer.
    pub notification: Option<String>,

    /// Ticks remaining until notification is cleared.
    notification_ttl: usize,

    /// Animation counter, advanced on every tick.
    pub tick_count: u64,
}

impl<B: Backend> App<B> {
    /// Create the app around a backend.
    pub fn new(backend: Arc<B>, options: AppOptions) -> Self {
        Self {
            controller: ConversationController::new(backend),
            theme: options.theme,
            render_markdown: options.render_markdown,
            server_url: options.server_url,
            scroll: ScrollState::new(),
            show_help: false,
            should_quit: false,
            notification: None,
            notification_ttl: 0,
            tick_count: 0,
        }
    }

    /// Set a temporary notification message.
    pub fn set_notification(&mut self, msg: impl Into<String>) {
        self.notification = Some(msg.into());
        self.notification_ttl = NOTIFICATION_TICKS;
    }

    /// Advance animations and expire the notification.
    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);

        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }
    }

    /// Handle a key press, returning any request to start.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Request> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }

        if key.code == KeyCode::F(1) {
            self.show_help = !self.show_help;
            return None;
        }

        if self.show_help {
            // Any of the usual dismiss keys closes the overlay; others are swallowed
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?' | 'q') | KeyCode::Enter) {
                self.show_help = false;
            }
            return None;
        }

        if self.controller.input().is_focused() {
            self.handle_input_key(key)
        } else {
            self.handle_action(key_to_action(key));
            None
        }
    }

    /// Handle an action while the input does not have focus.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.should_quit = true;
                }
            }
            Action::Help => self.show_help = !self.show_help,
            Action::Back => self.show_help = false,
            Action::Focus => self.controller.focus_input(),
            Action::Up => self.scroll.scroll_up(1),
            Action::Down => self.scroll.scroll_down(1),
            Action::PageUp => self.scroll.scroll_up(self.scroll.page()),
            Action::PageDown => self.scroll.scroll_down(self.scroll.page()),
            Action::Follow => self.scroll.follow_bottom(),
            Action::None => {}
        }
    }

    /// Scroll the message list with the mouse wheel.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll.scroll_up(WHEEL_STEP),
            MouseEventKind::ScrollDown => self.scroll.scroll_down(WHEEL_STEP),
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Option<Request> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if key.code == KeyCode::Enter {
            if ctrl {
                self.controller.input_mut().insert('\n');
                return None;
            }
            return self.submit();
        }

        // Other control chords have no meaning in the input
        if ctrl {
            return None;
        }

        let input = self.controller.input_mut();
        match key.code {
            KeyCode::Esc => self.controller.blur_input(),
            KeyCode::Char(c) => input.insert(c),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.move_home(),
            KeyCode::End => input.move_end(),
            KeyCode::Up => {
                if input.is_empty() || input.is_browsing_history() {
                    input.history_prev();
                } else {
                    self.scroll.scroll_up(1);
                }
            }
            KeyCode::Down => {
                if input.is_browsing_history() {
                    input.history_next();
                } else {
                    self.scroll.scroll_down(1);
                }
            }
            KeyCode::PageUp => self.scroll.scroll_up(self.scroll.page()),
            KeyCode::PageDown => self.scroll.scroll_down(self.scroll.page()),
            _ => {}
        }
        None
    }

    /// Act on the input content: run a slash command or start a chat turn.
    fn submit(&mut self) -> Option<Request> {
        let content = self.controller.input().content().to_string();

        if is_command(&content) {
            self.controller.input_mut().submit();
            return parse_command(&content).and_then(|command| self.run_command(command));
        }

        // The draft stays as typed until it is actually sent
        if !self.controller.send_enabled() && !content.trim().is_empty() {
            self.set_notification("Still waiting for the last reply");
            return None;
        }

        if is_escaped_slash(&content) {
            self.controller.input_mut().set_content(unescape_slash(&content));
        }

        let pending = self.controller.begin_chat()?;
        self.scroll.follow_bottom();
        Some(Request::Chat(pending))
    }

    fn run_command(&mut self, command: Command) -> Option<Request> {
        debug!(?command, "Slash command");
        match command {
            Command::Help => {
                self.show_help = true;
                None
            }
            Command::Quit => {
                self.should_quit = true;
                None
            }
            Command::Upload(None) => {
                self.set_notification("Usage: /upload <path>");
                None
            }
            Command::Upload(Some(path)) => {
                let file = SelectedFile::from_path(expand_home(&path));
                self.controller.begin_upload(file).map(Request::Upload)
            }
            Command::Unknown(name) => {
                self.set_notification(format!("Unknown command: /{name}"));
                None
            }
        }
    }

    /// Hand a finished chat request to the controller and show the reply.
    pub fn finish_chat(&mut self, pending: PendingChat, result: Result<ChatReply, ApiError>) {
        self.controller.finish_chat(pending, result);
        self.scroll.follow_bottom();
    }

    /// Hand a finished upload to the controller.
    pub fn finish_upload(
        &mut self,
        pending: PendingUpload,
        result: Result<UploadReceipt, ApiError>,
    ) {
        self.controller.finish_upload(pending, result);
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}
