//! ragchat-engine: Headless conversation engine for ragchat
//!
//! This crate provides the client-side logic for chatting with a document
//! backend, including:
//! - The conversation model (messages, loading placeholders, sources)
//! - Upload validation and status reporting
//! - The backend port and its reqwest adapter
//! - The conversation controller that sequences uploads and chat turns

pub mod api;
pub mod config;
pub mod controller;
pub mod input;
pub mod message;
pub mod upload;

// Re-export commonly used types
pub use api::{ApiError, Backend, ChatReply, ChatRequest, HttpBackend, UploadReceipt};
pub use config::{Config, ConfigError, RAGCHAT_DIR};
pub use controller::{
    ChatPhase, ConversationController, PendingChat, PendingUpload, CHAT_FAILURE_TEXT,
};
pub use input::InputState;
pub use message::{dedup_sources, Conversation, Message, MessageId, Sender};
pub use upload::{SelectedFile, StatusTone, UploadStatus, PDF_CONTENT_TYPE};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
