//! Conversation controller.
//!
//! [`ConversationController`] owns everything the user sees: the message
//! list, the upload status line, the chat input and the send control. Both
//! flows are split in two so a UI can keep drawing while the request runs:
//!
//! - [`begin_chat`](ConversationController::begin_chat) /
//!   [`finish_chat`](ConversationController::finish_chat)
//! - [`begin_upload`](ConversationController::begin_upload) /
//!   [`finish_upload`](ConversationController::finish_upload)
//!
//! [`send`](ConversationController::send) and
//! [`upload`](ConversationController::upload) run a whole flow in place.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::{ApiError, Backend, ChatReply, ChatRequest, UploadReceipt};
use crate::input::InputState;
use crate::message::{Conversation, Message, MessageId};
use crate::upload::{SelectedFile, UploadStatus};

/// Bot reply shown when a chat request fails for any reason.
pub const CHAT_FAILURE_TEXT: &str = "Sorry, I encountered an error connecting to the server.";

/// Chat request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatPhase {
    /// Ready to send.
    #[default]
    Idle,
    /// A request is outstanding; its placeholder is in the conversation.
    AwaitingResponse(MessageId),
}

/// A chat request that has been started but not finished.
#[derive(Debug, Clone)]
#[must_use = "a started chat must be finished to re-enable sending"]
pub struct PendingChat {
    placeholder: MessageId,
    request: ChatRequest,
}

impl PendingChat {
    /// Id of the loading placeholder standing in for the reply.
    pub fn placeholder(&self) -> MessageId {
        self.placeholder
    }

    /// The request to send.
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }
}

/// An upload that passed validation and awaits its response.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    file: SelectedFile,
}

impl PendingUpload {
    /// The file being uploaded.
    pub fn file(&self) -> &SelectedFile {
        &self.file
    }
}

/// Owns conversation state and mediates between the UI and the backend.
#[derive(Debug)]
pub struct ConversationController<B> {
    backend: Arc<B>,
    conversation: Conversation,
    upload_status: Option<UploadStatus>,
    input: InputState,
    phase: ChatPhase,
}

impl<B: Backend> ConversationController<B> {
    /// Create a controller with an empty conversation.
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            conversation: Conversation::new(),
            upload_status: None,
            input: InputState::new(),
            phase: ChatPhase::Idle,
        }
    }

    /// Shared handle to the backend, for running requests off the UI task.
    pub fn backend(&self) -> Arc<B> {
        Arc::clone(&self.backend)
    }

    /// The message list.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Status of the most recent upload attempt.
    pub fn upload_status(&self) -> Option<&UploadStatus> {
        self.upload_status.as_ref()
    }

    /// The chat input field.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Mutable access to the chat input field.
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Current chat phase.
    pub fn phase(&self) -> ChatPhase {
        self.phase
    }

    /// Whether the send control is enabled.
    pub fn send_enabled(&self) -> bool {
        self.phase == ChatPhase::Idle
    }

    /// Give the input field focus.
    pub fn focus_input(&mut self) {
        self.input.set_focused(true);
    }

    /// Take focus away from the input field.
    pub fn blur_input(&mut self) {
        self.input.set_focused(false);
    }

    /// Start a chat turn from the input field.
    ///
    /// Returns `None` (and changes nothing) when sending is disabled or the
    /// trimmed input is empty.
    pub fn begin_chat(&mut self) -> Option<PendingChat> {
        if !self.send_enabled() {
            return None;
        }

        let text = self.input.content().trim().to_string();
        if text.is_empty() {
            return None;
        }

        self.input.submit();
        self.conversation.push(Message::user(text.clone()));
        let placeholder = self.conversation.push_placeholder();
        self.phase = ChatPhase::AwaitingResponse(placeholder);

        debug!(placeholder = %placeholder, "Chat turn started");

        Some(PendingChat {
            placeholder,
            request: ChatRequest::new(text),
        })
    }

    /// Complete a chat turn with the backend's result.
    pub fn finish_chat(&mut self, pending: PendingChat, result: Result<ChatReply, ApiError>) {
        self.conversation.remove(pending.placeholder);

        let reply = match result {
            Ok(reply) => {
                let ChatReply { answer, sources } = reply;
                Message::bot(answer, sources.unwrap_or_default())
            }
            Err(e) => {
                warn!(error = %e, "Chat request failed");
                Message::bot(CHAT_FAILURE_TEXT, Vec::<String>::new())
            }
        };
        self.conversation.push(reply);

        self.phase = ChatPhase::Idle;
        self.input.set_focused(true);
    }

    /// Run a whole chat turn. Returns whether a request was made.
    pub async fn send(&mut self) -> bool {
        let Some(pending) = self.begin_chat() else {
            return false;
        };
        let result = self.backend.chat(pending.request()).await;
        self.finish_chat(pending, result);
        true
    }

    /// Validate `file` and mark the upload as in progress.
    ///
    /// Non-PDF files are rejected here with an error status and `None`.
    pub fn begin_upload(&mut self, file: SelectedFile) -> Option<PendingUpload> {
        if !file.is_pdf() {
            debug!(file = %file.name, content_type = %file.content_type, "Rejected non-PDF upload");
            self.upload_status = Some(UploadStatus::not_pdf());
            return None;
        }

        self.upload_status = Some(UploadStatus::processing());
        Some(PendingUpload { file })
    }

    /// Record the outcome of an upload.
    pub fn finish_upload(
        &mut self,
        pending: PendingUpload,
        result: Result<UploadReceipt, ApiError>,
    ) {
        let status = match result {
            Ok(receipt) => {
                info!(
                    file = %pending.file.name,
                    chunks = receipt.chunks,
                    message = receipt.message.as_deref().unwrap_or_default(),
                    "Document processed"
                );
                UploadStatus::ready(receipt.chunks)
            }
            Err(e) => {
                warn!(file = %pending.file.name, error = %e, "Upload failed");
                upload_error_status(&pending.file, &e)
            }
        };
        self.upload_status = Some(status);
    }

    /// Run a whole upload and return the resulting status.
    pub async fn upload(&mut self, file: SelectedFile) -> UploadStatus {
        if let Some(pending) = self.begin_upload(file) {
            let result = self.backend.upload(pending.file()).await;
            self.finish_upload(pending, result);
        }
        self.upload_status
            .clone()
            .unwrap_or_else(UploadStatus::connect_error)
    }
}

fn upload_error_status(file: &SelectedFile, error: &ApiError) -> UploadStatus {
    match error {
        ApiError::Server { detail, .. } => UploadStatus::server_error(detail.as_deref()),
        ApiError::Malformed(_) => UploadStatus::server_error(None),
        ApiError::ReadFile { .. } => UploadStatus::read_error(&file.name),
        ApiError::InvalidUrl(_) | ApiError::Transport(_) | ApiError::Task(_) => {
            UploadStatus::connect_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Sender;
    use crate::upload::StatusTone;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scripted outcome for a mock call.
    enum Outcome<T> {
        Ok(T),
        Server(u16, Option<&'static str>),
        Malformed,
        Unreachable,
    }

    impl<T> Outcome<T> {
        fn into_result(self) -> Result<T, ApiError> {
            match self {
                Outcome::Ok(v) => Ok(v),
                Outcome::Server(status, detail) => Err(ApiError::Server {
                    status,
                    detail: detail.map(String::from),
                }),
                Outcome::Malformed => Err(ApiError::Malformed(
                    serde_json::from_str::<ChatReply>("{}").unwrap_err(),
                )),
                Outcome::Unreachable => Err(ApiError::Task("connection refused".into())),
            }
        }
    }

    #[derive(Default)]
    struct MockBackend {
        chats: Mutex<VecDeque<Outcome<ChatReply>>>,
        uploads: Mutex<VecDeque<Outcome<UploadReceipt>>>,
        chat_calls: AtomicUsize,
        upload_calls: AtomicUsize,
    }

    impl MockBackend {
        fn with_chat(outcome: Outcome<ChatReply>) -> Self {
            let backend = Self::default();
            backend.chats.lock().unwrap().push_back(outcome);
            backend
        }

        fn with_upload(outcome: Outcome<UploadReceipt>) -> Self {
            let backend = Self::default();
            backend.uploads.lock().unwrap().push_back(outcome);
            backend
        }
    }

    #[async_trait]
    impl Backend for MockBackend {
        async fn upload(&self, _file: &SelectedFile) -> Result<UploadReceipt, ApiError> {
            self.upload_calls.fetch_add(1, Ordering::SeqCst);
            self.uploads
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Outcome::Unreachable)
                .into_result()
        }

        async fn chat(&self, _request: &ChatRequest) -> Result<ChatReply, ApiError> {
            self.chat_calls.fetch_add(1, Ordering::SeqCst);
            self.chats
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Outcome::Unreachable)
                .into_result()
        }
    }

    fn controller(backend: MockBackend) -> (ConversationController<MockBackend>, Arc<MockBackend>) {
        let backend = Arc::new(backend);
        (ConversationController::new(Arc::clone(&backend)), backend)
    }

    fn reply(answer: &str, sources: &[&str]) -> ChatReply {
        ChatReply {
            answer: answer.into(),
            sources: Some(sources.iter().map(|s| (*s).to_string()).collect()),
        }
    }

    // ========================================================================
    // Upload flow
    // ========================================================================

    #[tokio::test]
    async fn test_non_pdf_rejected_without_network_call() {
        let (mut ctl, backend) = controller(MockBackend::default());

        for name in ["notes.txt", "photo.png", "archive", "report.pdf.zip"] {
            let status = ctl.upload(SelectedFile::from_path(name)).await;
            assert_eq!(status, UploadStatus::not_pdf(), "{name} should be rejected");
        }

        assert_eq!(backend.upload_calls.load(Ordering::SeqCst), 0);
        assert!(ctl.conversation().is_empty());
    }

    #[tokio::test]
    async fn test_upload_success_reports_chunks() {
        let (mut ctl, backend) = controller(MockBackend::with_upload(Outcome::Ok(UploadReceipt {
            chunks: 5,
            message: Some("Successfully processed doc.pdf".into()),
        })));

        let status = ctl.upload(SelectedFile::from_path("doc.pdf")).await;

        assert_eq!(status.tone, StatusTone::Success);
        assert!(status.text.contains('5'));
        assert_eq!(backend.upload_calls.load(Ordering::SeqCst), 1);
        assert!(ctl.conversation().is_empty());
    }

    #[test]
    fn test_upload_shows_processing_while_in_flight() {
        let (mut ctl, _) = controller(MockBackend::default());
        let pending = ctl.begin_upload(SelectedFile::from_path("doc.pdf"));

        assert!(pending.is_some());
        assert_eq!(ctl.upload_status(), Some(&UploadStatus::processing()));
    }

    #[tokio::test]
    async fn test_upload_server_detail_is_surfaced() {
        let (mut ctl, _) = controller(MockBackend::with_upload(Outcome::Server(
            500,
            Some("Error processing file: bad xref"),
        )));

        let status = ctl.upload(SelectedFile::from_path("doc.pdf")).await;
        assert_eq!(status.text, "Error: Error processing file: bad xref");
        assert!(status.is_error());
    }

    #[tokio::test]
    async fn test_upload_failure_fallbacks() {
        let (mut ctl, _) = controller(MockBackend::with_upload(Outcome::Server(500, None)));
        let status = ctl.upload(SelectedFile::from_path("doc.pdf")).await;
        assert_eq!(status.text, "Error: Upload failed.");

        let (mut ctl, _) = controller(MockBackend::with_upload(Outcome::Malformed));
        let status = ctl.upload(SelectedFile::from_path("doc.pdf")).await;
        assert_eq!(status.text, "Error: Upload failed.");

        let (mut ctl, _) = controller(MockBackend::with_upload(Outcome::Unreachable));
        let status = ctl.upload(SelectedFile::from_path("doc.pdf")).await;
        assert_eq!(status.text, "Error: Could not connect to server.");
    }

    #[test]
    fn test_unreadable_file_status() {
        let (mut ctl, _) = controller(MockBackend::default());
        let pending = ctl.begin_upload(SelectedFile::from_path("missing.pdf")).unwrap();
        let err = ApiError::ReadFile {
            path: "missing.pdf".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        ctl.finish_upload(pending, Err(err));

        assert_eq!(
            ctl.upload_status().map(|s| s.text.as_str()),
            Some("Error: Could not read missing.pdf.")
        );
    }

    // ========================================================================
    // Chat flow
    // ========================================================================

    #[tokio::test]
    async fn test_whitespace_input_is_noop() {
        let (mut ctl, backend) = controller(MockBackend::default());
        ctl.input_mut().insert_str("  ");

        assert!(!ctl.send().await);
        assert!(ctl.conversation().is_empty());
        assert_eq!(backend.chat_calls.load(Ordering::SeqCst), 0);
        assert!(ctl.send_enabled());
    }

    #[test]
    fn test_begin_chat_appends_user_and_placeholder() {
        let (mut ctl, _) = controller(MockBackend::default());
        ctl.input_mut().insert_str("  What is in chapter 2?  ");

        let pending = ctl.begin_chat().unwrap();

        let messages = ctl.conversation().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[0].text, "What is in chapter 2?");
        assert_eq!(messages[1].id, Some(pending.placeholder()));
        assert_eq!(pending.request().message, "What is in chapter 2?");
        assert!(ctl.input().is_empty());
        assert!(!ctl.send_enabled());
        assert_eq!(ctl.phase(), ChatPhase::AwaitingResponse(pending.placeholder()));
    }

    #[tokio::test]
    async fn test_successful_chat_replaces_placeholder() {
        let (mut ctl, backend) = controller(MockBackend::with_chat(Outcome::Ok(reply(
            "It covers **ownership**.",
            &["book.pdf (Page 2)"],
        ))));
        ctl.input_mut().insert_str("What is in chapter 2?");

        assert!(ctl.send().await);

        let convo = ctl.conversation();
        assert_eq!(convo.len(), 2);
        assert_eq!(convo.placeholder_count(), 0);
        let bot = convo.last().unwrap();
        assert_eq!(bot.sender, Sender::Bot);
        assert_eq!(bot.text, "It covers **ownership**.");
        assert_eq!(bot.sources, vec!["book.pdf (Page 2)"]);
        assert_eq!(backend.chat_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_chat_sources_are_deduplicated() {
        let (mut ctl, _) = controller(MockBackend::with_chat(Outcome::Ok(reply(
            "answer",
            &["a", "b", "a", "c"],
        ))));
        ctl.input_mut().insert_str("q");
        ctl.send().await;

        let bot = ctl.conversation().last().unwrap();
        assert_eq!(bot.sources_line().as_deref(), Some("Sources: a, b, c"));
    }

    #[tokio::test]
    async fn test_chat_failures_use_fallback_text() {
        for outcome in [
            Outcome::Unreachable,
            Outcome::Server(500, Some("RAG Engine not initialized")),
            Outcome::Malformed,
        ] {
            let (mut ctl, _) = controller(MockBackend::with_chat(outcome));
            ctl.input_mut().insert_str("hello");
            ctl.send().await;

            let convo = ctl.conversation();
            assert_eq!(convo.len(), 2);
            assert_eq!(convo.placeholder_count(), 0);
            let bot = convo.last().unwrap();
            assert_eq!(bot.text, CHAT_FAILURE_TEXT);
            assert!(bot.sources.is_empty());
            assert!(ctl.send_enabled());
        }
    }

    #[tokio::test]
    async fn test_focus_and_send_restored_after_any_outcome() {
        for outcome in [Outcome::Ok(reply("ok", &[])), Outcome::Unreachable] {
            let (mut ctl, _) = controller(MockBackend::with_chat(outcome));
            ctl.input_mut().insert_str("hello");
            ctl.blur_input();

            ctl.send().await;

            assert!(ctl.input().is_focused());
            assert!(ctl.send_enabled());
            assert_eq!(ctl.phase(), ChatPhase::Idle);
        }
    }

    #[test]
    fn test_second_send_blocked_while_awaiting() {
        // No timeout: a request that never resolves keeps sending disabled.
        let (mut ctl, _) = controller(MockBackend::default());
        ctl.input_mut().insert_str("first");
        let _pending = ctl.begin_chat().unwrap();

        ctl.input_mut().insert_str("second");
        assert!(ctl.begin_chat().is_none());
        assert_eq!(ctl.conversation().placeholder_count(), 1);
        assert_eq!(ctl.input().content(), "second");
    }

    #[tokio::test]
    async fn test_upload_and_chat_overlap() {
        let backend = MockBackend::with_chat(Outcome::Ok(reply("hi", &[])));
        backend.uploads.lock().unwrap().push_back(Outcome::Ok(UploadReceipt {
            chunks: 3,
            message: None,
        }));
        let (mut ctl, _) = controller(backend);

        let upload = ctl.begin_upload(SelectedFile::from_path("doc.pdf")).unwrap();
        ctl.input_mut().insert_str("hello");
        let chat = ctl.begin_chat().unwrap();

        let backend = ctl.backend();
        let chat_result = backend.chat(chat.request()).await;
        ctl.finish_chat(chat, chat_result);
        let upload_result = backend.upload(upload.file()).await;
        ctl.finish_upload(upload, upload_result);

        assert_eq!(ctl.conversation().len(), 2);
        assert_eq!(ctl.upload_status(), Some(&UploadStatus::ready(3)));
    }
}
