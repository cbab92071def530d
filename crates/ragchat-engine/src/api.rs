//! Backend port and HTTP adapter.
//!
//! The controller talks to the document backend only through the
//! [`Backend`] trait. [`HttpBackend`] implements it over reqwest for the two
//! endpoints the backend exposes:
//!
//! - `POST /upload`: multipart form with field `file`
//! - `POST /chat`: JSON `{ "message": ... }`

use crate::upload::SelectedFile;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Body of a chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's (trimmed) message.
    pub message: String,
}

impl ChatRequest {
    /// Create a request for `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Successful chat response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Answer text (markdown).
    pub answer: String,
    /// Attributions for the answer; may be absent or null.
    #[serde(default)]
    pub sources: Option<Vec<String>>,
}

impl ChatReply {
    /// Sources, treating an absent list as empty.
    pub fn sources(&self) -> &[String] {
        self.sources.as_deref().unwrap_or_default()
    }
}

/// Successful upload response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Number of chunks the document was split into.
    pub chunks: u64,
    /// Human-readable confirmation from the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
struct ErrorBody {
    /// Usually a string; validation failures send structured data instead.
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

impl ErrorBody {
    fn detail_text(self) -> Option<String> {
        match self.detail {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
            _ => None,
        }
    }
}

/// Errors from backend calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The configured server URL does not parse.
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// The selected file could not be read from disk.
    #[error("Could not read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Network or transport failure.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response.
    #[error("Server returned HTTP {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Server {
        status: u16,
        detail: Option<String>,
    },

    /// 2xx response whose body does not match the expected schema.
    #[error("Unexpected response body: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The task running the request ended without a result.
    #[error("Request task failed: {0}")]
    Task(String),
}

/// The two operations the client needs from the backend.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Upload a document for processing.
    async fn upload(&self, file: &SelectedFile) -> Result<UploadReceipt, ApiError>;

    /// Ask a question about the uploaded documents.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError>;
}

/// reqwest-based [`Backend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend rooted at `base_url` (e.g. `http://127.0.0.1:8000`).
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        reqwest::Url::parse(base_url).map_err(|_| ApiError::InvalidUrl(base_url.to_string()))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Check the server answers `GET /`. Returns the HTTP status on success.
    pub async fn probe(&self) -> Result<u16, ApiError> {
        let response = self.client.get(self.endpoint("/")).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(status.as_u16())
        } else {
            Err(ApiError::Server {
                status: status.as_u16(),
                detail: None,
            })
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn upload(&self, file: &SelectedFile) -> Result<UploadReceipt, ApiError> {
        let bytes = tokio::fs::read(&file.path)
            .await
            .map_err(|source| ApiError::ReadFile {
                path: file.path.clone(),
                source,
            })?;

        debug!(file = %file.name, bytes = bytes.len(), "Uploading document");

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(&file.content_type)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        decode_upload(status, &body)
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        debug!(chars = request.message.len(), "Sending chat message");

        let response = self
            .client
            .post(self.endpoint("chat"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        decode_chat(status, &body)
    }
}

/// Interpret an upload response.
pub fn decode_upload(status: StatusCode, body: &[u8]) -> Result<UploadReceipt, ApiError> {
    if status.is_success() {
        serde_json::from_slice(body).map_err(ApiError::Malformed)
    } else {
        Err(server_error(status, body))
    }
}

/// Interpret a chat response.
pub fn decode_chat(status: StatusCode, body: &[u8]) -> Result<ChatReply, ApiError> {
    if status.is_success() {
        serde_json::from_slice(body).map_err(ApiError::Malformed)
    } else {
        Err(server_error(status, body))
    }
}

fn server_error(status: StatusCode, body: &[u8]) -> ApiError {
    let detail = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::detail_text);
    ApiError::Server {
        status: status.as_u16(),
        detail,
    }
}
