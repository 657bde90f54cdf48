//! Backend client abstraction and request types.
//!
//! The backend takes a question (and optionally one document) and replies
//! with a body whose layout is not guaranteed. Clients here only move bytes;
//! making sense of the body is the job of `citeline-normalize`.

use citeline_core::{AppError, AppResult};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::pin::Pin;

/// A document sent along with the question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name as the backend should see it
    pub file_name: String,

    /// Raw file contents
    pub bytes: Vec<u8>,

    /// MIME type sent with the upload
    pub mime: String,
}

impl Attachment {
    /// Create an attachment, labelling it by file extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_for(&file_name).to_string();
        Self {
            file_name,
            bytes,
            mime,
        }
    }

    /// Read an attachment from disk.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| AppError::Other(format!("Not a file path: {:?}", path)))?;

        Ok(Self::new(file_name, bytes))
    }
}

/// Content types the backend's upload handler understands.
fn mime_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// One question for the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeRequest {
    /// The user's question
    pub query: String,

    /// Optional document to analyze against the knowledge base
    pub attachment: Option<Attachment>,
}

impl AnalyzeRequest {
    /// Create a question-only request.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            attachment: None,
        }
    }

    /// Attach a document.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// The JSON reply the backend documents for `/analyze/`.
///
/// Informational only: replies are normalized from the raw body, which does
/// not always match this layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeReply {
    pub answer: String,
    #[serde(default)]
    pub retrieved_sources_count: u32,
}

/// Stream of raw body bytes, in arrival order.
pub type BodyStream = Pin<Box<dyn Stream<Item = AppResult<Vec<u8>>> + Send>>;

/// Trait for answer backends.
#[async_trait::async_trait]
pub trait BackendClient: Send + Sync {
    /// Short name for logs (e.g., "http").
    fn name(&self) -> &str;

    /// Submit a question and return the full raw reply body.
    async fn analyze(&self, request: &AnalyzeRequest) -> AppResult<String>;

    /// Submit a question and receive the reply body incrementally.
    ///
    /// Chunks must be buffered with [`collect_body`] before normalizing;
    /// citation alignment needs the whole text.
    async fn analyze_stream(&self, request: &AnalyzeRequest) -> AppResult<BodyStream>;
}

/// Buffer a body stream into one string.
///
/// Bytes are joined before decoding, so characters split across chunk
/// boundaries survive. Invalid UTF-8 is replaced rather than rejected.
pub async fn collect_body(mut stream: BodyStream) -> AppResult<String> {
    let mut buffer = Vec::new();
    let mut chunks = 0usize;

    while let Some(chunk) = stream.next().await {
        buffer.extend_from_slice(&chunk?);
        chunks += 1;
    }

    tracing::debug!("Buffered {} bytes from {} chunks", buffer.len(), chunks);
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
