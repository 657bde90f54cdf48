//! Chat message dispatch.
//!
//! One user question becomes one round trip to the backend and one reply
//! message. Failures at the network boundary never surface as errors here:
//! they are turned into a readable reply so the conversation can continue.

use chrono::{DateTime, Utc};
use citeline_normalize::{normalize, Citation, Locator, NormalizedResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::{collect_body, AnalyzeRequest, BackendClient};

/// One entry in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,

    /// Text to show; for replies, the normalized display text
    pub text: String,

    /// Whether the user wrote this message
    pub is_user: bool,

    pub timestamp: DateTime<Utc>,

    /// Whether this reply stands in for a failed request
    #[serde(default)]
    pub is_error: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Citation>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<Locator>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_number: Option<Locator>,
}

impl ChatMessage {
    fn base(text: String, is_user: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            is_user,
            timestamp: Utc::now(),
            is_error: false,
            sources: None,
            filename: None,
            page_number: None,
            paragraph_number: None,
        }
    }

    /// A message typed by the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self::base(text.into(), true)
    }

    /// A reply built from a normalized backend answer.
    pub fn from_result(result: NormalizedResult) -> Self {
        Self {
            sources: result.sources,
            filename: result.filename,
            page_number: result.page_number,
            paragraph_number: result.paragraph_number,
            ..Self::base(result.display_text, false)
        }
    }

    /// A reply standing in for a failed request.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::base(text.into(), false)
        }
    }

    /// Citations attached to this message, empty when none.
    pub fn citations(&self) -> &[Citation] {
        self.sources.as_deref().unwrap_or_default()
    }
}

/// Text shown when the backend could not answer.
fn failure_text(err: &citeline_core::AppError) -> String {
    format!("Sorry, I couldn't get an answer right now. {}", err)
}

/// Ask the backend one question and build the reply message.
///
/// With `streaming`, the body is received incrementally and buffered in full
/// before normalizing.
pub async fn send_message(
    client: &dyn BackendClient,
    request: &AnalyzeRequest,
    streaming: bool,
) -> ChatMessage {
    let body = if streaming {
        match client.analyze_stream(request).await {
            Ok(stream) => collect_body(stream).await,
            Err(e) => Err(e),
        }
    } else {
        client.analyze(request).await
    };

    match body {
        Ok(raw) => {
            let message = ChatMessage::from_result(normalize(&raw));
            tracing::info!(
                citations = message.citations().len(),
                "Backend reply normalized"
            );
            message
        }
        Err(e) => {
            tracing::warn!("Backend request failed: {}", e);
            ChatMessage::error(failure_text(&e))
        }
    }
}

/// In-memory conversation. Nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the question, ask the backend, record and return the reply.
    pub async fn ask(
        &mut self,
        client: &dyn BackendClient,
        request: &AnalyzeRequest,
        streaming: bool,
    ) -> &ChatMessage {
        self.messages.push(ChatMessage::user(request.query.clone()));

        let reply = send_message(client, request, streaming).await;
        self.messages.push(reply);

        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
