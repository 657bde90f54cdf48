//! HTTP backend client.
//!
//! Posts a multipart form (`user_query`, optional `file`) to the backend's
//! analyze route and hands back the body untouched.

use crate::client::{AnalyzeReply, AnalyzeRequest, BackendClient, BodyStream};
use citeline_core::config::BackendConfig;
use citeline_core::{AppError, AppResult};
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

/// Client for the RAG backend's HTTP API.
pub struct HttpBackendClient {
    /// Full URL of the analyze route
    analyze_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpBackendClient {
    /// Create a client from backend settings.
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            analyze_url: config.analyze_url(),
            client,
        })
    }

    /// Build the multipart form for one request.
    fn to_form(&self, request: &AnalyzeRequest) -> AppResult<Form> {
        let mut form = Form::new().text("user_query", request.query.clone());

        if let Some(ref attachment) = request.attachment {
            let part = Part::bytes(attachment.bytes.clone())
                .file_name(attachment.file_name.clone())
                .mime_str(&attachment.mime)
                .map_err(|e| {
                    AppError::Other(format!("Invalid MIME type '{}': {}", attachment.mime, e))
                })?;
            form = form.part("file", part);
        }

        Ok(form)
    }

    /// Send the request and fail on transport errors or non-success status.
    async fn send(&self, request: &AnalyzeRequest) -> AppResult<reqwest::Response> {
        let form = self.to_form(request)?;

        let response = self
            .client
            .post(&self.analyze_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::backend(format!("Failed to reach backend: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::backend_status(
                status.as_u16(),
                error_detail(&body, status.canonical_reason()),
            ));
        }

        Ok(response)
    }
}

/// Pull a readable message out of an error body.
///
/// The backend reports failures as `{"detail": "..."}`; other bodies are used
/// as-is, and an empty body falls back to the status reason.
fn error_detail(body: &str, reason: Option<&str>) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string));

    match detail {
        Some(detail) => detail,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => reason.unwrap_or("Unknown error").to_string(),
    }
}

#[async_trait::async_trait]
impl BackendClient for HttpBackendClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> AppResult<String> {
        tracing::info!("Sending question to backend");
        tracing::debug!(
            url = %self.analyze_url,
            attachment = request.attachment.as_ref().map(|a| a.file_name.as_str()),
            "Analyze request"
        );

        let body = self
            .send(request)
            .await?
            .text()
            .await
            .map_err(|e| AppError::backend(format!("Failed to read backend reply: {}", e)))?;

        if let Ok(reply) = serde_json::from_str::<AnalyzeReply>(&body) {
            tracing::debug!(
                "Backend used {} knowledge base passages",
                reply.retrieved_sources_count
            );
        }

        tracing::info!("Received {} byte reply from backend", body.len());
        Ok(body)
    }

    async fn analyze_stream(&self, request: &AnalyzeRequest) -> AppResult<BodyStream> {
        tracing::info!("Starting streaming request to backend");

        let response = self.send(request).await?;

        let stream = response.bytes_stream().map(|result| {
            result
                .map(|bytes| bytes.to_vec())
                .map_err(|e| AppError::backend(format!("Stream error: {}", e)))
        });

        Ok(Box::pin(stream))
    }
}
