//! Ask command handler.
//!
//! Sends a question (and optionally a document) to the backend and prints the
//! normalized, cited answer.

use citeline_backend::{create_client, send_message, AnalyzeRequest, Attachment, ChatMessage};
use citeline_core::{config::AppConfig, AppError, AppResult};
use clap::Args;
use std::path::PathBuf;

use super::output::{document_line, sources_block};

/// Ask the backend a question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Document to upload alongside the question (PDF, Word, image)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Receive the reply incrementally (buffered before display)
    #[arg(long)]
    pub stream: bool,

    /// Print the reply message as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        config.validate()?;

        let request = self.build_request()?;
        let client = create_client(&config.backend)?;
        tracing::debug!("Using backend client: {}", client.name());

        let reply = send_message(client.as_ref(), &request, self.stream).await;

        if reply.is_error {
            eprintln!("{}", reply.text);
            return Err(AppError::Other("Backend did not return an answer".to_string()));
        }

        println!("{}", self.render(&reply)?);
        Ok(())
    }

    fn build_request(&self) -> AppResult<AnalyzeRequest> {
        let question = self.question.trim();
        if question.is_empty() {
            return Err(AppError::Config("No question provided".to_string()));
        }

        let mut request = AnalyzeRequest::new(question);
        if let Some(ref path) = self.file {
            let attachment = Attachment::from_path(path)?;
            tracing::debug!(
                file = %attachment.file_name,
                mime = %attachment.mime,
                bytes = attachment.bytes.len(),
                "Attaching document"
            );
            request = request.with_attachment(attachment);
        }

        Ok(request)
    }

    fn render(&self, reply: &ChatMessage) -> AppResult<String> {
        if self.json {
            return Ok(serde_json::to_string_pretty(reply)?);
        }

        let mut out = reply.text.clone();
        let extras = [
            document_line(
                reply.filename.as_deref(),
                reply.page_number.as_ref(),
                reply.paragraph_number.as_ref(),
            ),
            sources_block(reply.citations()),
        ];
        for block in extras.into_iter().flatten() {
            out.push_str("\n\n");
            out.push_str(&block);
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citeline_normalize::normalize;
    use tempfile::TempDir;

    fn command(question: &str, file: Option<PathBuf>, json: bool) -> AskCommand {
        AskCommand {
            question: question.to_string(),
            file,
            stream: false,
            json,
        }
    }

    #[test]
    fn test_build_request_trims_question() {
        let request = command("  Is the clause valid?  ", None, false)
            .build_request()
            .unwrap();

        assert_eq!(request.query, "Is the clause valid?");
        assert!(request.attachment.is_none());
    }

    #[test]
    fn test_build_request_rejects_blank_question() {
        let err = command("   ", None, false).build_request().unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_build_request_with_attachment() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("lease.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let request = command("Summarize", Some(path), false)
            .build_request()
            .unwrap();
        let attachment = request.attachment.unwrap();

        assert_eq!(attachment.file_name, "lease.pdf");
        assert_eq!(attachment.mime, "application/pdf");
        assert_eq!(attachment.bytes, b"%PDF-1.4");
    }

    #[test]
    fn test_build_request_missing_attachment() {
        let result = command("Summarize", Some(PathBuf::from("/no/such/lease.pdf")), false)
            .build_request();
        assert!(result.is_err());
    }

    #[test]
    fn test_render_with_sources() {
        let reply = ChatMessage::from_result(normalize(
            r#"{"answer":"Deposits are refundable. [Source: act.pdf, Page: 7, Para: 3]"}"#,
        ));
        let rendered = command("q", None, false).render(&reply).unwrap();

        assert_eq!(
            rendered,
            "Deposits are refundable, Source: act.pdf, Page: 7, Para: 3.\n\nSources:\n  1. act.pdf (page 7, para 3)"
        );
    }

    #[test]
    fn test_render_json() {
        let reply = ChatMessage::from_result(normalize("Plain answer."));
        let rendered = command("q", None, true).render(&reply).unwrap();
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(json["text"], "Plain answer.");
        assert_eq!(json["isUser"], false);
        assert_eq!(json["isError"], false);
    }
}
