//! Normalize command handler.
//!
//! Runs a saved backend reply through the normalizer without touching the
//! network. Useful for checking how a captured body will be displayed.

use citeline_core::{AppError, AppResult};
use citeline_normalize::{normalize, NormalizedResult};
use clap::Args;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::output::{document_line, sources_block};

/// Normalize a saved backend reply
#[derive(Args, Debug)]
pub struct NormalizeCommand {
    /// File holding the raw reply body ("-" or omitted reads stdin)
    pub input: Option<PathBuf>,

    /// Print the full normalized result as JSON
    #[arg(long)]
    pub json: bool,

    /// Print only the display text, without the sources block
    #[arg(long, conflicts_with = "json")]
    pub text_only: bool,
}

impl NormalizeCommand {
    /// Execute the normalize command.
    pub fn execute(&self) -> AppResult<()> {
        tracing::info!("Executing normalize command");
        tracing::debug!("Normalize options: {:?}", self);

        let raw = self.read_input()?;
        let result = normalize(&raw);

        println!("{}", self.render(&result)?);
        Ok(())
    }

    fn read_input(&self) -> AppResult<String> {
        match self.input.as_deref() {
            Some(path) if path != Path::new("-") => std::fs::read_to_string(path).map_err(|e| {
                AppError::Other(format!("Failed to read reply file {:?}: {}", path, e))
            }),
            _ => {
                let mut raw = String::new();
                std::io::stdin().read_to_string(&mut raw)?;
                Ok(raw)
            }
        }
    }

    fn render(&self, result: &NormalizedResult) -> AppResult<String> {
        if self.json {
            return Ok(serde_json::to_string_pretty(result)?);
        }

        let mut out = result.display_text.clone();
        if self.text_only {
            return Ok(out);
        }

        let extras = [
            document_line(
                result.filename.as_deref(),
                result.page_number.as_ref(),
                result.paragraph_number.as_ref(),
            ),
            sources_block(result.citations()),
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
    use tempfile::NamedTempFile;

    fn command(input: Option<PathBuf>, json: bool, text_only: bool) -> NormalizeCommand {
        NormalizeCommand {
            input,
            json,
            text_only,
        }
    }

    #[test]
    fn test_reads_reply_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{"answer":"Saved reply."}"#).unwrap();

        let cmd = command(Some(file.path().to_path_buf()), false, false);
        assert_eq!(cmd.read_input().unwrap(), r#"{"answer":"Saved reply."}"#);
    }

    #[test]
    fn test_missing_file_is_error() {
        let cmd = command(Some(PathBuf::from("/definitely/not/here.json")), false, false);
        assert!(cmd.read_input().is_err());
    }

    #[test]
    fn test_render_text_with_sources() {
        let result = normalize("Valid. [Source: contract.pdf, Page: 2, Para: 1]");
        let rendered = command(None, false, false).render(&result).unwrap();

        assert_eq!(
            rendered,
            "Valid, Source: contract.pdf, Page: 2, Para: 1.\n\nSources:\n  1. contract.pdf (page 2, para 1)"
        );
    }

    #[test]
    fn test_render_text_only() {
        let result = normalize("Valid. [Source: contract.pdf, Page: 2, Para: 1]");
        let rendered = command(None, false, true).render(&result).unwrap();
        assert_eq!(rendered, "Valid, Source: contract.pdf, Page: 2, Para: 1.");
    }

    #[test]
    fn test_render_json() {
        let result = normalize("No markers");
        let rendered = command(None, true, false).render(&result).unwrap();
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(json["displayText"], "No markers");
        assert_eq!(json["sources"], serde_json::json!([]));
    }
}
