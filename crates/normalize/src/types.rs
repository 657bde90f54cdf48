//! Normalized answer types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A reference to one paragraph of one source document.
///
/// Citations are plain values. Their order in a list is meaningful: the Nth
/// citation found in an answer belongs to the Nth sentence of that answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Document name as written in the marker (e.g. "contract.pdf")
    #[serde(alias = "filename")]
    pub source_file: String,

    /// 1-based page number
    #[serde(alias = "page_number")]
    pub page: u64,

    /// 1-based paragraph number within the page
    #[serde(alias = "paragraph_number")]
    pub paragraph: u64,

    /// Supporting text, only known when the backend sent structured sources
    #[serde(
        default,
        alias = "text_chunk",
        skip_serializing_if = "Option::is_none"
    )]
    pub text_excerpt: Option<String>,
}

impl Citation {
    /// Create a citation without an excerpt.
    pub fn new(source_file: impl Into<String>, page: u64, paragraph: u64) -> Self {
        Self {
            source_file: source_file.into(),
            page,
            paragraph,
            text_excerpt: None,
        }
    }

    /// Attach the supporting text.
    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.text_excerpt = Some(excerpt.into());
        self
    }
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Source: {}, Page: {}, Para: {}",
            self.source_file, self.page, self.paragraph
        )
    }
}

/// Decode a structured `sources` field sent by the backend.
///
/// Only arrays are accepted. Elements that do not look like a citation are
/// skipped rather than failing the whole list.
pub(crate) fn citations_from_value(value: &Value) -> Option<Vec<Citation>> {
    let items = value.as_array()?;

    let citations: Vec<Citation> = items
        .iter()
        .filter_map(|item| match Citation::deserialize(item) {
            Ok(citation) => Some(citation),
            Err(e) => {
                tracing::debug!("Skipping malformed source entry: {}", e);
                None
            }
        })
        .collect();

    Some(citations)
}

/// A page or paragraph locator, which the backend sends either as a number or
/// as free text ("iv", "12-13").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Locator {
    Number(serde_json::Number),
    Text(String),
}

impl Locator {
    /// Accept numbers and strings; anything else is not a locator.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// The normalized form of one backend reply, ready to be shown.
///
/// `display_text` is always present. `sources` keeps discovery order and is
/// not tied to the number of lines in `display_text`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResult {
    /// One line per sentence, citations appended positionally
    pub display_text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Citation>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<Locator>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_number: Option<Locator>,
}

impl NormalizedResult {
    /// Create a result carrying only display text.
    pub fn new(display_text: impl Into<String>) -> Self {
        Self {
            display_text: display_text.into(),
            ..Default::default()
        }
    }

    /// Set the sources list.
    pub fn with_sources(mut self, sources: Option<Vec<Citation>>) -> Self {
        self.sources = sources;
        self
    }

    /// Sources as a slice, empty when absent.
    pub fn citations(&self) -> &[Citation] {
        self.sources.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_citation_display_matches_marker_words() {
        let citation = Citation::new("contract.pdf", 2, 1);
        assert_eq!(
            citation.to_string(),
            "Source: contract.pdf, Page: 2, Para: 1"
        );
    }

    #[test]
    fn test_citations_from_backend_payload_keys() {
        let value = json!([
            {
                "filename": "tenancy-act.pdf",
                "page_number": 14,
                "paragraph_number": 3,
                "text_chunk": "A landlord must give notice."
            },
            { "source_file": "lease.pdf", "page": 1, "paragraph": 2 }
        ]);

        let citations = citations_from_value(&value).unwrap();
        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].source_file, "tenancy-act.pdf");
        assert_eq!(
            citations[0].text_excerpt.as_deref(),
            Some("A landlord must give notice.")
        );
        assert_eq!(citations[1], Citation::new("lease.pdf", 1, 2));
    }

    #[test]
    fn test_citations_from_value_skips_bad_entries() {
        let value = json!([
            "just a string",
            { "filename": "a.pdf", "page_number": "N/A", "paragraph_number": 1 },
            { "filename": "b.pdf", "page_number": 3, "paragraph_number": 4 }
        ]);

        let citations = citations_from_value(&value).unwrap();
        assert_eq!(citations, vec![Citation::new("b.pdf", 3, 4)]);
    }

    #[test]
    fn test_citations_from_value_requires_array() {
        assert!(citations_from_value(&json!({"filename": "a.pdf"})).is_none());
        assert!(citations_from_value(&json!("a.pdf")).is_none());
    }

    #[test]
    fn test_locator_from_value() {
        assert_eq!(
            Locator::from_value(&json!(7)).map(|l| l.to_string()),
            Some("7".to_string())
        );
        assert_eq!(
            Locator::from_value(&json!("iv")),
            Some(Locator::Text("iv".to_string()))
        );
        assert!(Locator::from_value(&json!(true)).is_none());
    }

    #[test]
    fn test_normalized_result_serializes_camel_case() {
        let result = NormalizedResult::new("Hello.").with_sources(Some(vec![]));
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json, json!({ "displayText": "Hello.", "sources": [] }));
    }
}
