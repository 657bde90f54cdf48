//! Classification of raw backend replies.
//!
//! A reply is probed once and lands in exactly one [`ResponseShape`]. Object
//! replies are tried against each recognized layout in a fixed order, most
//! specific first: `content`, then a string `answer`, then an object `answer`.
//! The first layout that decodes wins even when a later one would also fit.

use serde_json::{Map, Value};

use crate::types::{citations_from_value, Citation, Locator};

/// Keys the backend has used for the page locator, in lookup order.
const PAGE_NUMBER_KEYS: [&str; 2] = ["page number", "pageNumber"];

/// Keys the backend has used for the paragraph locator, in lookup order.
/// The double-spaced spelling is real backend output.
const PARAGRAPH_NUMBER_KEYS: [&str; 3] = ["para  number", "para number", "paragraphNumber"];

/// The recognized layouts of a backend reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// Not JSON at all; the body is prose.
    NotJson,

    /// `{ "content": "...", ... }`
    FlatContent(FlatContent),

    /// `{ "answer": "..." }`, possibly a `$$`-wrapped envelope
    WrappedAnswer(WrappedAnswer),

    /// `{ "answer": { "answer": "...", "sources": [...] } }`
    NestedAnswer(AnswerBody),

    /// Valid JSON matching none of the above.
    Opaque(Value),
}

impl ResponseShape {
    /// Decode and classify a raw reply. Never fails.
    pub fn probe(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::classify(value),
            Err(e) => {
                tracing::trace!("Reply is not JSON: {}", e);
                Self::NotJson
            }
        }
    }

    /// Classify an already decoded value.
    pub fn classify(value: Value) -> Self {
        let recognized = match value.as_object() {
            Some(fields) => FlatContent::decode(fields)
                .map(Self::FlatContent)
                .or_else(|| WrappedAnswer::decode(fields).map(Self::WrappedAnswer))
                .or_else(|| {
                    fields
                        .get("answer")
                        .and_then(AnswerBody::decode)
                        .map(Self::NestedAnswer)
                }),
            None => None,
        };

        recognized.unwrap_or(Self::Opaque(value))
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotJson => "not-json",
            Self::FlatContent(_) => "flat-content",
            Self::WrappedAnswer(_) => "wrapped-answer",
            Self::NestedAnswer(_) => "nested-answer",
            Self::Opaque(_) => "opaque",
        }
    }
}

/// A reply carrying its text in `content`, with optional document metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatContent {
    pub content: String,
    pub sources: Option<Vec<Citation>>,
    pub filename: Option<String>,
    pub page_number: Option<Locator>,
    pub paragraph_number: Option<Locator>,
}

impl FlatContent {
    fn decode(fields: &Map<String, Value>) -> Option<Self> {
        let content = fields.get("content")?.as_str()?.to_string();

        Some(Self {
            content,
            sources: fields.get("sources").and_then(citations_from_value),
            filename: fields
                .get("filename")
                .and_then(Value::as_str)
                .map(str::to_string),
            page_number: first_locator(fields, &PAGE_NUMBER_KEYS),
            paragraph_number: first_locator(fields, &PARAGRAPH_NUMBER_KEYS),
        })
    }
}

/// A reply whose `answer` is a string: either prose or a `$$` envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedAnswer {
    pub answer: String,
}

impl WrappedAnswer {
    fn decode(fields: &Map<String, Value>) -> Option<Self> {
        let answer = fields.get("answer")?.as_str()?.to_string();
        Some(Self { answer })
    }
}

/// An object with a string `answer` and optional `sources`.
///
/// Appears both nested under a top-level `answer` key and inside `$$`
/// envelopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerBody {
    pub answer: String,
    pub sources: Option<Vec<Citation>>,
}

impl AnswerBody {
    pub fn decode(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        let answer = fields.get("answer")?.as_str()?.to_string();

        Some(Self {
            answer,
            sources: fields.get("sources").and_then(citations_from_value),
        })
    }
}

fn first_locator(fields: &Map<String, Value>, keys: &[&str]) -> Option<Locator> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find_map(Locator::from_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_text_is_not_json() {
        assert_eq!(ResponseShape::probe("The claim is valid."), ResponseShape::NotJson);
        assert_eq!(ResponseShape::probe(""), ResponseShape::NotJson);
        assert_eq!(ResponseShape::probe("{\"answer\": "), ResponseShape::NotJson);
    }

    #[test]
    fn test_content_wins_over_answer() {
        let shape = ResponseShape::probe(r#"{"content":"From content.","answer":"From answer."}"#);

        match shape {
            ResponseShape::FlatContent(flat) => assert_eq!(flat.content, "From content."),
            other => panic!("expected flat-content, got {}", other.kind()),
        }
    }

    #[test]
    fn test_non_string_content_falls_through() {
        let shape = ResponseShape::probe(r#"{"content":42,"answer":"Fine."}"#);
        assert_eq!(
            shape,
            ResponseShape::WrappedAnswer(WrappedAnswer {
                answer: "Fine.".to_string()
            })
        );
    }

    #[test]
    fn test_string_answer_is_wrapped() {
        let shape = ResponseShape::probe(r#"{"answer":"Yes.","retrieved_sources_count":3}"#);
        assert_eq!(shape.kind(), "wrapped-answer");
    }

    #[test]
    fn test_object_answer_is_nested() {
        let shape = ResponseShape::probe(
            r#"{"answer":{"answer":"Inner.","sources":[{"source_file":"a.pdf","page":1,"paragraph":2}]}}"#,
        );

        match shape {
            ResponseShape::NestedAnswer(body) => {
                assert_eq!(body.answer, "Inner.");
                assert_eq!(body.sources, Some(vec![Citation::new("a.pdf", 1, 2)]));
            }
            other => panic!("expected nested-answer, got {}", other.kind()),
        }
    }

    #[test]
    fn test_unrecognized_values_are_opaque() {
        assert_eq!(ResponseShape::probe("42").kind(), "opaque");
        assert_eq!(ResponseShape::probe("\"quoted\"").kind(), "opaque");
        assert_eq!(ResponseShape::probe(r#"{"answer":{"text":"no"}}"#).kind(), "opaque");
        assert_eq!(ResponseShape::probe("[1,2]").kind(), "opaque");
    }

    #[test]
    fn test_flat_content_metadata_spellings() {
        let shape = ResponseShape::classify(json!({
            "content": "Text.",
            "filename": "lease.pdf",
            "page number": 4,
            "para  number": "2b"
        }));

        let ResponseShape::FlatContent(flat) = shape else {
            panic!("expected flat-content");
        };
        assert_eq!(flat.filename.as_deref(), Some("lease.pdf"));
        assert_eq!(flat.page_number.map(|l| l.to_string()), Some("4".to_string()));
        assert_eq!(flat.paragraph_number, Some(Locator::Text("2b".to_string())));
    }

    #[test]
    fn test_flat_content_camel_case_keys() {
        let shape = ResponseShape::classify(json!({
            "content": "Text.",
            "pageNumber": 9,
            "paragraphNumber": 1
        }));

        let ResponseShape::FlatContent(flat) = shape else {
            panic!("expected flat-content");
        };
        assert_eq!(flat.page_number.map(|l| l.to_string()), Some("9".to_string()));
        assert_eq!(flat.paragraph_number.map(|l| l.to_string()), Some("1".to_string()));
        assert!(flat.filename.is_none());
        assert!(flat.sources.is_none());
    }

    #[test]
    fn test_paragraph_key_priority() {
        let flat = FlatContent::decode(
            json!({ "content": "x", "para number": 2, "paragraphNumber": 3 })
                .as_object()
                .unwrap(),
        )
        .unwrap();
        assert_eq!(flat.paragraph_number.map(|l| l.to_string()), Some("2".to_string()));
    }
}
