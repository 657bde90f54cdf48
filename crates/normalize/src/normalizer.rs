//! Reply normalization.
//!
//! Probes the reply shape once, picks the text to render and the fallback
//! sources for that shape, and runs the text pipeline:
//! extract citations → strip noise → split sentences → align.

use serde_json::Value;

use crate::align::align_citations;
use crate::citations::{extract_citations, Extraction};
use crate::envelope::unwrap_envelope;
use crate::noise::strip_noise;
use crate::sentences::split_sentences;
use crate::shape::{AnswerBody, FlatContent, ResponseShape, WrappedAnswer};
use crate::types::{Citation, NormalizedResult};

/// Output of the text pipeline for one piece of prose.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedText {
    /// Sentence lines joined with `\n`
    pub display_text: String,

    /// Citations in the order they were found
    pub citations: Vec<Citation>,
}

/// Run extract → strip → split → align over prose.
pub fn render_text(text: &str) -> RenderedText {
    let Extraction {
        cleaned_text,
        citations,
    } = extract_citations(text);

    let cleaned = strip_noise(&cleaned_text);
    let sentences = split_sentences(&cleaned);
    let display_text = align_citations(&sentences, &citations);

    tracing::debug!(
        sentences = sentences.len(),
        citations = citations.len(),
        "Rendered answer text"
    );

    RenderedText {
        display_text,
        citations,
    }
}

/// Normalize a raw backend reply into display text and sources.
///
/// Defined for every input: malformed JSON, unknown layouts and broken
/// envelopes all degrade to treating some string as prose.
pub fn normalize(raw: &str) -> NormalizedResult {
    let shape = ResponseShape::probe(raw);
    tracing::debug!(shape = shape.kind(), bytes = raw.len(), "Normalizing reply");

    match shape {
        ResponseShape::NotJson => normalize_prose(raw),
        ResponseShape::FlatContent(flat) => normalize_flat(flat),
        ResponseShape::WrappedAnswer(wrapped) => normalize_wrapped(wrapped),
        ResponseShape::NestedAnswer(body) => normalize_body(body),
        ResponseShape::Opaque(value) => normalize_opaque(value),
    }
}

/// Prose always reports its sources, even when none were found.
fn normalize_prose(text: &str) -> NormalizedResult {
    let rendered = render_text(text);
    NormalizedResult::new(rendered.display_text).with_sources(Some(rendered.citations))
}

fn normalize_flat(flat: FlatContent) -> NormalizedResult {
    let rendered = render_text(&flat.content);

    NormalizedResult {
        display_text: rendered.display_text,
        sources: prefer_extracted(rendered.citations, flat.sources),
        filename: flat.filename,
        page_number: flat.page_number,
        paragraph_number: flat.paragraph_number,
    }
}

fn normalize_wrapped(wrapped: WrappedAnswer) -> NormalizedResult {
    let inner = unwrap_envelope(&wrapped.answer)
        .as_ref()
        .and_then(AnswerBody::decode);

    match inner {
        Some(body) => normalize_body(body),
        None => {
            tracing::trace!("No usable envelope, rendering answer as prose");
            let rendered = render_text(&wrapped.answer);
            NormalizedResult::new(rendered.display_text)
                .with_sources(prefer_extracted(rendered.citations, None))
        }
    }
}

fn normalize_body(body: AnswerBody) -> NormalizedResult {
    let rendered = render_text(&body.answer);
    NormalizedResult::new(rendered.display_text)
        .with_sources(prefer_extracted(rendered.citations, body.sources))
}

fn normalize_opaque(value: Value) -> NormalizedResult {
    let text = match value {
        Value::String(s) => s,
        other => other.to_string(),
    };
    normalize_prose(&text)
}

/// Citations found in the text beat structured ones sent alongside it.
fn prefer_extracted(
    extracted: Vec<Citation>,
    fallback: Option<Vec<Citation>>,
) -> Option<Vec<Citation>> {
    if extracted.is_empty() {
        fallback
    } else {
        Some(extracted)
    }
}
