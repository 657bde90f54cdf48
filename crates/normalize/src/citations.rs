//! Inline citation markers.
//!
//! The answer model is instructed to cite like `[Source: lease.pdf, Page: 2,
//! Para: 1]`. Markers are lifted out of the prose in the order they appear;
//! that order is what later pairs each citation with its sentence.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::types::Citation;

/// `[Source: <file>, Page: <digits>, Para: <digits>]`, keywords case-insensitive.
/// Digits are ASCII only.
/// The file name runs up to the first comma or closing bracket.
static CITATION_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[Source:\s*([^,\]]+),\s*Page:\s*([0-9]+),\s*Para:\s*([0-9]+)\]")
        .expect("citation marker pattern is valid")
});

/// Prose with the markers cut out, plus what was cut.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub cleaned_text: String,
    pub citations: Vec<Citation>,
}

/// Remove every citation marker from `text`, returning them in order.
pub fn extract_citations(text: &str) -> Extraction {
    let citations: Vec<Citation> = CITATION_MARKER
        .captures_iter(text)
        .map(|caps| citation_from_captures(&caps))
        .collect();

    let cleaned_text = if citations.is_empty() {
        text.to_string()
    } else {
        CITATION_MARKER.replace_all(text, "").into_owned()
    };

    tracing::trace!("Extracted {} citation markers", citations.len());

    Extraction {
        cleaned_text,
        citations,
    }
}

fn citation_from_captures(caps: &Captures<'_>) -> Citation {
    Citation::new(
        caps[1].trim(),
        parse_locator(&caps[2]),
        parse_locator(&caps[3]),
    )
}

// Digits only by construction; absurdly long runs saturate.
fn parse_locator(digits: &str) -> u64 {
    digits.parse().unwrap_or(u64::MAX)
}
