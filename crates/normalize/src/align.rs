//! Positional pairing of citations with sentences.
//!
//! The Nth citation found in the answer is attached to the Nth sentence. No
//! attempt is made to match citation content to sentence content, so a model
//! that cites out of order gets misattributed lines. Extra sentences stay
//! bare; extra citations are not rendered.

use crate::sentences::TERMINATORS;
use crate::types::Citation;

/// Render one display line per sentence, citations zipped in by index.
pub fn align_citations(sentences: &[String], citations: &[Citation]) -> String {
    sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| match citations.get(i) {
            Some(citation) => annotate(sentence, citation),
            None => sentence.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `<sentence>, Source: <file>, Page: <n>, Para: <n>`, keeping the sentence's
/// terminator at the very end of the line.
fn annotate(sentence: &str, citation: &Citation) -> String {
    match sentence.char_indices().last() {
        Some((idx, last)) if TERMINATORS.contains(&last) => {
            format!("{}, {}{}", &sentence[..idx], citation, last)
        }
        _ => format!("{}, {}", sentence, citation),
    }
}
