//! Heuristic sentence splitting.
//!
//! A sentence is a maximal run of characters other than `.`, `!` and `?`,
//! optionally closed by one of them. This is deliberately naive:
//! abbreviations ("e.g."), decimals ("3.5") and punctuation inside quotes all
//! cause extra splits. Citation alignment depends on exactly this behaviour,
//! so it must not be made smarter in isolation.

use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?]+[.!?]?").expect("sentence pattern is valid"));

/// Terminators recognized by [`split_sentences`].
pub const TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Split cleaned prose into trimmed, non-empty sentences.
///
/// Text with no sentence body at all (only terminators) comes back whole as
/// a single element; empty text yields no sentences.
pub fn split_sentences(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let sentences: Vec<String> = SENTENCE
        .find_iter(trimmed)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if sentences.is_empty() {
        vec![trimmed.to_string()]
    } else {
        sentences
    }
}
