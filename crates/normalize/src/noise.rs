//! Removal of prompt scaffolding that leaks into answers.
//!
//! The backend labels retrieved passages "Legal Chunk 1", "Legal Chunk 2", ...
//! in the prompt, and the model sometimes echoes those labels. They mean
//! nothing to the reader.

use once_cell::sync::Lazy;
use regex::Regex;

/// "legal chunk <n>" as a standalone token, any case, ASCII digits.
static NOISE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\blegal chunk\s+[0-9]+\b").expect("noise token pattern is valid")
});

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("whitespace pattern is valid"));

static SPACE_BEFORE_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+,").expect("comma pattern is valid"));

static SPACE_BEFORE_PERIOD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+\.").expect("period pattern is valid"));

/// Strip noise tokens, then tidy the whitespace they leave behind.
///
/// Pass order: noise tokens with whitespace runs, space before commas,
/// space before periods, trim. Applying this twice gives the same text as once.
pub fn strip_noise(text: &str) -> String {
    let mut out = text.to_string();

    // Removing one token can splice two fragments into a new one
    // ("legal legal chunk 1 chunk 2"), and collapsing the gap it leaves can
    // too, so both run to a fixpoint together.
    loop {
        let collapsed = WHITESPACE_RUN.replace_all(&out, " ").into_owned();
        if !NOISE_TOKEN.is_match(&collapsed) {
            out = collapsed;
            break;
        }
        out = NOISE_TOKEN.replace_all(&collapsed, "").into_owned();
    }

    let out = SPACE_BEFORE_COMMA.replace_all(&out, ",");
    let out = SPACE_BEFORE_PERIOD.replace_all(&out, ".");

    out.trim().to_string()
}
