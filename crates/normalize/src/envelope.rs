//! `$$`-delimited JSON envelopes.
//!
//! Some backend replies smuggle a second JSON document inside the `answer`
//! string, fenced by `$$` on both ends:
//!
//! ```text
//! {"answer": "$$ {\"answer\": \"...\", \"sources\": [...]} $$"}
//! ```

use serde_json::Value;

/// Fence placed at both ends of an envelope.
pub const ENVELOPE_MARKER: &str = "$$";

/// Decode the JSON inside a `$$ ... $$` envelope.
///
/// Only whitespace may surround the fences. Returns `None` when the fences are
/// missing or the interior is not valid JSON; the caller should then treat the
/// original string as prose.
pub fn unwrap_envelope(text: &str) -> Option<Value> {
    let interior = text
        .trim()
        .strip_prefix(ENVELOPE_MARKER)?
        .strip_suffix(ENVELOPE_MARKER)?;

    match serde_json::from_str(interior) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("Envelope interior is not valid JSON: {}", e);
            None
        }
    }
}
