//! Normalization of RAG backend replies.
//!
//! The answer backend replies with a loosely structured body: sometimes plain
//! prose, sometimes JSON in one of several layouts, sometimes JSON hidden in a
//! `$$` envelope inside another JSON string. This crate turns any such body
//! into a [`NormalizedResult`]: one display line per sentence, with inline
//! `[Source: ..., Page: ..., Para: ...]` markers lifted out and re-attached
//! positionally, plus the ordered list of citations.
//!
//! Everything here is synchronous and stateless. [`normalize`] is total: it
//! returns a result for every input string and never panics on malformed
//! replies.
//!
//! # Example
//! ```
//! use citeline_normalize::normalize;
//!
//! let result = normalize(
//!     "The claim is valid. [Source: contract.pdf, Page: 2, Para: 1] It was signed in 2020.",
//! );
//!
//! assert_eq!(
//!     result.display_text,
//!     "The claim is valid, Source: contract.pdf, Page: 2, Para: 1.\nIt was signed in 2020."
//! );
//! assert_eq!(result.citations().len(), 1);
//! ```

pub mod align;
pub mod citations;
pub mod envelope;
pub mod noise;
pub mod normalizer;
pub mod sentences;
pub mod shape;
pub mod types;

// Re-export the pipeline surface
pub use align::align_citations;
pub use citations::{extract_citations, Extraction};
pub use envelope::unwrap_envelope;
pub use noise::strip_noise;
pub use normalizer::{normalize, render_text, RenderedText};
pub use sentences::split_sentences;
pub use shape::ResponseShape;
pub use types::{Citation, Locator, NormalizedResult};
