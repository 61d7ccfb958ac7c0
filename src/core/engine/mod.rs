//! The index-engine seam.
//!
//! The inverted index (stemming, boolean keys, ranked retrieval) is
//! an external collaborator; the core only ever talks to it through
//! [`IndexEngine`]. The production implementation is tantivy-backed
//! ([`TantivyEngine`]); tests substitute an in-memory fake.

pub mod tantivy;

pub use self::tantivy::TantivyEngine;

use crate::core::error::Result;
use crate::core::types::WeightedText;

/// Contract the document pipeline requires from the full-text engine.
///
/// The payload handed to `replace_document` is opaque to the engine
/// and must come back byte-identical from `search`, in ranked order.
pub trait IndexEngine {
    /// Add or replace the document keyed by `key`, storing `payload`
    /// verbatim and feeding the weighted text sections to the
    /// engine's term generator
    fn replace_document(
        &mut self,
        key: &str,
        payload: &[u8],
        sections: &[WeightedText],
    ) -> Result<()>;

    /// Make pending writes visible to subsequent searches
    fn commit(&mut self) -> Result<()>;

    /// Ranked retrieval: the stored payloads of the best matches,
    /// best first, at most `max_results` of them
    fn search(&self, query: &str, max_results: usize) -> Result<Vec<Vec<u8>>>;
}
