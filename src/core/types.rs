//! Core data types for sitefind.
//!
//! These are the values that flow between the extraction, stripping,
//! indexing and rendering stages. Metadata fields stay as raw bytes:
//! documents are not required to be valid UTF-8 and the result
//! payload must round-trip whatever the page contained.

use serde::{Deserialize, Serialize};

/// Metadata pulled from a raw HTML document.
///
/// Every field is optional in the source; an absent field is an empty
/// byte string, never an error. Each value is capped at
/// [`MAX_FIELD_LEN`](crate::core::html::MAX_FIELD_LEN) bytes by the
/// extraction policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedMetadata {
    /// Text between `<title...>` and `</title>`
    pub title: Vec<u8>,

    /// `<meta name="description" content="...">`
    pub description: Vec<u8>,

    /// `<meta name="keywords" content="...">`
    pub keywords: Vec<u8>,

    /// `<meta name="robots" content="...">` (opt-out directive)
    pub robots: Vec<u8>,

    /// `<link rel="canonical" href="...">`
    pub canonical: Vec<u8>,
}

impl ExtractedMetadata {
    /// True when the document carries enough metadata to be worth
    /// indexing (non-empty title and description)
    pub fn is_indexable(&self) -> bool {
        !self.title.is_empty() && !self.description.is_empty()
    }
}

/// A text section handed to the index engine with a relative weight.
///
/// Stands in for the original engine's weighted `index_text` calls:
/// title at 10, keywords and description at 3, body text at 1.
#[derive(Debug, Clone)]
pub struct WeightedText {
    pub field: TextField,
    pub text: String,
}

/// The named text sections of a prepared document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Title,
    Keywords,
    Description,
    Body,
}

impl TextField {
    /// Relative search weight of this section
    pub fn weight(&self) -> f32 {
        match self {
            TextField::Title => 10.0,
            TextField::Keywords => 3.0,
            TextField::Description => 3.0,
            TextField::Body => 1.0,
        }
    }

    /// Schema field name used by the engine
    pub fn name(&self) -> &'static str {
        match self {
            TextField::Title => "title",
            TextField::Keywords => "keywords",
            TextField::Description => "description",
            TextField::Body => "body",
        }
    }
}

/// Statistics from a batch indexing operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of documents accepted into the index
    pub files_indexed: usize,

    /// Documents skipped (missing metadata, no-index marker, or a
    /// per-file read failure)
    pub files_skipped: usize,

    /// Indexing duration in milliseconds
    pub duration_ms: u64,
}
