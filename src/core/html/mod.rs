//! Best-effort HTML handling: metadata extraction and tag stripping.
//!
//! Neither half is a conformant HTML parser; both are heuristics
//! tuned to real-world pages, and both treat malformed markup as
//! something to degrade through rather than report.

pub mod meta;
pub mod strip;

pub use meta::{extract_title, AttributePattern, MetadataExtractor};
pub use strip::{StrippedDocument, TagStripper};

/// Cap applied to every extracted metadata value, in bytes
pub const MAX_FIELD_LEN: usize = 1024;
