//! sitefind - Search for static HTML sites
//!
//! sitefind turns a directory of HTML files into a searchable index
//! and renders ranked results as JSON or through a small directive
//! template. The full-text engine (tantivy) is treated as a black
//! box; everything interesting here is the preparation and rendering
//! pipeline around it:
//!
//! - **html**: metadata extraction (`<meta>`/`<link>`/`<title>`) and
//!   a single-pass tag stripper with a no-index region marker
//! - **record**: the length-prefixed binary payload stored per
//!   document and recovered verbatim at query time
//! - **render**: minimal JSON escaping and `{{ directive }}`
//!   templates, both streaming
//! - **engine**: the [`IndexEngine`](core::engine::IndexEngine) seam
//!   and its tantivy implementation
//! - **indexer**: directory traversal and the indexing decision
//!   (skip on missing title/description or a no-index marker)

// Core domain logic (transport-agnostic)
pub mod core;

// CLI adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::engine::{IndexEngine, TantivyEngine};
pub use core::error::{Result, SitefindError};
pub use core::html::{MetadataExtractor, TagStripper};
pub use core::indexer::{DocumentPipeline, FileWalker};
pub use core::record::ResultRecord;
pub use core::render::Template;
pub use core::types::*;
