//! Directory walking and the document-indexing pipeline.

pub mod pipeline;
pub mod walker;

pub use pipeline::DocumentPipeline;
pub use walker::FileWalker;
