//! Core domain logic (transport-agnostic)
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **html**: Metadata extraction and tag stripping
//! - **record**: The opaque per-document result payload
//! - **render**: JSON and template rendering of result lists
//! - **engine**: The external full-text engine seam (tantivy)
//! - **indexer**: Directory walking and the document pipeline

pub mod config;
pub mod engine;
pub mod error;
pub mod html;
pub mod indexer;
pub mod record;
pub mod render;
pub mod types;

pub use config::Config;
pub use error::{Result, SitefindError};
