//! Document preparation and batch indexing.
//!
//! Pulls metadata out of each raw HTML file, strips it to indexable
//! text, decides whether the document should be indexed at all, and
//! hands the weighted sections plus the packed result payload to the
//! index engine. A failure on one document skips that document, never
//! the batch.

use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::core::engine::IndexEngine;
use crate::core::html::{MetadataExtractor, TagStripper};
use crate::core::indexer::FileWalker;
use crate::core::record::ResultRecord;
use crate::core::types::{IndexStats, TextField, WeightedText};

/// Prepares raw documents for the index engine
pub struct DocumentPipeline {
    extractor: MetadataExtractor,
    stripper: TagStripper,
    noindex_token: Vec<u8>,
}

impl DocumentPipeline {
    pub fn new(noindex_token: &str) -> Self {
        Self {
            extractor: MetadataExtractor::new(),
            stripper: TagStripper::new(noindex_token),
            noindex_token: noindex_token.as_bytes().to_vec(),
        }
    }

    /// Extract, strip, decide, and index one document.
    ///
    /// Returns `Ok(false)` when the document is skipped: empty title,
    /// empty description, a robots directive containing the no-index
    /// token, or a root element marked no-index. The engine is not
    /// touched for skipped documents.
    pub fn index_document<E: IndexEngine>(
        &self,
        engine: &mut E,
        buffer: &[u8],
        path: &str,
    ) -> crate::core::error::Result<bool> {
        let meta = self.extractor.extract(buffer);
        if !meta.is_indexable() {
            tracing::debug!("Skipping {path}: missing title or description");
            return Ok(false);
        }
        if contains(&meta.robots, &self.noindex_token) {
            tracing::debug!("Skipping {path}: robots directive opts out");
            return Ok(false);
        }

        let stripped = self.stripper.strip(buffer);
        if stripped.root_noindex {
            tracing::debug!("Skipping {path}: root element marked no-index");
            return Ok(false);
        }

        let record = ResultRecord {
            path: path.as_bytes().to_vec(),
            title: meta.title.clone(),
            description: meta.description.clone(),
            url: meta.canonical.clone(),
        };
        let payload = record.pack();

        let sections = vec![
            WeightedText {
                field: TextField::Title,
                text: String::from_utf8_lossy(&meta.title).into_owned(),
            },
            WeightedText {
                field: TextField::Keywords,
                text: String::from_utf8_lossy(&meta.keywords).into_owned(),
            },
            WeightedText {
                field: TextField::Description,
                text: String::from_utf8_lossy(&meta.description).into_owned(),
            },
            WeightedText {
                field: TextField::Body,
                text: String::from_utf8_lossy(&stripped.text).into_owned(),
            },
        ];

        engine.replace_document(path, &payload, &sections)?;
        Ok(true)
    }

    /// Index every matching file under `root` and commit.
    ///
    /// Per-file read or indexing failures are logged and counted as
    /// skips; a document-level problem never aborts the run.
    pub fn index_directory<E: IndexEngine>(
        &self,
        engine: &mut E,
        walker: &FileWalker,
        root: &Path,
    ) -> crate::core::error::Result<IndexStats> {
        let start = Instant::now();

        tracing::info!("Starting file collection from {:?}", root);
        let files = walker.collect_files(root)?;
        tracing::info!("Found {} candidate files", files.len());

        let mut files_indexed = 0;
        let mut files_skipped = 0;

        for file_path in &files {
            let key = document_key(root, file_path);
            let outcome = fs::read(file_path)
                .map_err(Into::into)
                .and_then(|buffer| self.index_document(engine, &buffer, &key));
            match outcome {
                Ok(true) => {
                    files_indexed += 1;
                    tracing::debug!("Indexed {key}");
                }
                Ok(false) => {
                    files_skipped += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to process {:?}: {}", file_path, e);
                    files_skipped += 1;
                }
            }
        }

        engine.commit()?;

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Indexing complete: {} files indexed, {} skipped in {}ms",
            files_indexed,
            files_skipped,
            duration_ms
        );

        Ok(IndexStats {
            files_indexed,
            files_skipped,
            duration_ms,
        })
    }
}

/// Document key: the site-relative path with a leading slash, which
/// doubles as the fallback link target when a page has no canonical
/// URL
fn document_key(root: &Path, file_path: &Path) -> String {
    let relative = file_path.strip_prefix(root).unwrap_or(file_path);
    let mut key = String::from("/");
    key.push_str(&relative.to_string_lossy().replace('\\', "/"));
    key
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}
