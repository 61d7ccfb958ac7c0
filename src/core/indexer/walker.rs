//! Document-root traversal with pattern-based filtering.
//!
//! Walks a site's document root collecting the HTML files to index.
//! Permission errors and other per-entry failures are logged and
//! skipped, never fatal.

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{Result, SitefindError};

/// File system walker with glob include/exclude filtering
pub struct FileWalker {
    /// Patterns to include (e.g., "*.html", "*.htm")
    include_patterns: Vec<Pattern>,

    /// Patterns to exclude (e.g., "**/drafts/**")
    exclude_patterns: Vec<Pattern>,

    /// Maximum file size in bytes (skip larger files)
    max_file_size_bytes: u64,
}

impl FileWalker {
    /// Create a walker; fails if any glob pattern is invalid
    pub fn new(
        include_patterns: Vec<String>,
        exclude_patterns: Vec<String>,
        max_file_size_mb: usize,
    ) -> Result<Self> {
        let compile = |patterns: Vec<String>| {
            patterns
                .into_iter()
                .map(|p| {
                    Pattern::new(&p)
                        .map_err(|e| SitefindError::ConfigError(format!("Invalid pattern '{p}': {e}")))
                })
                .collect::<Result<Vec<_>>>()
        };

        Ok(Self {
            include_patterns: compile(include_patterns)?,
            exclude_patterns: compile(exclude_patterns)?,
            max_file_size_bytes: (max_file_size_mb as u64) * 1024 * 1024,
        })
    }

    /// Collect every matching file under `root`, depth-first
    pub fn collect_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| self.should_process_entry(e, root))
        {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if let Ok(metadata) = entry.metadata() {
                        if metadata.len() > self.max_file_size_bytes {
                            tracing::debug!(
                                "Skipping large file: {:?} ({} bytes)",
                                path,
                                metadata.len()
                            );
                            continue;
                        }
                    }

                    if self.matches_patterns(path) {
                        files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                }
            }
        }

        Ok(files)
    }

    /// Directory-level filter: hidden directories and excluded trees
    /// are pruned early; the root itself is never filtered
    fn should_process_entry(&self, entry: &DirEntry, root: &Path) -> bool {
        let path = entry.path();
        if path == root {
            return true;
        }

        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.starts_with('.') && entry.file_type().is_dir() {
                return false;
            }
        }

        if entry.file_type().is_dir() {
            for pattern in &self.exclude_patterns {
                if pattern.matches_path(path) {
                    tracing::debug!("Skipping excluded directory: {:?}", path);
                    return false;
                }
            }
        }

        true
    }

    /// File-level include/exclude check, against both the full path
    /// and the bare filename
    fn matches_patterns(&self, path: &Path) -> bool {
        let Some(path_str) = path.to_str() else {
            return false;
        };

        let matches_include = self.include_patterns.is_empty()
            || self.include_patterns.iter().any(|p| {
                p.matches(path_str)
                    || path
                        .file_name()
                        .and_then(|f| f.to_str())
                        .map(|f| p.matches(f))
                        .unwrap_or(false)
            });
        if !matches_include {
            return false;
        }

        !self
            .exclude_patterns
            .iter()
            .any(|p| p.matches(path_str) || p.matches_path(path))
    }
}
