//! Configuration management for sitefind.
//!
//! Configuration is loaded from a TOML file with sensible defaults
//! for every setting, plus a handful of environment overrides.

use crate::core::error::{Result, SitefindError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Indexing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Stemming language passed to the index engine
    #[serde(default = "default_language")]
    pub language: String,

    /// Class/robots token marking content that must not be indexed
    #[serde(default = "default_noindex_token")]
    pub noindex_token: String,

    /// Maximum file size in MB (skip larger files)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: usize,

    /// File patterns to include (glob syntax)
    #[serde(default = "default_include_patterns")]
    pub include_patterns: Vec<String>,

    /// File patterns to exclude (glob syntax)
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding the search index
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Maximum results returned per query
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Maximum query string length
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,

    /// Optional results-page template (parsed once at startup)
    #[serde(default)]
    pub template: Option<PathBuf>,
}

// Default value functions
fn default_language() -> String {
    "en".to_string()
}

fn default_noindex_token() -> String {
    "nointernalindex".to_string()
}

fn default_max_file_size() -> usize {
    10
}

fn default_index_dir() -> PathBuf {
    PathBuf::from("./sitefind_index")
}

fn default_max_results() -> usize {
    12
}

fn default_max_query_length() -> usize {
    1024
}

fn default_include_patterns() -> Vec<String> {
    vec!["*.html".to_string(), "*.htm".to_string()]
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        "**/.git/**".to_string(),
        "**/node_modules/**".to_string(),
        "**/sitefind_index/**".to_string(),
    ]
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            noindex_token: default_noindex_token(),
            max_file_size_mb: default_max_file_size(),
            include_patterns: default_include_patterns(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            index_dir: default_index_dir(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            max_query_length: default_max_query_length(),
            template: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| SitefindError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    ///
    /// Looks for `SITEFIND_CONFIG`, then `./sitefind.toml`, then
    /// falls back to defaults.
    pub fn load() -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("SITEFIND_CONFIG") {
            Self::from_file(config_path)?
        } else if Path::new("sitefind.toml").exists() {
            Self::from_file("sitefind.toml")?
        } else {
            Self::default()
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(index_dir) = env::var("SITEFIND_INDEX_DIR") {
            self.storage.index_dir = PathBuf::from(index_dir);
        }
        if let Ok(language) = env::var("SITEFIND_LANGUAGE") {
            self.indexing.language = language;
        }
        if let Ok(max_results) = env::var("SITEFIND_MAX_RESULTS") {
            if let Ok(n) = max_results.parse() {
                self.search.max_results = n;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.search.max_results == 0 {
            return Err(SitefindError::ConfigError(
                "search.max_results must be > 0".to_string(),
            ));
        }
        if self.indexing.noindex_token.is_empty() {
            return Err(SitefindError::ConfigError(
                "indexing.noindex_token must not be empty".to_string(),
            ));
        }
        if self
            .indexing
            .noindex_token
            .bytes()
            .any(|b| b.is_ascii_whitespace())
        {
            return Err(SitefindError::ConfigError(
                "indexing.noindex_token must be a single class token".to_string(),
            ));
        }
        Ok(())
    }

    /// Log effective configuration at startup
    pub fn log_config(&self) {
        tracing::info!("Index directory: {:?}", self.storage.index_dir);
        tracing::info!("Stemming language: {}", self.indexing.language);
        tracing::info!(
            "Include patterns: {}",
            self.indexing.include_patterns.join(", ")
        );
        tracing::info!("Max results: {}", self.search.max_results);
        if let Some(tmpl) = &self.search.template {
            tracing::info!("Results template: {:?}", tmpl);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.search.max_results, 12);
        assert_eq!(config.indexing.noindex_token, "nointernalindex");
        assert_eq!(config.indexing.language, "en");
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
            [search]
            max_results = 25

            [indexing]
            language = "de"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.search.max_results, 25);
        assert_eq!(config.indexing.language, "de");
        // Unspecified sections keep defaults
        assert_eq!(config.storage.index_dir, default_index_dir());
        assert_eq!(config.indexing.noindex_token, "nointernalindex");
    }

    #[test]
    fn test_zero_max_results_rejected() {
        let config: Config = toml::from_str("[search]\nmax_results = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_whitespace_noindex_token_rejected() {
        let config: Config = toml::from_str("[indexing]\nnoindex_token = \"two words\"").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_template_path_parsed() {
        let config: Config =
            toml::from_str("[search]\ntemplate = \"results.html\"").unwrap();
        assert_eq!(config.search.template, Some(PathBuf::from("results.html")));
    }
}
