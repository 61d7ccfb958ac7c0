//! Error types and error handling for sitefind.
//!
//! Every fallible core operation returns [`Result`]; there is no
//! shared "last error" slot. Extraction misses (a document without a
//! description, say) are plain empty values, not errors; only
//! genuine failures surface here.

use thiserror::Error;

/// Result type alias for sitefind operations
pub type Result<T> = std::result::Result<T, SitefindError>;

/// Main error type for sitefind
#[derive(Error, Debug)]
pub enum SitefindError {
    #[error("Unknown template directive: {0}")]
    TemplateParse(String),

    #[error("Malformed result payload: {0}")]
    Payload(String),

    #[error("Indexing failed: {0}")]
    IndexingFailed(String),

    #[error("Search failed: {0}")]
    SearchFailed(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl SitefindError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a bad input error (caller mistake, not ours)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            SitefindError::TemplateParse(_)
                | SitefindError::InvalidQuery(_)
                | SitefindError::ConfigError(_)
        )
    }

    /// Check if this failure should skip a single document rather
    /// than abort a batch
    pub fn is_document_local(&self) -> bool {
        matches!(
            self,
            SitefindError::IndexingFailed(_) | SitefindError::IoError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parse_is_bad_request() {
        let err = SitefindError::TemplateParse("bogus".to_string());
        assert!(err.is_bad_request());
        assert!(!err.is_document_local());
    }

    #[test]
    fn test_indexing_failed_is_document_local() {
        let err = SitefindError::IndexingFailed("unreadable".to_string());
        assert!(err.is_document_local());
        assert!(!err.is_bad_request());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = SitefindError::from(io_err);
        assert!(err.is_document_local());
    }

    #[test]
    fn test_serde_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = SitefindError::from(json_err);
        assert!(matches!(err, SitefindError::SerdeError(_)));
        assert!(err.message().contains("Serialization"));
    }

    #[test]
    fn test_error_message_names_directive() {
        let err = SitefindError::TemplateParse("shout".to_string());
        assert!(err.message().contains("shout"));
        assert!(err.message().contains("directive"));
    }
}
