//! Error types for ruleset and input loading.
//!
//! Evaluation itself never fails; these errors only come from the file and
//! JSON boundary in [`crate::loader`].

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a ruleset or an input record.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Failed to read a document from disk.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document was not valid JSON or did not match the expected shape.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, EngineError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_display_names_path() {
        let err = EngineError::Read {
            path: PathBuf::from("/tmp/rules.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/rules.json"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn json_error_from_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad}").unwrap_err();
        let err: EngineError = json_err.into();
        assert!(matches!(err, EngineError::Json(_)));
        assert!(err.to_string().starts_with("failed to parse JSON"));
    }
}
