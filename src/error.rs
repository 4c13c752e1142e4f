//! Error types for sanetap.

use std::io;
use thiserror::Error;

/// Result type alias for sanetap operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while rendering content or emitting streams.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading input or writing messages.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input could not be parsed or serialized as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A new-format block carries a `type` the renderer does not know.
    #[error("Unexpected block type `{block_type}`: {raw}")]
    UnrecognizedBlockType {
        /// The offending type tag (`<missing>` when absent)
        block_type: String,
        /// The raw block as JSON
        raw: String,
    },

    /// A block lacks a field its classification requires, or has the wrong shape.
    #[error("Malformed block, missing or invalid `{field}`: {raw}")]
    MalformedBlock {
        /// Name of the field that failed validation
        field: &'static str,
        /// The raw block as JSON
        raw: String,
    },

    /// Stream name not present in the catalog.
    #[error("Unknown stream: {0}")]
    UnknownStream(String),

    /// Configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Source rows are not in the expected layout.
    #[error("Invalid source data: {0}")]
    InvalidSource(String),

    /// A state file could not be interpreted.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl Error {
    /// Build an [`Error::UnrecognizedBlockType`] from the raw block.
    pub fn unrecognized(block_type: impl Into<String>, raw: &serde_json::Value) -> Self {
        Error::UnrecognizedBlockType {
            block_type: block_type.into(),
            raw: raw.to_string(),
        }
    }

    /// Build an [`Error::MalformedBlock`] from the raw block.
    pub fn malformed(field: &'static str, raw: &serde_json::Value) -> Self {
        Error::MalformedBlock {
            field,
            raw: raw.to_string(),
        }
    }

    /// Whether this error comes from block classification.
    pub fn is_block_error(&self) -> bool {
        matches!(
            self,
            Error::UnrecognizedBlockType { .. } | Error::MalformedBlock { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_display() {
        let err = Error::unrecognized("unknown_widget", &json!({"type": "unknown_widget"}));
        assert_eq!(
            err.to_string(),
            r#"Unexpected block type `unknown_widget`: {"type":"unknown_widget"}"#
        );

        let err = Error::UnknownStream("sane_things".to_string());
        assert_eq!(err.to_string(), "Unknown stream: sane_things");
    }

    #[test]
    fn test_malformed_names_field() {
        let err = Error::malformed("text", &json!({}));
        assert!(err.to_string().contains("`text`"));
        assert!(err.is_block_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_block_error());
    }
}
