//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur while converting a file group.
#[derive(Debug, Error)]
pub enum Error {
    /// Structural message parsing failed.
    #[error("Message error: {0}")]
    Mime(#[from] mailcorpus_mime::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Directory traversal error.
    #[error("Directory traversal error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Date header could not be turned into an absolute timestamp.
    #[error("Invalid date: {raw:?}")]
    InvalidDate {
        /// The header value as found in the message.
        raw: String,
    },

    /// Category line with fewer than two comma-separated fields.
    #[error("Malformed category on line {line}: {content:?}")]
    MalformedCategory {
        /// One-based line number.
        line: usize,
        /// The offending line, terminator stripped.
        content: String,
    },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
