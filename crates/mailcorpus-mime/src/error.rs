//! Error types for message parsing.

/// Result type alias for message parsing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Message parsing error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid content type.
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    /// Missing required header.
    #[error("Missing required header: {0}")]
    MissingHeader(String),
}
