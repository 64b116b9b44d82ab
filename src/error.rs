//! Error types for ip2region.

use thiserror::Error;

/// Error type for ip2region operations.
///
/// A lookup that lands in a gap between index blocks is not an error;
/// searches report it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum Error {
    /// Query string is not an IPv4 dotted-quad literal
    #[error("invalid IPv4 address: {0}")]
    InvalidAddress(String),

    /// IO error (open, seek or truncated read)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Index file violates a structural invariant
    #[error("corrupt index: {0}")]
    CorruptIndex(String),

    /// Unknown search algorithm name
    #[error("invalid search algorithm: {0}")]
    InvalidAlgorithm(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Global searcher not initialized
    #[error("searcher not initialized")]
    NotInitialized,
}

impl Error {
    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        Error::CorruptIndex(msg.into())
    }
}

/// Result type alias for ip2region operations.
pub type Result<T> = std::result::Result<T, Error>;
