//! Error types for spatialconv

use thiserror::Error;

/// Main error type for spatialconv operations
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed construction or parameter input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A conversion failed part way; batch conversions abort on the first one
    #[error("Computation failure: {0}")]
    ComputationFailure(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }
}

/// Result type alias for spatialconv operations
pub type Result<T> = std::result::Result<T, Error>;
