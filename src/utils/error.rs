//! Error handling for the filter's outer layers.
//!
//! The three document passes never fail; only decoding, encoding and file
//! access can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterError {
    /// The input is not a Pandoc JSON document
    #[error("invalid Pandoc JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Reading or writing a file or stream failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// An environment declaration file could not be parsed
    #[error("invalid environment declarations: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The document was produced by an incompatible Pandoc
    #[error("unsupported pandoc-api-version {found:?} (expected 1.x, at least {expected:?})")]
    UnsupportedApiVersion { found: Vec<u32>, expected: Vec<u32> },
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
