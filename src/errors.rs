use std::io;

use thiserror::Error;

/// Error type for splitter configuration, parsing, and output failures.
#[derive(Debug, Error)]
pub enum SplitterError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: regex::Error,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("fold assignment invariant violated: {0}")]
    Invariant(String),
}
