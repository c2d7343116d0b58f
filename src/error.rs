//! Error types for the line reading library.
//!
//! This module defines the error surface for input normalization, chunk
//! pulls, and window queries.

use thiserror::Error;

/// Convenience type alias for Results using [`ReadError`].
pub type Result<T, E = ReadError> = std::result::Result<T, E>;

/// Errors raised while setting up or driving a line reader.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReadError {
    /// I/O error while pulling a chunk from the underlying source.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error while pulling a chunk from a response body.
    #[cfg(feature = "reqwest")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The encoding label is not a known WHATWG encoding.
    #[error("unknown encoding label: {0:?}")]
    UnknownEncoding(String),

    /// The input does not match any shape this entry operation accepts.
    #[error("unsupported input kind: got {found}, expected {expected}")]
    UnsupportedInput {
        /// The kind of input that was supplied.
        found: &'static str,
        /// The kind(s) the entry operation accepts.
        expected: &'static str,
    },
}

/// Window query called with `after < before`.
///
/// Fatal to the query call only; consuming the underlying sequence is
/// unaffected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid window range: after ({after}) < before ({before})")]
pub struct InvalidRange {
    /// Lower bound of the requested window, relative to the cursor.
    pub before: i64,
    /// Upper bound of the requested window, relative to the cursor.
    pub after: i64,
}
