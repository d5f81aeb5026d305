/*!
 * Error types for the tmxio library.
 *
 * This module contains the custom error type for TMX parsing and
 * serialization, using the thiserror crate for ergonomic error definitions.
 */

use std::fmt::Display;

use thiserror::Error;

/// Errors that can occur while reading or writing TMX documents
#[derive(Error, Debug)]
pub enum TmxError {
    /// The document or element does not follow the TMX structure.
    /// Fatal to the operation in progress; no partial document is returned.
    #[error("Invalid TMX format: {0}")]
    InvalidFormat(String),

    /// File system failure during read or write. Distinguished from
    /// `InvalidFormat` so callers can retry I/O but not format errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Indexed access beyond the unit count
    #[error("Index {index} out of range: document has {len} translation units")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of translation units in the document
        len: usize,
    },
}

impl TmxError {
    /// Wrap any quick-xml error (reader, writer, escaping, attributes)
    /// as a format error.
    pub(crate) fn xml<E: Display>(err: E) -> Self {
        TmxError::InvalidFormat(err.to_string())
    }
}

/// Result type for TMX operations
pub type Result<T> = std::result::Result<T, TmxError>;
