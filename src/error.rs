//! Error types for fallible tree operations.
//!
//! Looking up or erasing a missing element and inserting a duplicate are not
//! errors: those report through `Option`/`bool` return values.

use thiserror::Error;

/// Result type alias for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors that can occur when flattening a tree or building one from input.
#[derive(Error, Debug)]
pub enum TreeError {
    /// The destination buffer cannot hold every element of the tree.
    #[error("buffer too small: {needed} elements to drain, room for {available}")]
    CapacityExceeded {
        /// How many elements the tree holds.
        needed: usize,
        /// How many more elements the buffer could accept.
        available: usize,
    },

    /// A token could not be parsed into an element.
    #[error("cannot parse token {token:?}: {reason}")]
    Parse {
        /// The offending token.
        token: String,
        /// The parser's error message.
        reason: String,
    },

    /// Reading tokens failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
