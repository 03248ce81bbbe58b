//! Error types for the Lanai Trie.
//!
//! This module defines the error types that can occur during Lanai Trie operations.

use crate::data_structures::alloc::AllocError;

/// Errors that can occur in Lanai Trie operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LanaiTrieError {
    /// A node buffer could not be allocated or grown.
    #[error("Allocation failed: {0}")]
    Allocation(#[from] AllocError),

    /// The key is longer than the configured ceiling.
    #[error("Key of {len} bytes exceeds maximum key length of {max}")]
    KeyTooLong {
        /// Length of the rejected key.
        len: usize,
        /// The configured maximum.
        max: usize,
    },
}

/// Result type for Lanai Trie operations
pub type LanaiTrieResult<T> = Result<T, LanaiTrieError>;
