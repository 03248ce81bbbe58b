//! Lanai Library
//!
//! This library contains the Lanai compressed trie index together with the
//! configuration, error reporting and logging plumbing used by the `lanai`
//! command-line tool. The library can also be used as a dependency by other
//! projects that only need the data structures.
//!
//! # Architecture
//!
//! Lanai is designed with the following principles in mind:
//! - Strict component boundaries
//! - Failure atomicity for every mutating trie operation
//! - Comprehensive error handling and propagation
//! - Bounded stack usage regardless of key length

// Re-export public modules
pub mod config;
pub mod data_structures;
pub mod error;
pub mod query;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

/// Version information for Lanai.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
