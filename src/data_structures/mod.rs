//! Data structures for the Lanai index.
//!
//! This module contains the compressed trie engine and the collaborators it is
//! built from. All implementations adhere to the same rules:
//! - No unsafe code
//! - Allocation failure is reported through `Result`, never by aborting
//! - No recursion proportional to key length or tree depth

pub(crate) mod alloc;
pub mod lanai_trie;
pub mod stack;

// Re-export common data structures
pub use alloc::AllocError;
pub use lanai_trie::{LanaiTrie, LanaiTrieConfig, LanaiTrieError, LanaiTrieResult, PrefixIter};
pub use stack::Stack;
