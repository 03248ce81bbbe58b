//! Configuration for the Lanai Trie.

/// Configuration options for the Lanai Trie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanaiTrieConfig {
    /// Longest key `insert` accepts. `None` means unbounded.
    max_key_len: Option<usize>,

    /// Whether child arrays hand spare capacity back after a removal
    shrink_after_delete: bool,
}

impl LanaiTrieConfig {
    /// Create a new default configuration.
    ///
    /// Default values:
    /// - max_key_len: None (unbounded)
    /// - shrink_after_delete: false
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject keys longer than `max_key_len` bytes on insert.
    pub fn with_max_key_len(mut self, max_key_len: usize) -> Self {
        self.max_key_len = Some(max_key_len);
        self
    }

    /// Shrink a node's child array after one of its children is removed.
    ///
    /// Trades a reallocation per structural delete for a tighter memory footprint.
    /// Shrinking is best-effort: when the smaller array cannot be allocated the
    /// old one is kept and the delete still succeeds.
    pub fn with_shrink_after_delete(mut self, shrink: bool) -> Self {
        self.shrink_after_delete = shrink;
        self
    }

    /// Get the configured key length ceiling
    pub fn get_max_key_len(&self) -> Option<usize> {
        self.max_key_len
    }

    /// Get whether child arrays shrink after removals
    pub fn get_shrink_after_delete(&self) -> bool {
        self.shrink_after_delete
    }
}
