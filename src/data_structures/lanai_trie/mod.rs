//! Lanai Trie Implementation
//!
//! This module provides a compressed trie (radix tree) mapping byte-string keys to
//! owned values. Chains of single-child nodes are collapsed into multi-byte
//! segments, so a lookup costs O(key length) no matter how many keys are stored.
//!
//! # Structure
//!
//! * Every node except the root either holds a value or has at least two children.
//! * A node's children are sorted ascending by the first byte of their segment and
//!   no two siblings share a first byte.
//! * The root has an empty segment. It is never removed or merged and may have a
//!   single child without holding a value.
//!
//! # Failure atomicity
//!
//! Node buffers grow through fallible reservations. An [`insert`](LanaiTrie::insert)
//! that runs out of memory leaves the trie exactly as it was. A
//! [`delete`](LanaiTrie::delete) always removes the key first; if the clean-up that
//! follows fails, the trie stays correct but may keep a redundant node until
//! [`compact`](LanaiTrie::compact) runs.
//!
//! # Example
//!
//! ```
//! use lanai_lib::data_structures::lanai_trie::LanaiTrie;
//!
//! let mut trie = LanaiTrie::new();
//! trie.insert(b"cat", 1).unwrap();
//! trie.insert(b"car", 2).unwrap();
//! trie.insert(b"dog", 3).unwrap();
//!
//! assert_eq!(trie.find(b"car"), Some(&2));
//! assert_eq!(trie.find(b"ca"), None);
//!
//! let keys: Vec<_> = trie
//!     .find_all(b"ca", 16)
//!     .unwrap()
//!     .expect("prefix is present")
//!     .map(|(key, value)| (String::from_utf8(key).unwrap(), *value))
//!     .collect();
//! assert_eq!(keys, vec![("car".to_string(), 2), ("cat".to_string(), 1)]);
//! ```

mod config;
#[cfg(test)]
pub(crate) mod debug;
mod error;
mod iter;
mod locate;
mod node;
mod release;

use crate::data_structures::alloc;
use crate::data_structures::stack::Stack;

pub use config::LanaiTrieConfig;
pub use error::{LanaiTrieError, LanaiTrieResult};
pub use iter::PrefixIter;
pub use release::{DropRelease, ReleaseFn, ReleaseStrategy};

use locate::{locate, locate_mut};
use node::TrieNode;

/// Lanai Trie is a compressed trie over byte-string keys.
///
/// Key features:
/// * O(key length) insert, delete and lookup
/// * Ascending, non-recursive prefix enumeration with a key length ceiling
/// * Values leaving the trie are handed to a configurable [`ReleaseStrategy`]
/// * Allocation failures are reported, never turned into aborts
///
/// The trie does no internal locking. Share it across threads behind a lock.
#[derive(Debug)]
pub struct LanaiTrie<V, R = DropRelease>
where
    R: ReleaseStrategy<V>,
{
    /// The root node of the trie
    root: TrieNode<V>,

    /// Receives every value the trie gives up
    release: R,

    /// Number of stored keys
    len: usize,

    /// Longest key ever inserted successfully
    max_key_len_added: usize,

    /// Configuration options
    config: LanaiTrieConfig,
}

impl<V> LanaiTrie<V> {
    /// Creates a new empty `LanaiTrie` with default configuration.
    ///
    /// Released values are dropped.
    pub fn new() -> Self {
        Self::with_config(LanaiTrieConfig::default())
    }

    /// Creates a new empty `LanaiTrie` with the specified configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the trie.
    pub fn with_config(config: LanaiTrieConfig) -> Self {
        Self::with_config_and_release(config, DropRelease)
    }
}

impl<V> Default for LanaiTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, R> LanaiTrie<V, R>
where
    R: ReleaseStrategy<V>,
{
    /// Creates a new empty `LanaiTrie` that hands released values to `release`.
    pub fn with_release(release: R) -> Self {
        Self::with_config_and_release(LanaiTrieConfig::default(), release)
    }

    /// Creates a new empty `LanaiTrie` with both a configuration and a release
    /// strategy.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the trie.
    /// * `release` - Strategy receiving overwritten, deleted and torn down values.
    pub fn with_config_and_release(config: LanaiTrieConfig, release: R) -> Self {
        Self {
            root: TrieNode::root(),
            release,
            len: 0,
            max_key_len_added: 0,
            config,
        }
    }

    /// Inserts a key-value pair into the trie.
    ///
    /// A value already stored under `key` is handed to the release strategy and
    /// replaced.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to insert. The empty key is a valid key.
    /// * `value` - The value to associate with the key.
    ///
    /// # Returns
    ///
    /// * `Ok(bool)` - `true` if a new key was inserted, `false` if the key was updated.
    /// * `Err(LanaiTrieError)` - If the key is too long or memory ran out. The trie
    ///   is left unchanged and `value` is dropped.
    pub fn insert<K>(&mut self, key: K, value: V) -> LanaiTrieResult<bool>
    where
        K: AsRef<[u8]>,
    {
        let key = key.as_ref();
        if let Some(max) = self.config.get_max_key_len() {
            if key.len() > max {
                return Err(LanaiTrieError::KeyTooLong {
                    len: key.len(),
                    max,
                });
            }
        }

        let mut located = locate_mut(&mut self.root, key);
        let mismatch = located.mismatch;
        let node = located.node();

        let is_new = if mismatch.key_consumed(key) {
            // Make the end of the key a node boundary
            node.split(mismatch.seg_pos, 1)?;
            match node.replace_value(value) {
                Some(old) => {
                    self.release.release(old);
                    false
                }
                None => true,
            }
        } else {
            let segment = alloc::copy_bytes(&key[mismatch.key_pos..])?;
            if mismatch.is_mid_segment(node) {
                node.split(mismatch.seg_pos, 2)?;
            } else {
                node.reserve_children(1)?;
            }
            node.insert_child(TrieNode::leaf(segment, value))?;
            true
        };

        if is_new {
            self.len += 1;
        }
        self.max_key_len_added = self.max_key_len_added.max(key.len());
        Ok(is_new)
    }

    /// Removes a key from the trie.
    ///
    /// The value is handed to the release strategy before the trie is compacted
    /// around the removed key.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to remove.
    ///
    /// # Returns
    ///
    /// * `Ok(bool)` - `true` if the key was removed, `false` if it wasn't found.
    /// * `Err(LanaiTrieError)` - The key was removed but merging the nodes around
    ///   it ran out of memory. Lookups are unaffected; [`compact`](Self::compact)
    ///   reclaims the leftover node.
    pub fn delete<K>(&mut self, key: K) -> LanaiTrieResult<bool>
    where
        K: AsRef<[u8]>,
    {
        let key = key.as_ref();
        let shrink = self.config.get_shrink_after_delete();

        let mut located = locate_mut(&mut self.root, key);
        let mismatch = located.mismatch;
        if !mismatch.is_exact(located.node(), key) {
            return Ok(false);
        }
        let Some(value) = located.node().take_value() else {
            return Ok(false);
        };
        self.release.release(value);
        self.len -= 1;

        if located.is_root() {
            return Ok(true);
        }

        match located.node().children().len() {
            0 => {
                if let Some(slot) = located.into_parent() {
                    drop(slot.parent.remove_child(slot.index, shrink));
                    if !slot.parent_is_root && slot.parent.is_collapsible() {
                        merge_after_delete(slot.parent)?;
                    }
                }
            }
            1 => merge_after_delete(located.node())?,
            _ => {}
        }

        Ok(true)
    }

    /// Retrieves the value stored under `key`.
    ///
    /// Never allocates and never fails.
    pub fn find<K>(&self, key: K) -> Option<&V>
    where
        K: AsRef<[u8]>,
    {
        let key = key.as_ref();
        let located = locate(&self.root, key);
        if located.mismatch.is_exact(located.node, key) {
            located.node.value()
        } else {
            None
        }
    }

    /// Checks if a key exists in the trie.
    pub fn contains_key<K>(&self, key: K) -> bool
    where
        K: AsRef<[u8]>,
    {
        self.find(key).is_some()
    }

    /// Enumerates every key starting with `prefix`, in ascending byte order.
    ///
    /// Keys longer than `max_key_len` bytes are skipped together with every key
    /// they prefix. The key equal to `prefix`, if stored, comes first; this
    /// includes the empty key when `prefix` is empty.
    ///
    /// # Arguments
    ///
    /// * `prefix` - The prefix to search for.
    /// * `max_key_len` - Length ceiling for enumerated keys.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(iter))` - An iterator positioned on the first match, if any.
    /// * `Ok(None)` - No stored key starts with `prefix`.
    /// * `Err(LanaiTrieError)` - The iterator's buffers could not be allocated.
    pub fn find_all<P>(&self, prefix: P, max_key_len: usize) -> LanaiTrieResult<Option<PrefixIter<'_, V>>>
    where
        P: AsRef<[u8]>,
    {
        Ok(PrefixIter::new(&self.root, prefix.as_ref(), max_key_len)?)
    }

    /// Enumerates the whole trie in ascending key order.
    pub fn iter(&self) -> LanaiTrieResult<PrefixIter<'_, V>> {
        Ok(PrefixIter::at_node(&self.root, b"", b"", self.max_key_len_added)?)
    }

    /// Returns the number of keys in the trie.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks if the trie is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Length of the longest key ever inserted successfully.
    ///
    /// Never decreases, not even when that key is deleted or the trie is cleared.
    pub fn max_key_len_added(&self) -> usize {
        self.max_key_len_added
    }

    /// Returns the trie configuration.
    pub fn config(&self) -> &LanaiTrieConfig {
        &self.config
    }

    /// Returns the release strategy.
    pub fn release_strategy(&self) -> &R {
        &self.release
    }

    /// Returns the release strategy mutably.
    pub fn release_strategy_mut(&mut self) -> &mut R {
        &mut self.release
    }

    /// Removes every key, handing each value to the release strategy.
    pub fn clear(&mut self) {
        let children = self.root.take_children();
        release_nodes(children, &mut self.release);
        if let Some(value) = self.root.take_value() {
            self.release.release(value);
        }
        self.len = 0;
    }

    /// Merges every node left redundant by a failed post-delete clean-up.
    ///
    /// Sweeps the trie until no node holds neither a value nor two children.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of repairs made. Zero for a trie that was compact.
    /// * `Err(LanaiTrieError)` - Memory ran out. Repairs made so far are kept and
    ///   the trie remains correct.
    pub fn compact(&mut self) -> LanaiTrieResult<usize> {
        let shrink = self.config.get_shrink_after_delete();
        let mut total = 0;
        loop {
            let repaired = sweep(&mut self.root, shrink)?;
            if repaired == 0 {
                break;
            }
            total += repaired;
        }
        tracing::debug!(repairs = total, "Compaction sweep finished");
        Ok(total)
    }
}

impl<V, R> Drop for LanaiTrie<V, R>
where
    R: ReleaseStrategy<V>,
{
    fn drop(&mut self) {
        self.clear();
    }
}

fn merge_after_delete<V>(node: &mut TrieNode<V>) -> LanaiTrieResult<()> {
    node.merge().map_err(|err| {
        tracing::warn!(error = %err, "Merge after delete failed, node left for compaction");
        LanaiTrieError::from(err)
    })
}

/// Releases whole subtrees, children before parents, without recursion.
fn release_nodes<V, R>(mut pending: Vec<TrieNode<V>>, release: &mut R)
where
    R: ReleaseStrategy<V>,
{
    while let Some(mut node) = pending.pop() {
        if node.children().is_empty() {
            if let Some(value) = node.take_value() {
                release.release(value);
            }
            continue;
        }
        let children = node.take_children();
        pending.push(node);
        pending.extend(children);
    }
}

/// One pre-order pass pruning valueless leaves and merging collapsible nodes.
fn sweep<V>(root: &mut TrieNode<V>, shrink: bool) -> LanaiTrieResult<usize> {
    let mut repaired = 0;
    let mut pending = Stack::new();
    pending.push(root)?;

    while let Some(node) = pending.pop() {
        let mut i = 0;
        while i < node.children().len() {
            let child = &node.children()[i];
            if !child.has_value() && child.children().is_empty() {
                drop(node.remove_child(i, shrink));
                repaired += 1;
            } else {
                i += 1;
            }
        }

        for child in node.children_mut() {
            while child.is_collapsible() {
                child.merge()?;
                repaired += 1;
            }
            pending.push(child)?;
        }
    }
    Ok(repaired)
}
