//! Prefix-bounded traversal of a Lanai Trie.
//!
//! The iterator walks a subtree without recursion. Its frontier lives in two
//! stacks kept in lockstep: nodes still to visit, and the offset in the key buffer
//! where each node's segment has to be written. Children are pushed in reverse
//! order so that popping visits them in ascending byte order, which makes the whole
//! enumeration lexicographic.

use crate::data_structures::alloc::{self, AllocError};
use crate::data_structures::stack::Stack;

use super::locate::locate;
use super::node::TrieNode;

/// Ascending enumeration of the keys below a prefix.
///
/// Created by [`LanaiTrie::find_all`](super::LanaiTrie::find_all). The iterator
/// borrows the trie, so the trie cannot change while it is alive.
///
/// Two ways to consume it:
/// * cursor style, reading [`key`](Self::key) and [`value`](Self::value) and
///   moving on with [`advance`](Self::advance), which reuses one key buffer;
/// * as an [`Iterator`] over owned keys and borrowed values.
///
/// Running out of memory while stepping ends the enumeration early; it is not
/// reported separately from exhaustion.
#[derive(Debug)]
pub struct PrefixIter<'a, V> {
    /// Key of the current position; never grows past `max_key_len`
    key: Vec<u8>,
    max_key_len: usize,
    pending: Stack<&'a TrieNode<V>>,
    offsets: Stack<usize>,
    current: Option<&'a V>,
}

/// Outcome of a single traversal step.
enum Step {
    /// The visited node holds a value.
    Valid,
    /// The visited node holds no value or was pruned.
    Continue,
    /// Nothing left to visit, or the frontier could not grow.
    Done,
}

impl<'a, V> PrefixIter<'a, V> {
    /// Positions a new iterator on the subtree matched by `prefix`.
    ///
    /// Returns `Ok(None)` when no key in the trie starts with `prefix`.
    pub(crate) fn new(
        root: &'a TrieNode<V>,
        prefix: &[u8],
        max_key_len: usize,
    ) -> Result<Option<Self>, AllocError> {
        let located = locate(root, prefix);
        if !located.mismatch.key_consumed(prefix) {
            return Ok(None);
        }

        let rest = located
            .node
            .segment()
            .get(located.mismatch.seg_pos..)
            .unwrap_or_default();
        Self::at_node(located.node, prefix, rest, max_key_len).map(Some)
    }

    /// Starts an iterator on `node`, whose full key is `head` followed by `tail`.
    pub(crate) fn at_node(
        node: &'a TrieNode<V>,
        head: &[u8],
        tail: &[u8],
        max_key_len: usize,
    ) -> Result<Self, AllocError> {
        let truncated_len = head.len() + tail.len();

        let mut iter = Self {
            key: Vec::new(),
            max_key_len,
            pending: Stack::new(),
            offsets: Stack::new(),
            current: None,
        };

        if truncated_len > max_key_len {
            tracing::debug!(truncated_len, max_key_len, "Prefix exceeds key length ceiling");
            return Ok(iter);
        }

        alloc::reserve_exact(&mut iter.key, max_key_len)?;
        iter.key.extend_from_slice(head);
        iter.key.extend_from_slice(tail);

        iter.push_children(node, truncated_len)?;

        tracing::debug!(truncated_len, max_key_len, "Created prefix iterator");

        iter.current = node.value();
        if iter.current.is_none() {
            iter.advance();
        }
        Ok(iter)
    }

    /// Key at the current position, or `None` once exhausted.
    pub fn key(&self) -> Option<&[u8]> {
        self.current.map(|_| self.key.as_slice())
    }

    /// Value at the current position, or `None` once exhausted.
    pub fn value(&self) -> Option<&'a V> {
        self.current
    }

    /// Whether the iterator is positioned on an entry.
    pub fn is_valid(&self) -> bool {
        self.current.is_some()
    }

    /// Moves to the next entry. Returns `false` once the iterator is exhausted.
    pub fn advance(&mut self) -> bool {
        loop {
            match self.step() {
                Step::Valid => return true,
                Step::Continue => continue,
                Step::Done => {
                    self.finish();
                    return false;
                }
            }
        }
    }

    /// Visits one node from the frontier.
    fn step(&mut self) -> Step {
        let (Some(node), Some(offset)) = (self.pending.pop(), self.offsets.pop()) else {
            return Step::Done;
        };

        let end = offset + node.segment().len();
        if end > self.max_key_len {
            return Step::Continue;
        }

        self.key.truncate(offset);
        self.key.extend_from_slice(node.segment());

        if self.push_children(node, end).is_err() {
            tracing::debug!(depth = end, "Frontier allocation failed, ending enumeration");
            return Step::Done;
        }

        match node.value() {
            Some(value) => {
                self.current = Some(value);
                Step::Valid
            }
            None => Step::Continue,
        }
    }

    fn push_children(&mut self, node: &'a TrieNode<V>, offset: usize) -> Result<(), AllocError> {
        for child in node.children().iter().rev() {
            self.pending.push(child)?;
            self.offsets.push(offset)?;
        }
        Ok(())
    }

    /// Drops the position and the frontier storage.
    fn finish(&mut self) {
        self.current = None;
        self.pending = Stack::new();
        self.offsets = Stack::new();
    }
}

impl<'a, V> Iterator for PrefixIter<'a, V> {
    type Item = (Vec<u8>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.current?;
        let item = match alloc::copy_bytes(&self.key) {
            Ok(key) => Some((key, value)),
            Err(_) => None,
        };

        if item.is_some() {
            self.advance();
        } else {
            self.finish();
        }
        item
    }
}

impl<'a, V> std::iter::FusedIterator for PrefixIter<'a, V> {}
