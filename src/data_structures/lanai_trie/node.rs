//! Node implementation for the Lanai Trie.
//!
//! A node stores the run of key bytes consumed between its parent and itself (its
//! segment), its children sorted ascending by first segment byte, and an optional
//! value. The structural primitives here, the child array operations and
//! split/merge, never leave a node half-modified: every allocation they need is
//! made before the first write.

use std::mem;

use crate::data_structures::alloc::{self, AllocError};

/// A node in the Lanai Trie.
#[derive(Debug)]
pub(crate) struct TrieNode<V> {
    /// Key bytes between the parent and this node. Empty only for the root.
    segment: Vec<u8>,

    /// Children, strictly ascending by first segment byte
    children: Vec<TrieNode<V>>,

    /// Value stored for the key ending at this node
    value: Option<V>,
}

impl<V> TrieNode<V> {
    /// Creates the root node: empty segment, no children, no value.
    pub(crate) fn root() -> Self {
        Self {
            segment: Vec::new(),
            children: Vec::new(),
            value: None,
        }
    }

    /// Creates a childless node holding `value`.
    pub(crate) fn leaf(segment: Vec<u8>, value: V) -> Self {
        Self {
            segment,
            children: Vec::new(),
            value: Some(value),
        }
    }

    pub(crate) fn segment(&self) -> &[u8] {
        &self.segment
    }

    pub(crate) fn children(&self) -> &[TrieNode<V>] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [TrieNode<V>] {
        &mut self.children
    }

    pub(crate) fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub(crate) fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Stores `value`, returning the one it replaces.
    pub(crate) fn replace_value(&mut self, value: V) -> Option<V> {
        self.value.replace(value)
    }

    pub(crate) fn take_value(&mut self) -> Option<V> {
        self.value.take()
    }

    /// First byte of the segment. Only the root has none.
    pub(crate) fn first_byte(&self) -> Option<u8> {
        self.segment.first().copied()
    }

    /// A node with one child and no value adds nothing but a hop.
    pub(crate) fn is_collapsible(&self) -> bool {
        self.value.is_none() && self.children.len() == 1
    }

    /// Index of the child whose first byte is the largest one `<= byte`.
    pub(crate) fn floor(&self, byte: u8) -> Option<usize> {
        // Linear scan; sortedness would also allow a binary search here.
        let mut floor = None;
        for (i, child) in self.children.iter().enumerate() {
            match child.first_byte() {
                Some(b) if b <= byte => floor = Some(i),
                _ => break,
            }
        }
        floor
    }

    /// Index of the child whose segment starts with `byte`.
    pub(crate) fn find_child(&self, byte: u8) -> Option<usize> {
        self.floor(byte)
            .filter(|&i| self.children[i].first_byte() == Some(byte))
    }

    /// Ensures `additional` children can be inserted without allocating.
    pub(crate) fn reserve_children(&mut self, additional: usize) -> Result<(), AllocError> {
        alloc::reserve(&mut self.children, additional)
    }

    /// Inserts `child` in sorted position and returns its index.
    ///
    /// The caller guarantees no existing child shares `child`'s first byte.
    /// On failure the node is unchanged and `child` is dropped.
    pub(crate) fn insert_child(&mut self, child: TrieNode<V>) -> Result<usize, AllocError> {
        let index = match child.first_byte().and_then(|b| self.floor(b)) {
            Some(floor) => floor + 1,
            None => 0,
        };
        debug_assert!(
            index == 0 || self.children[index - 1].first_byte() != child.first_byte(),
            "sibling first bytes must be unique"
        );

        self.reserve_children(1)?;
        self.children.insert(index, child);
        Ok(index)
    }

    /// Detaches the child at `index` and returns it with its subtree.
    ///
    /// With `shrink`, the child array is moved into an exactly sized buffer. If
    /// that buffer cannot be allocated the array keeps its spare capacity.
    pub(crate) fn remove_child(&mut self, index: usize, shrink: bool) -> TrieNode<V> {
        let child = self.children.remove(index);
        if shrink {
            self.shrink_children();
        }
        tracing::trace!(
            first_byte = child.first_byte(),
            remaining = self.children.len(),
            "Removed child"
        );
        child
    }

    fn shrink_children(&mut self) {
        if self.children.capacity() == self.children.len() {
            return;
        }
        let mut shrunk = Vec::new();
        match alloc::reserve_exact(&mut shrunk, self.children.len()) {
            Ok(()) => {
                shrunk.append(&mut self.children);
                self.children = shrunk;
            }
            Err(err) => tracing::debug!(error = %err, "Child array left unshrunk"),
        }
    }

    /// Takes every child out of the node.
    pub(crate) fn take_children(&mut self) -> Vec<TrieNode<V>> {
        mem::take(&mut self.children)
    }

    /// Splits the segment at byte offset `at`.
    ///
    /// The tail from `at` moves into a new sole child together with this node's
    /// children and value. The new child array is allocated with room for
    /// `children_capacity` entries (at least one) so a branch can be added without
    /// a further allocation. No-op when `at` is at or past the segment end.
    pub(crate) fn split(&mut self, at: usize, children_capacity: usize) -> Result<(), AllocError> {
        if at >= self.segment.len() {
            return Ok(());
        }

        let tail = alloc::copy_bytes(&self.segment[at..])?;
        let mut children = Vec::new();
        alloc::reserve_exact(&mut children, children_capacity.max(1))?;

        // Nothing below can fail.
        let child = TrieNode {
            segment: tail,
            children: mem::replace(&mut self.children, children),
            value: self.value.take(),
        };
        self.segment.truncate(at);
        self.children.push(child);

        tracing::trace!(at, head_len = self.segment.len(), "Split node");
        Ok(())
    }

    /// Absorbs the only child into this node.
    ///
    /// Valid only for a collapsible node. On failure the node is unchanged.
    pub(crate) fn merge(&mut self) -> Result<(), AllocError> {
        debug_assert!(self.is_collapsible(), "merge requires one child and no value");
        let Some(child_len) = self.children.first().map(|c| c.segment.len()) else {
            return Ok(());
        };

        alloc::reserve_exact(&mut self.segment, child_len)?;

        // Nothing below can fail.
        if let Some(child) = self.children.pop() {
            let TrieNode {
                segment,
                children,
                value,
            } = child;
            self.segment.extend_from_slice(&segment);
            self.children = children;
            self.value = value;
        }

        tracing::trace!(segment_len = self.segment.len(), "Merged node");
        Ok(())
    }
}
