//! Key descent shared by every trie operation.
//!
//! Walking a key down the trie ends at a *mismatch point*: the node where the key
//! diverges from the tree, the position inside that node's segment, and how much of
//! the key was consumed. Insert, delete, find and prefix enumeration all start from
//! this one descent.

use super::node::TrieNode;

/// Where a key stopped matching.
///
/// When the key runs out exactly at the end of a node's segment, `seg_pos` is set
/// one past the segment end. Callers can then treat "ends on this node" and "ends
/// inside this node" the same way: a split at `seg_pos` is a no-op in the first
/// case and creates the missing boundary in the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Mismatch {
    /// Cursor into the located node's segment
    pub seg_pos: usize,
    /// Number of key bytes consumed
    pub key_pos: usize,
}

impl Mismatch {
    /// The whole key was consumed.
    pub(crate) fn key_consumed(&self, key: &[u8]) -> bool {
        self.key_pos == key.len()
    }

    /// The key ended exactly at the located node's boundary.
    pub(crate) fn is_exact<V>(&self, node: &TrieNode<V>, key: &[u8]) -> bool {
        self.key_consumed(key) && self.seg_pos > node.segment().len()
    }

    /// The descent stopped strictly inside the located node's segment.
    pub(crate) fn is_mid_segment<V>(&self, node: &TrieNode<V>) -> bool {
        self.seg_pos < node.segment().len()
    }
}

/// Result of scanning a single node.
enum Scan {
    /// The key continues into the child at this index.
    Descend { child: usize, key_pos: usize },
    /// The key stops matching in this node.
    Stop(Mismatch),
}

/// Matches `key[key_pos..]` against `node`'s segment starting at `seg_pos`.
fn scan<V>(node: &TrieNode<V>, key: &[u8], mut seg_pos: usize, mut key_pos: usize) -> Scan {
    let segment = node.segment();
    while seg_pos < segment.len() && key_pos < key.len() {
        if segment[seg_pos] != key[key_pos] {
            return Scan::Stop(Mismatch { seg_pos, key_pos });
        }
        seg_pos += 1;
        key_pos += 1;
    }

    if key_pos == key.len() {
        if seg_pos == segment.len() {
            seg_pos += 1;
        }
        return Scan::Stop(Mismatch { seg_pos, key_pos });
    }

    match node.find_child(key[key_pos]) {
        Some(child) => Scan::Descend { child, key_pos },
        None => Scan::Stop(Mismatch { seg_pos, key_pos }),
    }
}

/// Read-only descent result.
#[derive(Debug)]
pub(crate) struct Located<'a, V> {
    pub node: &'a TrieNode<V>,
    pub parent: Option<&'a TrieNode<V>>,
    pub mismatch: Mismatch,
}

/// Walks `key` down from `root`.
pub(crate) fn locate<'a, V>(root: &'a TrieNode<V>, key: &[u8]) -> Located<'a, V> {
    let mut node = root;
    let mut parent = None;
    let mut seg_pos = 0;
    let mut key_pos = 0;

    loop {
        match scan(node, key, seg_pos, key_pos) {
            Scan::Descend { child, key_pos: at } => {
                parent = Some(node);
                node = &node.children()[child];
                seg_pos = 0;
                key_pos = at;
            }
            Scan::Stop(mismatch) => {
                return Located {
                    node,
                    parent,
                    mismatch,
                }
            }
        }
    }
}

/// Mutable descent result.
///
/// Holds the located node's parent (or the node itself when it is the root) so
/// that delete can restructure the parent after detaching the node.
#[derive(Debug)]
pub(crate) struct LocatedMut<'a, V> {
    holder: &'a mut TrieNode<V>,
    index: Option<usize>,
    parent_is_root: bool,
    pub mismatch: Mismatch,
}

impl<'a, V> LocatedMut<'a, V> {
    pub(crate) fn node(&mut self) -> &mut TrieNode<V> {
        match self.index {
            Some(i) => &mut self.holder.children_mut()[i],
            None => &mut *self.holder,
        }
    }

    pub(crate) fn is_root(&self) -> bool {
        self.index.is_none()
    }

    /// Splits into the parent and the located node's index within it.
    ///
    /// Returns `None` when the located node is the root.
    pub(crate) fn into_parent(self) -> Option<ParentSlot<'a, V>> {
        let index = self.index?;
        Some(ParentSlot {
            parent: self.holder,
            index,
            parent_is_root: self.parent_is_root,
        })
    }
}

/// A parent together with the position of one of its children.
#[derive(Debug)]
pub(crate) struct ParentSlot<'a, V> {
    pub parent: &'a mut TrieNode<V>,
    pub index: usize,
    pub parent_is_root: bool,
}

/// Walks `key` down from `root`, keeping mutable access to the path's tail.
pub(crate) fn locate_mut<'a, V>(root: &'a mut TrieNode<V>, key: &[u8]) -> LocatedMut<'a, V> {
    let mut holder = root;
    let mut index: Option<usize> = None;
    let mut parent_is_root = true;
    let mut seg_pos = 0;
    let mut key_pos = 0;

    loop {
        let node: &TrieNode<V> = match index {
            Some(i) => &holder.children()[i],
            None => &*holder,
        };

        match scan(node, key, seg_pos, key_pos) {
            Scan::Descend { child, key_pos: at } => {
                if let Some(i) = index {
                    holder = &mut holder.children_mut()[i];
                    parent_is_root = false;
                }
                index = Some(child);
                seg_pos = 0;
                key_pos = at;
            }
            Scan::Stop(mismatch) => {
                return LocatedMut {
                    holder,
                    index,
                    parent_is_root,
                    mismatch,
                }
            }
        }
    }
}
