//! Structure inspection for tests.

use super::node::TrieNode;
use super::{LanaiTrie, ReleaseStrategy};

/// One node in a pre-order dump: depth, segment, whether it holds a value.
pub(crate) type NodeShape = (usize, Vec<u8>, bool);

impl<V, R> LanaiTrie<V, R>
where
    R: ReleaseStrategy<V>,
{
    /// Pre-order dump of the node structure, children in stored order.
    pub(crate) fn shape(&self) -> Vec<NodeShape> {
        let mut shape = Vec::new();
        let mut pending: Vec<(usize, &TrieNode<V>)> = vec![(0, &self.root)];
        while let Some((depth, node)) = pending.pop() {
            shape.push((depth, node.segment().to_vec(), node.has_value()));
            for child in node.children().iter().rev() {
                pending.push((depth + 1, child));
            }
        }
        shape
    }

    /// Total number of nodes, the root included.
    pub(crate) fn node_count(&self) -> usize {
        self.shape().len()
    }

    /// Checks every structural invariant, describing the first violation found.
    pub(crate) fn check_invariants(&self) -> Result<(), String> {
        if !self.root.segment().is_empty() {
            return Err("root segment is not empty".to_string());
        }

        let mut values = usize::from(self.root.has_value());
        let mut pending: Vec<&TrieNode<V>> = self.root.children().iter().collect();
        check_siblings(&self.root)?;

        while let Some(node) = pending.pop() {
            if node.segment().is_empty() {
                return Err("non-root node with empty segment".to_string());
            }
            if !node.has_value() && node.children().len() < 2 {
                return Err(format!(
                    "node {:?} has no value and {} child(ren)",
                    String::from_utf8_lossy(node.segment()),
                    node.children().len()
                ));
            }
            check_siblings(node)?;
            values += usize::from(node.has_value());
            pending.extend(node.children());
        }

        if values != self.len {
            return Err(format!("len is {} but {} values are stored", self.len, values));
        }
        Ok(())
    }
}

fn check_siblings<V>(node: &TrieNode<V>) -> Result<(), String> {
    let firsts: Vec<Option<u8>> = node.children().iter().map(|c| c.first_byte()).collect();
    if firsts.windows(2).any(|w| w[0] >= w[1]) {
        return Err(format!(
            "children of {:?} not strictly ascending: {:?}",
            String::from_utf8_lossy(node.segment()),
            firsts
        ));
    }
    Ok(())
}
