//! Value release strategies.
//!
//! The trie hands every value it gives up (overwritten, deleted, cleared or torn
//! down) to the strategy it was built with. The default simply drops the value.

/// Receives values the trie no longer owns.
pub trait ReleaseStrategy<V> {
    /// Takes ownership of a value leaving the trie.
    fn release(&mut self, value: V);
}

/// Drops released values.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DropRelease;

impl<V> ReleaseStrategy<V> for DropRelease {
    fn release(&mut self, value: V) {
        drop(value);
    }
}

/// Adapts a closure into a [`ReleaseStrategy`].
///
/// ```
/// use lanai_lib::data_structures::lanai_trie::{LanaiTrie, ReleaseFn};
///
/// let mut released = 0;
/// {
///     let mut trie = LanaiTrie::with_release(ReleaseFn(|_: u32| released += 1));
///     trie.insert(b"key", 1).unwrap();
///     trie.insert(b"key", 2).unwrap();
/// }
/// assert_eq!(released, 2);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ReleaseFn<F>(pub F);

impl<V, F> ReleaseStrategy<V> for ReleaseFn<F>
where
    F: FnMut(V),
{
    fn release(&mut self, value: V) {
        (self.0)(value)
    }
}
