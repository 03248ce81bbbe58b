// Copyright (c) 2025 Lanai Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Growable LIFO stack with fallible pushes.
//!
//! A thin wrapper over a `Vec` whose growth reports allocation failure instead of
//! aborting. The prefix iterator keeps its traversal frontier in two of these.
//!
//! # Example
//!
//! ```
//! use lanai_lib::data_structures::stack::Stack;
//!
//! let mut stack = Stack::new();
//! stack.push(1).unwrap();
//! stack.push(2).unwrap();
//!
//! assert_eq!(stack.peek(), Some(&2));
//! assert_eq!(stack.pop(), Some(2));
//! assert_eq!(stack.pop(), Some(1));
//! assert!(stack.is_empty());
//! ```

use crate::data_structures::alloc::{self, AllocError};

/// A last-in, first-out container.
#[derive(Debug, Clone)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Stack<T> {
    /// Creates an empty stack. Does not allocate.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates an empty stack with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Result<Self, AllocError> {
        let mut items = Vec::new();
        alloc::reserve_exact(&mut items, capacity)?;
        Ok(Self { items })
    }

    /// Pushes `item` on top of the stack.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if the stack had to grow and the allocation failed.
    /// The stack is unchanged in that case and `item` is dropped.
    pub fn push(&mut self, item: T) -> Result<(), AllocError> {
        alloc::reserve(&mut self.items, 1)?;
        self.items.push(item);
        Ok(())
    }

    /// Removes and returns the top item, or `None` if the stack is empty.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Returns the top item without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    /// Returns `true` if the stack holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items on the stack.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Drops every item, keeping the allocation.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Consumes the stack, handing every item to `release` from top to bottom.
    pub fn destroy_with<F>(mut self, mut release: F)
    where
        F: FnMut(T),
    {
        while let Some(item) = self.items.pop() {
            release(item);
        }
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::alloc::failpoint;

    #[test]
    fn test_lifo_order() {
        let mut stack = Stack::new();
        for i in 0..5 {
            stack.push(i).unwrap();
        }
        assert_eq!(stack.len(), 5);

        let popped: Vec<_> = std::iter::from_fn(|| stack.pop()).collect();
        assert_eq!(popped, vec![4, 3, 2, 1, 0]);
        assert!(stack.is_empty());
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.peek(), None);
    }

    #[test]
    fn test_destroy_with_releases_every_item() {
        let mut stack = Stack::with_capacity(3).unwrap();
        stack.push("a").unwrap();
        stack.push("b").unwrap();
        stack.push("c").unwrap();

        let mut released = Vec::new();
        stack.destroy_with(|item| released.push(item));
        assert_eq!(released, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_failed_push_leaves_stack_unchanged() {
        let mut stack = Stack::new();
        stack.push(1u32).unwrap();
        while stack.len() < stack.items.capacity() {
            stack.push(1).unwrap();
        }
        let before = stack.len();

        failpoint::arm(0);
        assert!(stack.push(2).is_err());
        failpoint::disarm();

        assert_eq!(stack.len(), before);
        assert_eq!(stack.peek(), Some(&1));
    }

    #[test]
    fn test_clear() {
        let mut stack = Stack::new();
        stack.push(10).unwrap();
        stack.push(20).unwrap();
        stack.clear();
        assert!(stack.is_empty());
    }
}
