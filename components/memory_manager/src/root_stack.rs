//! Stacks whose entries are GC roots.

use crate::handle::Handle;
use crate::heap::Heap;

/// A LIFO stack of handles that keeps every entry pinned in a heap.
///
/// Pushing pins the handle and popping unpins it, so the same handle may
/// sit on the stack several times and stays rooted until the last copy is
/// popped. The stack does not own the heap: the owner must call
/// [`RootStack::clear`] before dropping it, otherwise the remaining pins
/// leak into the heap's root set.
#[derive(Debug, Default)]
pub struct RootStack {
    entries: Vec<Handle>,
}

impl RootStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty stack with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Pushes `handle` and pins it in `heap`.
    pub fn push<T>(&mut self, heap: &mut Heap<T>, handle: Handle) {
        heap.pin(handle);
        self.entries.push(handle);
    }

    /// Pops the top entry and releases its pin.
    pub fn pop<T>(&mut self, heap: &mut Heap<T>) -> Option<Handle> {
        let handle = self.entries.pop()?;
        heap.unpin(handle);
        Some(handle)
    }

    /// Returns the top entry.
    pub fn top(&self) -> Option<Handle> {
        self.entries.last().copied()
    }

    /// Returns the entry `depth` positions below the top.
    pub fn peek(&self, depth: usize) -> Option<Handle> {
        let len = self.entries.len();
        if depth < len {
            Some(self.entries[len - 1 - depth])
        } else {
            None
        }
    }

    /// Pops every entry, releasing each pin.
    pub fn clear<T>(&mut self, heap: &mut Heap<T>) {
        while self.pop(heap).is_some() {}
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the stack holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries from bottom to top.
    pub fn as_slice(&self) -> &[Handle] {
        &self.entries
    }
}
