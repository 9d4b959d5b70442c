//! Stable handles into the heap registry.

use std::fmt;

/// A non-owning reference to a value registered with a [`Heap`](crate::Heap).
///
/// Handles are an arena index paired with the generation of the slot at
/// allocation time. When a collection sweeps the slot its generation is
/// bumped, so a handle that outlived its value no longer resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns the arena slot index of this handle.
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }

    /// Returns the slot generation this handle was issued for.
    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}
