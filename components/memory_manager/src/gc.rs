//! Mark-sweep tracing.
//!
//! Values tell the collector about their outgoing references through the
//! [`Trace`] trait. The collector walks the graph from the root set with an
//! explicit work list, so long reference chains never grow the host stack,
//! and the mark flag of each slot doubles as the visited guard that keeps
//! cycles and shared substructure from being scanned twice.

use crate::handle::Handle;
use crate::heap::Heap;

/// Implemented by every value stored in a [`Heap`].
pub trait Trace {
    /// Reports every handle this value holds to `tracer`.
    fn report_references(&self, tracer: &mut Tracer);
}

/// Collects the references reported during a traversal.
#[derive(Debug, Default)]
pub struct Tracer {
    pending: Vec<Handle>,
}

impl Tracer {
    /// Creates an empty tracer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports one outgoing reference.
    #[inline]
    pub fn visit(&mut self, handle: Handle) {
        self.pending.push(handle);
    }

    /// Reports an optional reference.
    #[inline]
    pub fn visit_opt(&mut self, handle: Option<Handle>) {
        if let Some(handle) = handle {
            self.pending.push(handle);
        }
    }

    /// Reports every reference yielded by `handles`.
    pub fn visit_all<I>(&mut self, handles: I)
    where
        I: IntoIterator<Item = Handle>,
    {
        self.pending.extend(handles);
    }

    /// Returns the references reported so far.
    pub fn reported(&self) -> &[Handle] {
        &self.pending
    }

    fn next(&mut self) -> Option<Handle> {
        self.pending.pop()
    }
}

/// Direction of a rooted traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Set the mark flag on every reachable value.
    Mark,
    /// Clear the mark flag on every reachable value.
    Unmark,
}

impl Phase {
    fn target(self) -> bool {
        matches!(self, Phase::Mark)
    }
}

/// Walks everything reachable from `roots`, flipping mark flags towards
/// the phase's target state. Returns the number of values visited.
///
/// A value whose flag already has the target state is not rescanned.
/// Handles that no longer resolve are skipped.
pub(crate) fn traverse<T: Trace>(heap: &mut Heap<T>, roots: &[Handle], phase: Phase) -> usize {
    let target = phase.target();
    let mut tracer = Tracer::new();
    tracer.visit_all(roots.iter().copied());

    let mut visited = 0;
    while let Some(handle) = tracer.next() {
        let Some(entry) = heap.entry_mut(handle) else {
            continue;
        };
        if entry.marked == target {
            continue;
        }
        entry.marked = target;
        visited += 1;
        entry.value.report_references(&mut tracer);
    }
    visited
}
