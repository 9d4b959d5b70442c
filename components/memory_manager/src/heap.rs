//! Heap registry with mark-sweep collection.
//!
//! The heap owns every value it hands out a [`Handle`] for. Values live in
//! arena slots; the mark flag is stored next to each value in its slot.
//!
//! Two kinds of roots seed a collection:
//! - host roots, an idempotent set maintained by [`Heap::add_root`] and
//!   [`Heap::remove_root`]
//! - pins, a counted set maintained by [`Heap::pin`] and [`Heap::unpin`],
//!   used by stacks that may hold the same handle several times
//!
//! Collection never runs on its own. Callers must make sure every value
//! they still need is reachable from a root when they call
//! [`Heap::collect`].

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, trace};

use crate::config::HeapConfig;
use crate::error::AllocError;
use crate::gc::{self, Phase, Trace};
use crate::handle::Handle;

/// A registered value together with its mark flag.
#[derive(Debug)]
pub(crate) struct Entry<T> {
    pub(crate) value: T,
    pub(crate) marked: bool,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    entry: Option<Entry<T>>,
}

/// Cumulative counters for a heap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GcStats {
    /// Number of completed collections
    pub collections: usize,
    /// Number of successful allocations
    pub allocations: usize,
    /// Number of values freed by collections
    pub freed: usize,
}

/// Outcome of a single [`Heap::collect`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionSummary {
    /// Values found reachable from the roots
    pub marked: usize,
    /// Values destroyed by the sweep
    pub freed: usize,
    /// Values still registered afterwards
    pub live: usize,
}

/// The heap registry.
pub struct Heap<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
    roots: HashSet<Handle>,
    pins: HashMap<Handle, usize>,
    config: HeapConfig,
    stats: GcStats,
}

impl<T> Heap<T> {
    /// Creates an empty heap with the default configuration.
    pub fn new() -> Self {
        Self::with_config(HeapConfig::default())
    }

    /// Creates an empty heap with a custom configuration.
    pub fn with_config(config: HeapConfig) -> Self {
        Self {
            slots: Vec::with_capacity(config.initial_capacity),
            free: Vec::new(),
            live: 0,
            roots: HashSet::new(),
            pins: HashMap::new(),
            config,
            stats: GcStats::default(),
        }
    }

    /// Registers a new value and returns its handle.
    ///
    /// On failure the value is dropped and the heap is left unchanged.
    pub fn alloc<V: Into<T>>(&mut self, value: V) -> Result<Handle, AllocError> {
        if let Some(limit) = self.config.max_objects {
            if self.live >= limit {
                return Err(AllocError::LimitReached { limit });
            }
        }

        let entry = Entry {
            value: value.into(),
            marked: false,
        };
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entry = Some(entry);
                Handle::new(index, slot.generation)
            }
            None => {
                let index = u32::try_from(self.slots.len()).map_err(|_| AllocError::OutOfMemory)?;
                self.slots
                    .try_reserve(1)
                    .map_err(|_| AllocError::OutOfMemory)?;
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                Handle::new(index, 0)
            }
        };

        self.live += 1;
        self.stats.allocations += 1;
        trace!(%handle, live = self.live, "allocated heap value");
        Ok(handle)
    }

    /// Returns the value behind `handle`, or `None` if it was swept.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.entry(handle).map(|entry| &entry.value)
    }

    /// Returns the value behind `handle` mutably, or `None` if it was swept.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.entry_mut(handle).map(|entry| &mut entry.value)
    }

    /// Returns true if `handle` still resolves to a live value.
    pub fn contains(&self, handle: Handle) -> bool {
        self.entry(handle).is_some()
    }

    /// Returns the mark flag of a live value.
    ///
    /// Outside of [`Heap::collect`] this is always `Some(false)` for live
    /// values.
    pub fn is_marked(&self, handle: Handle) -> Option<bool> {
        self.entry(handle).map(|entry| entry.marked)
    }

    /// Iterates over the handles of all live values.
    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entry
                .as_ref()
                .map(|_| Handle::new(index as u32, slot.generation))
        })
    }

    /// Adds `handle` to the host root set. Adding it twice is a no-op.
    pub fn add_root(&mut self, handle: Handle) {
        if self.roots.insert(handle) {
            debug!(%handle, "root added");
        }
    }

    /// Removes `handle` from the host root set. Removing an absent handle
    /// is a no-op.
    pub fn remove_root(&mut self, handle: Handle) {
        if self.roots.remove(&handle) {
            debug!(%handle, "root removed");
        }
    }

    /// Pins `handle` once more. Each pin must be matched by one
    /// [`Heap::unpin`].
    pub fn pin(&mut self, handle: Handle) {
        *self.pins.entry(handle).or_insert(0) += 1;
    }

    /// Releases one pin of `handle`. Unpinning an unpinned handle is a
    /// no-op.
    pub fn unpin(&mut self, handle: Handle) {
        if let Some(count) = self.pins.get_mut(&handle) {
            *count -= 1;
            if *count == 0 {
                self.pins.remove(&handle);
            }
        }
    }

    /// Returns how many outstanding pins `handle` has.
    pub fn pin_count(&self, handle: Handle) -> usize {
        self.pins.get(&handle).copied().unwrap_or(0)
    }

    /// Returns true if `handle` is a host root or pinned.
    pub fn is_rooted(&self, handle: Handle) -> bool {
        self.roots.contains(&handle) || self.pins.contains_key(&handle)
    }

    /// Returns the number of distinct rooted handles.
    pub fn root_count(&self) -> usize {
        self.roots.len()
            + self
                .pins
                .keys()
                .filter(|handle| !self.roots.contains(handle))
                .count()
    }

    /// Returns the number of live values.
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Returns the cumulative counters.
    pub fn stats(&self) -> &GcStats {
        &self.stats
    }

    /// Returns the configuration this heap was created with.
    pub fn config(&self) -> &HeapConfig {
        &self.config
    }

    fn entry(&self, handle: Handle) -> Option<&Entry<T>> {
        self.slots
            .get(handle.index())
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.entry.as_ref())
    }

    pub(crate) fn entry_mut(&mut self, handle: Handle) -> Option<&mut Entry<T>> {
        self.slots
            .get_mut(handle.index())
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.entry.as_mut())
    }

    fn root_snapshot(&self) -> Vec<Handle> {
        let mut roots: Vec<Handle> = self.roots.iter().copied().collect();
        roots.extend(
            self.pins
                .keys()
                .filter(|handle| !self.roots.contains(handle))
                .copied(),
        );
        roots
    }

    /// Destroys every unmarked value and recycles its slot.
    fn sweep(&mut self) -> usize {
        let mut freed = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let dead = matches!(&slot.entry, Some(entry) if !entry.marked);
            if !dead {
                continue;
            }
            slot.entry = None;
            freed += 1;
            // A slot whose generation would wrap is retired for good.
            if let Some(next) = slot.generation.checked_add(1) {
                slot.generation = next;
                self.free.push(index as u32);
            }
        }
        self.live -= freed;
        freed
    }

    fn no_marks_left(&self) -> bool {
        self.slots
            .iter()
            .all(|slot| slot.entry.as_ref().map_or(true, |entry| !entry.marked))
    }
}

impl<T: Trace> Heap<T> {
    /// Runs a full stop-the-world mark-sweep collection.
    ///
    /// Marks everything reachable from the roots, frees every unmarked
    /// value, then walks the roots again to clear the marks.
    pub fn collect(&mut self) -> CollectionSummary {
        let roots = self.root_snapshot();

        let marked = gc::traverse(self, &roots, Phase::Mark);
        let freed = self.sweep();
        gc::traverse(self, &roots, Phase::Unmark);
        debug_assert!(self.no_marks_left());

        self.stats.collections += 1;
        self.stats.freed += freed;

        let summary = CollectionSummary {
            marked,
            freed,
            live: self.live,
        };
        debug!(
            roots = roots.len(),
            marked, freed,
            live = self.live,
            "collection finished"
        );
        summary
    }
}

impl<T> Default for Heap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heap")
            .field("live", &self.live)
            .field("slots", &self.slots.len())
            .field("roots", &self.root_count())
            .field("stats", &self.stats)
            .finish()
    }
}

impl<T> Drop for Heap<T> {
    fn drop(&mut self) {
        if self.live > 0 {
            debug!(live = self.live, "heap dropped with live values");
        }
    }
}
