//! Heap configuration.

/// Default number of slots reserved up front.
const DEFAULT_INITIAL_CAPACITY: usize = 256;

/// Tuning knobs for a [`Heap`](crate::Heap).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapConfig {
    /// Maximum number of live values; `None` means unbounded.
    pub max_objects: Option<usize>,
    /// Number of arena slots reserved when the heap is created.
    pub initial_capacity: usize,
}

impl HeapConfig {
    /// Returns a config capped at `max_objects` live values.
    pub fn with_max_objects(mut self, max_objects: usize) -> Self {
        self.max_objects = Some(max_objects);
        self
    }

    /// Returns a config reserving `initial_capacity` slots.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            max_objects: None,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}
