//! VM configuration.

use memory_manager::HeapConfig;

/// Sizing for a [`Vm`](crate::Vm) and the heap it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmConfig {
    /// Value stack entries reserved up front
    pub data_stack_capacity: usize,
    /// Call stack entries reserved up front
    pub call_stack_capacity: usize,
    /// Configuration of the owned heap
    pub heap: HeapConfig,
}

impl VmConfig {
    /// Returns a config using `heap` for the owned heap
    pub fn with_heap(mut self, heap: HeapConfig) -> Self {
        self.heap = heap;
        self
    }
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            data_stack_capacity: 256,
            call_stack_capacity: 64,
            heap: HeapConfig::default(),
        }
    }
}
