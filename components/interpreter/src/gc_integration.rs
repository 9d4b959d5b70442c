//! Garbage collection from the VM's point of view
//!
//! Everything on the value stack and the call stack is pinned, so a
//! collection between instructions keeps every value the running program
//! can still reach. Values the host holds outside the VM must be rooted
//! with [`Heap::add_root`](memory_manager::Heap::add_root) before calling
//! [`Vm::collect_garbage`].

use memory_manager::CollectionSummary;
use tracing::debug;

use crate::vm::Vm;

impl Vm {
    /// Run a full mark-sweep collection over the owned heap
    pub fn collect_garbage(&mut self) -> CollectionSummary {
        debug!(
            stack = self.data_stack.len(),
            frames = self.call_stack.depth(),
            "collecting from vm"
        );
        self.heap.collect()
    }
}
