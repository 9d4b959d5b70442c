//! The view native callables get of a running VM

use memory_manager::Handle;
use object_model::{NativeContext, ObjectHeap};

use crate::vm::Vm;

impl NativeContext for Vm {
    fn heap(&self) -> &ObjectHeap {
        &self.heap
    }

    fn heap_mut(&mut self) -> &mut ObjectHeap {
        &mut self.heap
    }

    fn push(&mut self, value: Handle) {
        Vm::push(self, value);
    }

    fn pop(&mut self) -> Option<Handle> {
        Vm::pop(self)
    }

    fn peek(&self, depth: usize) -> Option<Handle> {
        Vm::peek(self, depth)
    }
}
