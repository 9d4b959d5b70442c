//! Call stack for function call management

use memory_manager::{Handle, RootStack};
use object_model::{Frame, ObjectError, ObjectHeap};
use tracing::debug;

use crate::error::VmResult;

/// Stack of frame handles, each pinned in the heap while on the stack.
#[derive(Debug, Default)]
pub struct CallStack {
    frames: RootStack,
}

impl CallStack {
    /// Create an empty call stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty call stack with room for `capacity` frames
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: RootStack::with_capacity(capacity),
        }
    }

    /// Push a frame, rooting it
    pub fn push(&mut self, heap: &mut ObjectHeap, frame: Handle) {
        self.frames.push(heap, frame);
        debug!(%frame, depth = self.frames.len(), "frame pushed");
    }

    /// Pop the topmost frame, unrooting it
    pub fn pop(&mut self, heap: &mut ObjectHeap) -> Option<Handle> {
        let frame = self.frames.pop(heap)?;
        debug!(%frame, depth = self.frames.len(), "frame popped");
        Some(frame)
    }

    /// Topmost frame
    pub fn top(&self) -> Option<Handle> {
        self.frames.top()
    }

    /// Number of frames
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Check if no frame is active
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Unroot and drop every frame
    pub fn clear(&mut self, heap: &mut ObjectHeap) {
        self.frames.clear(heap);
    }

    /// Frames from bottom to top
    pub fn as_slice(&self) -> &[Handle] {
        self.frames.as_slice()
    }
}

/// Resolve a frame handle.
pub fn frame(heap: &ObjectHeap, handle: Handle) -> VmResult<&Frame> {
    let value = heap.get(handle).ok_or(ObjectError::StaleHandle(handle))?;
    let found = value.kind();
    Ok(value.as_frame().ok_or(ObjectError::TypeMismatch {
        expected: "frame",
        found,
    })?)
}

/// Resolve a frame handle for mutation.
pub fn frame_mut(heap: &mut ObjectHeap, handle: Handle) -> VmResult<&mut Frame> {
    let value = heap.get_mut(handle).ok_or(ObjectError::StaleHandle(handle))?;
    let found = value.kind();
    Ok(value.as_frame_mut().ok_or(ObjectError::TypeMismatch {
        expected: "frame",
        found,
    })?)
}
