//! Allocation failures.

use thiserror::Error;

/// Failure to register a newly constructed value with the heap.
///
/// The value handed to [`Heap::alloc`](crate::Heap::alloc) is dropped
/// before this error is returned; nothing is left half-registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocError {
    /// The configured object cap is already reached.
    #[error("heap object limit of {limit} reached")]
    LimitReached {
        /// The configured `max_objects`
        limit: usize,
    },
    /// Backing storage could not grow, or the handle space is exhausted.
    #[error("out of memory while registering a heap value")]
    OutOfMemory,
}
