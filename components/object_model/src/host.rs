//! Opaque host payloads.

use std::any::{self, Any};
use std::fmt;

use crate::error::{ObjectError, ObjectResult};
use crate::value::{HeapValue, ObjectHeap};

/// Wraps a native payload that guest code can only pass around.
///
/// The single selector a host value answers is
/// [`selector::UNWRAP`](crate::dispatch::selector::UNWRAP).
pub struct HostValue {
    payload: Box<dyn Any>,
    type_name: &'static str,
}

impl HostValue {
    /// Box `payload`
    pub fn new<T: Any>(payload: T) -> Self {
        Self {
            payload: Box::new(payload),
            type_name: any::type_name::<T>(),
        }
    }

    /// Borrow the payload as `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Check whether the payload is a `T`
    pub fn is<T: Any>(&self) -> bool {
        self.payload.is::<T>()
    }

    /// Rust type name of the payload
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.downcast_ref::<String>() {
            Some(s) => f.debug_tuple("HostValue").field(s).finish(),
            None => f.debug_tuple("HostValue").field(&self.type_name).finish(),
        }
    }
}

/// Allocate a host value holding `payload`.
pub fn alloc_host<T: Any>(heap: &mut ObjectHeap, payload: T) -> ObjectResult<crate::Handle> {
    Ok(heap.alloc(HostValue::new(payload))?)
}

/// Allocate a host value holding a `String`, the key type of member opcodes.
pub fn alloc_string(heap: &mut ObjectHeap, s: impl Into<String>) -> ObjectResult<crate::Handle> {
    alloc_host(heap, s.into())
}

pub(crate) fn downcast<'a, T: Any>(value: &'a HeapValue) -> ObjectResult<&'a T> {
    match value {
        HeapValue::HostValue(host) => host.downcast_ref::<T>().ok_or(ObjectError::TypeMismatch {
            expected: any::type_name::<T>(),
            found: host.type_name(),
        }),
        other => Err(ObjectError::TypeMismatch {
            expected: "host value",
            found: other.kind(),
        }),
    }
}
