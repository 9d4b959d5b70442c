//! Own-member access on member-holding values.
//!
//! These never consult `isa` or superclass links; they read and write the
//! member mapping of the target itself.

use memory_manager::Handle;

use crate::error::{ObjectError, ObjectResult};
use crate::object::Object;
use crate::value::ObjectHeap;

fn members(heap: &ObjectHeap, target: Handle) -> ObjectResult<&Object> {
    let value = heap.get(target).ok_or(ObjectError::StaleHandle(target))?;
    value.members().ok_or(ObjectError::TypeMismatch {
        expected: "object",
        found: value.kind(),
    })
}

fn members_mut(heap: &mut ObjectHeap, target: Handle) -> ObjectResult<&mut Object> {
    let value = heap.get_mut(target).ok_or(ObjectError::StaleHandle(target))?;
    let kind = value.kind();
    value.members_mut().ok_or(ObjectError::TypeMismatch {
        expected: "object",
        found: kind,
    })
}

/// Read an own member of `target`.
pub fn get_member(heap: &ObjectHeap, target: Handle, key: &str) -> ObjectResult<Option<Handle>> {
    Ok(members(heap, target)?.get(key))
}

/// Bind an own member of `target`, returning the previous binding.
pub fn set_member(
    heap: &mut ObjectHeap,
    target: Handle,
    key: impl Into<String>,
    value: Handle,
) -> ObjectResult<Option<Handle>> {
    Ok(members_mut(heap, target)?.set(key, value))
}

/// Remove an own member of `target`, returning the previous binding.
pub fn remove_member(heap: &mut ObjectHeap, target: Handle, key: &str) -> ObjectResult<Option<Handle>> {
    Ok(members_mut(heap, target)?.delete(key))
}
