//! Message dispatch.
//!
//! Resolution walks the `isa`/superclass links with a loop rather than
//! recursion, so long inheritance chains never grow the host stack.
//!
//! * Objects look in their own members, then delegate to `isa`.
//! * Classes look in their own members, then in the *own* members of their
//!   metaclass, then delegate to their superclass.
//! * Native methods run their closure for `"call"` and otherwise resolve
//!   like objects.
//! * Host values answer only `"unwrap"`, yielding themselves.

use std::any::Any;

use memory_manager::Handle;
use tracing::trace;

use crate::error::{ObjectError, ObjectResult};
use crate::host;
use crate::native::MethodFn;
use crate::value::{HeapValue, ObjectHeap};

/// Selectors with meaning to the runtime itself.
pub mod selector {
    /// Invokes a method; the selector `call_chase` follows
    pub const CALL: &str = "call";
    /// Initializes a freshly constructed instance
    pub const INIT: &str = "init";
    /// Answered by host values with themselves
    pub const UNWRAP: &str = "unwrap";
}

/// Where a selector resolved to.
enum Resolution {
    /// A member binding, returned as is
    Bound(Handle),
    /// `"call"` reached a native method
    Invoke(MethodFn),
    /// `"unwrap"` reached a host value
    Host(Handle),
}

fn resolve(heap: &ObjectHeap, receiver: Handle, selector: &str) -> ObjectResult<Resolution> {
    let mut current = receiver;
    loop {
        let value = heap.get(current).ok_or(ObjectError::StaleHandle(current))?;
        let next = match value {
            HeapValue::Object(obj) => match obj.get(selector) {
                Some(bound) => return Ok(Resolution::Bound(bound)),
                None => obj.isa(),
            },
            HeapValue::NativeMethod(method) => {
                if selector == selector::CALL {
                    return Ok(Resolution::Invoke(method.method()));
                }
                match method.object().get(selector) {
                    Some(bound) => return Ok(Resolution::Bound(bound)),
                    None => method.object().isa(),
                }
            }
            HeapValue::Class(class) => {
                if let Some(bound) = class.object().get(selector) {
                    return Ok(Resolution::Bound(bound));
                }
                if let Some(meta) = class.isa() {
                    let meta_value = heap.get(meta).ok_or(ObjectError::StaleHandle(meta))?;
                    if let Some(bound) = meta_value.members().and_then(|m| m.get(selector)) {
                        return Ok(Resolution::Bound(bound));
                    }
                }
                class.superclass()
            }
            HeapValue::HostValue(_) if selector == selector::UNWRAP => {
                return Ok(Resolution::Host(current));
            }
            _ => None,
        };
        match next {
            Some(handle) => current = handle,
            None => return Err(ObjectError::dispatch(selector)),
        }
    }
}

/// Send `selector` with `args` to `receiver`.
///
/// A member binding is returned without being invoked. Only `"call"` sent
/// to a native method runs code.
///
/// # Errors
///
/// [`ObjectError::Dispatch`] naming `selector` when nothing along the chain
/// binds it, [`ObjectError::StaleHandle`] when a link was collected, or
/// whatever the invoked method returns.
pub fn send(heap: &mut ObjectHeap, receiver: Handle, selector: &str, args: &[Handle]) -> ObjectResult<Handle> {
    trace!(%receiver, selector, argc = args.len(), "send");
    match resolve(heap, receiver, selector)? {
        Resolution::Bound(handle) | Resolution::Host(handle) => Ok(handle),
        Resolution::Invoke(method) => method(heap, args),
    }
}

/// Invoke `receiver`, following `"call"` until a native method is reached.
///
/// Proxies whose `"call"` member is itself another callable object resolve
/// transparently; the terminal method runs exactly once with `args`. A
/// cycle of `"call"` bindings that never reaches a native method does not
/// terminate.
pub fn call_chase(heap: &mut ObjectHeap, receiver: Handle, args: &[Handle]) -> ObjectResult<Handle> {
    let mut target = receiver;
    loop {
        let value = heap.get(target).ok_or(ObjectError::StaleHandle(target))?;
        if let HeapValue::NativeMethod(method) = value {
            let method = method.method();
            trace!(%target, argc = args.len(), "invoking native method");
            return method(heap, args);
        }
        target = send(heap, target, selector::CALL, args)?;
    }
}

/// Resolve `"unwrap"` on `handle` and borrow the host payload as `T`.
///
/// # Errors
///
/// A dispatch failure if the value does not answer `"unwrap"`, or
/// [`ObjectError::TypeMismatch`] if the payload is not a `T`.
pub fn unwrap_host<T: Any>(heap: &ObjectHeap, handle: Handle) -> ObjectResult<&T> {
    let payload = match resolve(heap, handle, selector::UNWRAP)? {
        Resolution::Host(payload) | Resolution::Bound(payload) => payload,
        Resolution::Invoke(_) => return Err(ObjectError::dispatch(selector::UNWRAP)),
    };
    let value = heap.get(payload).ok_or(ObjectError::StaleHandle(payload))?;
    host::downcast::<T>(value)
}
