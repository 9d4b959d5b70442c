//! Class construction protocol.

use memory_manager::Handle;
use tracing::debug;

use crate::dispatch::{call_chase, send, selector};
use crate::error::ObjectResult;
use crate::native::NativeMethod;
use crate::object::{Class, Object};
use crate::slots::set_member;
use crate::value::ObjectHeap;

/// Allocate a class and install its constructor.
///
/// The class answers `"call"` by allocating an instance whose `isa` is the
/// class, chasing the instance's `"init"` with `(instance, ...args)` and
/// returning the instance.
///
/// # Arguments
///
/// * `heap` - Registry to allocate in
/// * `name` - Class name
/// * `superclass` - Parent class, `None` for a root class
/// * `metaclass` - Class whose own members act as class-level methods
pub fn make_class(
    heap: &mut ObjectHeap,
    name: &str,
    superclass: Option<Handle>,
    metaclass: Option<Handle>,
) -> ObjectResult<Handle> {
    let class = heap.alloc(Class::new(name, superclass, metaclass))?;
    let constructor =
        NativeMethod::with_captures(move |heap, args| construct(heap, class, args), vec![class]);
    let constructor = heap.alloc(constructor)?;
    set_member(heap, class, selector::CALL, constructor)?;
    debug!(%class, name, "class created");
    Ok(class)
}

/// Run the construction protocol for `class`.
pub fn construct(heap: &mut ObjectHeap, class: Handle, args: &[Handle]) -> ObjectResult<Handle> {
    let instance = heap.alloc(Object::with_isa(class))?;
    let init = send(heap, instance, selector::INIT, &[])?;

    let mut init_args = Vec::with_capacity(args.len() + 1);
    init_args.push(instance);
    init_args.extend_from_slice(args);
    call_chase(heap, init, &init_args)?;

    Ok(instance)
}

/// Allocate a native method and bind it as `selector` on `target`.
pub fn define_method<F>(heap: &mut ObjectHeap, target: Handle, selector: &str, method: F) -> ObjectResult<Handle>
where
    F: Fn(&mut ObjectHeap, &[Handle]) -> ObjectResult<Handle> + 'static,
{
    let method = heap.alloc(NativeMethod::new(method))?;
    set_member(heap, target, selector, method)?;
    Ok(method)
}
