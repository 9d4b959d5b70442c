//! Native methods, callables and the bridge natives run against.

use std::fmt;
use std::rc::Rc;

use memory_manager::{Handle, Tracer};

use crate::error::ObjectResult;
use crate::object::Object;
use crate::value::ObjectHeap;

/// Host closure behind a [`NativeMethod`], invoked with an argument list.
pub type MethodFn = Rc<dyn Fn(&mut ObjectHeap, &[Handle]) -> ObjectResult<Handle>>;

/// Host closure behind a native [`Callable`], invoked with the running VM.
pub type NativeFn = Rc<dyn Fn(&mut dyn NativeContext) -> ObjectResult<Handle>>;

/// What a native callable sees of the machine that called it.
///
/// Implemented by the interpreter; natives take their arguments from the
/// value stack and return a single result that the caller pushes.
pub trait NativeContext {
    /// Registry of the running machine
    fn heap(&self) -> &ObjectHeap;

    /// Mutable registry of the running machine
    fn heap_mut(&mut self) -> &mut ObjectHeap;

    /// Push onto the value stack
    fn push(&mut self, value: Handle);

    /// Pop from the value stack
    fn pop(&mut self) -> Option<Handle>;

    /// Value `depth` entries below the top of the value stack
    fn peek(&self, depth: usize) -> Option<Handle>;
}

/// A method value: invoking it with `"call"` runs a host closure.
///
/// Like any object it can carry members of its own. Handles the closure
/// closes over must be listed in `captures` so the collector keeps them.
#[derive(Clone)]
pub struct NativeMethod {
    object: Object,
    method: MethodFn,
    captures: Vec<Handle>,
}

impl NativeMethod {
    /// Wrap a closure that holds no heap references
    pub fn new<F>(method: F) -> Self
    where
        F: Fn(&mut ObjectHeap, &[Handle]) -> ObjectResult<Handle> + 'static,
    {
        Self::with_captures(method, Vec::new())
    }

    /// Wrap a closure that closes over `captures`
    pub fn with_captures<F>(method: F, captures: Vec<Handle>) -> Self
    where
        F: Fn(&mut ObjectHeap, &[Handle]) -> ObjectResult<Handle> + 'static,
    {
        Self {
            object: Object::new(),
            method: Rc::new(method),
            captures,
        }
    }

    /// The closure, shared so it can be run while the heap is borrowed mutably
    pub fn method(&self) -> MethodFn {
        Rc::clone(&self.method)
    }

    /// Handles kept alive for the closure
    pub fn captures(&self) -> &[Handle] {
        &self.captures
    }

    /// Own members of the method value
    pub fn object(&self) -> &Object {
        &self.object
    }

    /// Mutable own members of the method value
    pub fn object_mut(&mut self) -> &mut Object {
        &mut self.object
    }

    pub(crate) fn report(&self, tracer: &mut Tracer) {
        self.object.report(tracer);
        tracer.visit_all(self.captures.iter().copied());
    }
}

impl fmt::Debug for NativeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeMethod")
            .field("members", &self.object.member_count())
            .field("captures", &self.captures)
            .finish_non_exhaustive()
    }
}

/// A value the `CALL` opcode can run.
#[derive(Clone)]
pub enum Callable {
    /// Runs a host closure against the VM
    Native(NativeFn),
    /// Runs guest code in a new frame
    Guest {
        /// Code block to execute
        code: Handle,
        /// Entry offset into `code`
        entry: usize,
    },
}

impl Callable {
    /// Wrap a native closure
    pub fn native<F>(function: F) -> Self
    where
        F: Fn(&mut dyn NativeContext) -> ObjectResult<Handle> + 'static,
    {
        Callable::Native(Rc::new(function))
    }

    /// Guest function entering `code` at `entry`
    pub fn guest(code: Handle, entry: usize) -> Self {
        Callable::Guest { code, entry }
    }

    /// Check if this is a host closure
    pub fn is_native(&self) -> bool {
        matches!(self, Callable::Native(_))
    }

    pub(crate) fn report(&self, tracer: &mut Tracer) {
        if let Callable::Guest { code, .. } = self {
            tracer.visit(*code);
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native(_) => f.write_str("Callable::Native"),
            Callable::Guest { code, entry } => f
                .debug_struct("Callable::Guest")
                .field("code", code)
                .field("entry", entry)
                .finish(),
        }
    }
}
