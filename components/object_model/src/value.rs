//! The heap value sum type.

use memory_manager::{Heap, Trace, Tracer};

use crate::code::CodeBlock;
use crate::frame::Frame;
use crate::host::HostValue;
use crate::native::{Callable, NativeMethod};
use crate::object::{Class, Object};

/// Registry holding every runtime value.
pub type ObjectHeap = Heap<HeapValue>;

/// Every kind of value the registry holds.
#[derive(Debug)]
pub enum HeapValue {
    /// Plain object
    Object(Object),
    /// Class with name and superclass
    Class(Class),
    /// Host closure invoked through `"call"`
    NativeMethod(NativeMethod),
    /// Opaque host payload
    HostValue(HostValue),
    /// Immutable code
    CodeBlock(CodeBlock),
    /// Something `CALL` can run
    Callable(Callable),
    /// Call stack activation record
    Frame(Frame),
}

impl HeapValue {
    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            HeapValue::Object(_) => "object",
            HeapValue::Class(_) => "class",
            HeapValue::NativeMethod(_) => "native method",
            HeapValue::HostValue(_) => "host value",
            HeapValue::CodeBlock(_) => "code block",
            HeapValue::Callable(_) => "callable",
            HeapValue::Frame(_) => "frame",
        }
    }

    /// Member mapping of any member-holding variant
    pub fn members(&self) -> Option<&Object> {
        match self {
            HeapValue::Object(obj) => Some(obj),
            HeapValue::Class(class) => Some(class.object()),
            HeapValue::NativeMethod(method) => Some(method.object()),
            _ => None,
        }
    }

    /// Mutable member mapping of any member-holding variant
    pub fn members_mut(&mut self) -> Option<&mut Object> {
        match self {
            HeapValue::Object(obj) => Some(obj),
            HeapValue::Class(class) => Some(class.object_mut()),
            HeapValue::NativeMethod(method) => Some(method.object_mut()),
            _ => None,
        }
    }

    /// Borrow as a class
    pub fn as_class(&self) -> Option<&Class> {
        match self {
            HeapValue::Class(class) => Some(class),
            _ => None,
        }
    }

    /// Borrow as a host value
    pub fn as_host(&self) -> Option<&HostValue> {
        match self {
            HeapValue::HostValue(host) => Some(host),
            _ => None,
        }
    }

    /// Borrow as a code block
    pub fn as_code(&self) -> Option<&CodeBlock> {
        match self {
            HeapValue::CodeBlock(code) => Some(code),
            _ => None,
        }
    }

    /// Borrow as a callable
    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            HeapValue::Callable(callable) => Some(callable),
            _ => None,
        }
    }

    /// Borrow as a frame
    pub fn as_frame(&self) -> Option<&Frame> {
        match self {
            HeapValue::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    /// Mutably borrow as a frame
    pub fn as_frame_mut(&mut self) -> Option<&mut Frame> {
        match self {
            HeapValue::Frame(frame) => Some(frame),
            _ => None,
        }
    }
}

impl Trace for HeapValue {
    fn report_references(&self, tracer: &mut Tracer) {
        match self {
            HeapValue::Object(obj) => obj.report(tracer),
            HeapValue::Class(class) => class.report(tracer),
            HeapValue::NativeMethod(method) => method.report(tracer),
            HeapValue::HostValue(_) | HeapValue::CodeBlock(_) => {}
            HeapValue::Callable(callable) => callable.report(tracer),
            HeapValue::Frame(frame) => frame.report(tracer),
        }
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for HeapValue {
                fn from(value: $variant) -> Self {
                    HeapValue::$variant(value)
                }
            }
        )*
    };
}

impl_from_variant!(Object, Class, NativeMethod, HostValue, CodeBlock, Callable, Frame);
