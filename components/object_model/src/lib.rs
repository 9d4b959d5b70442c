//! Object model for the runtime
//!
//! Every runtime value lives in an [`ObjectHeap`] as a [`HeapValue`] and is
//! referred to by [`Handle`]. Values respond to messages through [`send`];
//! [`call_chase`] is the single invocation path for methods, proxies and
//! class constructors alike.
//!
//! # Example
//!
//! ```
//! use object_model::{bootstrap, call_chase, send, unwrap_host, ObjectHeap};
//!
//! let mut heap = ObjectHeap::new();
//! let rt = bootstrap(&mut heap).unwrap();
//! let point = rt.define_class(&mut heap, "Point", None).unwrap();
//!
//! let name = send(&mut heap, point, "name", &[]).unwrap();
//! let name = call_chase(&mut heap, name, &[point]).unwrap();
//! assert_eq!(unwrap_host::<String>(&heap, name).unwrap(), "Point");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bootstrap;
pub mod class;
pub mod code;
pub mod dispatch;
pub mod error;
pub mod frame;
pub mod host;
pub mod native;
pub mod object;
pub mod slots;
pub mod value;

// Re-export main types
pub use bootstrap::{bootstrap, Bootstrap};
pub use class::{construct, define_method, make_class};
pub use code::CodeBlock;
pub use dispatch::{call_chase, selector, send, unwrap_host};
pub use error::{ObjectError, ObjectResult};
pub use frame::Frame;
pub use host::{alloc_host, alloc_string, HostValue};
pub use memory_manager::Handle;
pub use native::{Callable, MethodFn, NativeContext, NativeFn, NativeMethod};
pub use object::{Class, Object};
pub use slots::{get_member, remove_member, set_member};
pub use value::{HeapValue, ObjectHeap};
