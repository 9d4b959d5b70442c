//! The standing object graph every runtime starts from.
//!
//! ```text
//!   Object  --isa-->  Class  --isa--> Class
//!     ^                 |
//!     +---superclass----+
//! ```
//!
//! `Object` is the root class. `Class` is the metaclass of every class,
//! including itself, so `Object.isa.isa == Object.isa`.

use memory_manager::Handle;
use tracing::debug;

use crate::class::{define_method, make_class};
use crate::dispatch::{call_chase, send};
use crate::error::{ObjectError, ObjectResult};
use crate::host::alloc_string;
use crate::object::Object;
use crate::slots::set_member;
use crate::value::{HeapValue, ObjectHeap};

/// Handles to the bootstrapped graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bootstrap {
    object_class: Handle,
    metaclass: Handle,
    globals: Handle,
}

/// Build the root class, the metaclass and the rooted globals object.
///
/// Installs `Object>>init`, `Class>>new` and `Class>>name`, and binds
/// `"Object"` and `"Class"` as globals.
pub fn bootstrap(heap: &mut ObjectHeap) -> ObjectResult<Bootstrap> {
    let object_class = make_class(heap, "Object", None, None)?;
    let metaclass = make_class(heap, "Class", Some(object_class), None)?;
    set_isa(heap, metaclass, metaclass)?;
    set_isa(heap, object_class, metaclass)?;

    define_method(heap, object_class, "init", |_, args| {
        args.first().copied().ok_or_else(|| missing_receiver("init"))
    })?;
    define_method(heap, metaclass, "new", |heap, args| {
        let (&class, rest) = args.split_first().ok_or_else(|| missing_receiver("new"))?;
        call_chase(heap, class, rest)
    })?;
    define_method(heap, metaclass, "name", |heap, args| {
        let class = args.first().copied().ok_or_else(|| missing_receiver("name"))?;
        let name = match heap.get(class) {
            Some(HeapValue::Class(class)) => class.name().to_string(),
            Some(other) => {
                return Err(ObjectError::TypeMismatch {
                    expected: "class",
                    found: other.kind(),
                })
            }
            None => return Err(ObjectError::StaleHandle(class)),
        };
        alloc_string(heap, name)
    })?;

    let globals = heap.alloc(Object::new())?;
    heap.add_root(globals);
    set_member(heap, globals, "Object", object_class)?;
    set_member(heap, globals, "Class", metaclass)?;

    debug!(%object_class, %metaclass, %globals, "runtime bootstrapped");
    Ok(Bootstrap {
        object_class,
        metaclass,
        globals,
    })
}

fn set_isa(heap: &mut ObjectHeap, class: Handle, isa: Handle) -> ObjectResult<()> {
    match heap.get_mut(class) {
        Some(HeapValue::Class(class)) => {
            class.object_mut().set_isa(Some(isa));
            Ok(())
        }
        Some(other) => Err(ObjectError::TypeMismatch {
            expected: "class",
            found: other.kind(),
        }),
        None => Err(ObjectError::StaleHandle(class)),
    }
}

fn missing_receiver(method: &str) -> ObjectError {
    ObjectError::Native(format!("{method} called without a receiver"))
}

impl Bootstrap {
    /// The root class `Object`
    pub fn object_class(&self) -> Handle {
        self.object_class
    }

    /// The metaclass `Class`
    pub fn metaclass(&self) -> Handle {
        self.metaclass
    }

    /// The rooted globals object
    pub fn globals(&self) -> Handle {
        self.globals
    }

    /// Resolve a global by sending its name to the globals object.
    pub fn find_global(&self, heap: &mut ObjectHeap, name: &str) -> ObjectResult<Handle> {
        send(heap, self.globals, name, &[])
    }

    /// Bind a global, replacing any previous binding.
    pub fn define_global(&self, heap: &mut ObjectHeap, name: &str, value: Handle) -> ObjectResult<()> {
        set_member(heap, self.globals, name, value)?;
        Ok(())
    }

    /// Create a class whose metaclass is `Class` and bind it as a global.
    ///
    /// A missing `superclass` defaults to `Object`.
    pub fn define_class(&self, heap: &mut ObjectHeap, name: &str, superclass: Option<Handle>) -> ObjectResult<Handle> {
        let superclass = superclass.unwrap_or(self.object_class);
        let class = make_class(heap, name, Some(superclass), Some(self.metaclass))?;
        self.define_global(heap, name, class)?;
        Ok(class)
    }
}
