//! Member-holding values: plain objects and classes.

use std::collections::HashMap;

use memory_manager::{Handle, Tracer};

/// A plain object: a member mapping plus an optional link to its class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Object {
    members: HashMap<String, Handle>,
    isa: Option<Handle>,
}

impl Object {
    /// Create an object with no members and no class
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty instance of `class`
    pub fn with_isa(class: Handle) -> Self {
        Self {
            members: HashMap::new(),
            isa: Some(class),
        }
    }

    /// The class (or, for a class, the metaclass) of this value
    pub fn isa(&self) -> Option<Handle> {
        self.isa
    }

    /// Relink the class of this value
    pub fn set_isa(&mut self, isa: Option<Handle>) {
        self.isa = isa;
    }

    /// Look up an own member
    pub fn get(&self, key: &str) -> Option<Handle> {
        self.members.get(key).copied()
    }

    /// Bind an own member, returning the previous binding
    pub fn set(&mut self, key: impl Into<String>, value: Handle) -> Option<Handle> {
        self.members.insert(key.into(), value)
    }

    /// Check if `key` is bound on this value itself
    pub fn has_own(&self, key: &str) -> bool {
        self.members.contains_key(key)
    }

    /// Remove an own member, returning the previous binding
    pub fn delete(&mut self, key: &str) -> Option<Handle> {
        self.members.remove(key)
    }

    /// Own member names, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.members.keys().map(String::as_str)
    }

    /// Number of own members
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub(crate) fn report(&self, tracer: &mut Tracer) {
        tracer.visit_all(self.members.values().copied());
        tracer.visit_opt(self.isa);
    }
}

/// A class: an object with a name and an optional superclass.
///
/// The inherited `isa` link points at the metaclass, whose own members
/// act as class-level methods during dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    object: Object,
    name: String,
    superclass: Option<Handle>,
}

impl Class {
    /// Create a class with no members.
    ///
    /// # Arguments
    ///
    /// * `name` - Class name, reported by `Class>>name`
    /// * `superclass` - Parent consulted after the metaclass
    /// * `metaclass` - Stored as the class's `isa`
    pub fn new(name: impl Into<String>, superclass: Option<Handle>, metaclass: Option<Handle>) -> Self {
        Self {
            object: Object {
                members: HashMap::new(),
                isa: metaclass,
            },
            name: name.into(),
            superclass,
        }
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent class, if any
    pub fn superclass(&self) -> Option<Handle> {
        self.superclass
    }

    /// Metaclass, if any
    pub fn isa(&self) -> Option<Handle> {
        self.object.isa()
    }

    /// The member mapping of the class itself
    pub fn object(&self) -> &Object {
        &self.object
    }

    /// Mutable access to the member mapping of the class itself
    pub fn object_mut(&mut self) -> &mut Object {
        &mut self.object
    }

    pub(crate) fn report(&self, tracer: &mut Tracer) {
        self.object.report(tracer);
        tracer.visit_opt(self.superclass);
    }
}
