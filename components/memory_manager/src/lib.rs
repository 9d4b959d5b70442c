//! Memory Manager - heap registry and mark-sweep garbage collection
//!
//! This component provides:
//! - An arena-backed heap that owns every registered value
//! - Generation-checked handles between values
//! - Host roots and counted pins as the root set
//! - Stop-the-world mark-sweep collection, run only on request
//! - Root stacks that pin their entries while they are on the stack

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod gc;
pub mod handle;
pub mod heap;
pub mod root_stack;

// Re-export main types
pub use config::HeapConfig;
pub use error::AllocError;
pub use gc::{Trace, Tracer};
pub use handle::Handle;
pub use heap::{CollectionSummary, GcStats, Heap};
pub use root_stack::RootStack;
