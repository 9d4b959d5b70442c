//! Word-code interpreter for the object runtime
//!
//! This crate provides the virtual machine with:
//! - A value stack and a call stack whose entries are GC roots
//! - A fetch/decode/execute loop over code blocks
//! - A trampoline for guest calls and a bridge for native callables
//! - Frame-local exception handlers unwound by `THROW`
//!
//! # Example
//!
//! ```
//! use bytecode_system::{CodeChunk, Opcode};
//! use interpreter::Vm;
//!
//! let mut vm = Vm::new();
//! let mut chunk = CodeChunk::new();
//! chunk.emit(Opcode::Nop);
//! chunk.emit(Opcode::Exit);
//!
//! let code = vm.load_code(chunk).unwrap();
//! vm.enter(code).unwrap();
//! vm.run().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod call_frame;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod gc_integration;
pub mod vm;

// Re-export main types at crate root
pub use call_frame::CallStack;
pub use config::VmConfig;
pub use error::{VmError, VmResult};
pub use vm::Vm;
