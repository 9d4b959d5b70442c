//! Bytecode system for the object runtime
//!
//! This crate provides the instruction set of the virtual machine and a
//! small assembler for building code blocks.
//!
//! # Features
//!
//! - Word-encoded opcodes with inline operands
//! - Forward-patchable jump and handler targets
//! - Assembly listings for diagnostics
//!
//! # Example
//!
//! ```
//! use bytecode_system::{CodeChunk, Opcode};
//!
//! let mut chunk = CodeChunk::new();
//! let handler = chunk.set_exception_handler(0);
//! chunk.emit(Opcode::Throw);
//! chunk.patch_here(handler);
//! chunk.emit(Opcode::Exit);
//!
//! assert_eq!(chunk.words(), &[40, 3, 42, 100]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chunk;
pub mod opcode;

// Re-export main types at crate root
pub use chunk::{disassemble, CodeChunk, PatchSite};
pub use opcode::{Opcode, UnknownOpcode, Word};
