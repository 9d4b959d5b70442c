//! VM errors.

use bytecode_system::{Opcode, Word};
use memory_manager::AllocError;
use object_model::ObjectError;
use thiserror::Error;

/// Reasons a VM run stops abnormally.
///
/// Every variant except [`VmError::UnhandledException`] reports a host-side
/// problem: malformed code, a broken object graph or an invalid call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    /// The call stack is empty when an instruction is fetched.
    #[error("missing initial stack frame")]
    MissingFrame,
    /// An opcode needed more values than the value stack holds.
    #[error("value stack underflow in {opcode}")]
    StackUnderflow {
        /// Instruction that underflowed
        opcode: Opcode,
    },
    /// The fetched word is not an opcode.
    #[error("bad opcode {word} at {pc}")]
    BadOpcode {
        /// Offending word
        word: Word,
        /// Where it was fetched
        pc: usize,
    },
    /// `CALL` found something other than a callable on top of the stack.
    #[error("cannot call a {found}")]
    NotCallable {
        /// Kind of the value found
        found: &'static str,
    },
    /// The program counter ran off the current code block.
    #[error("pc {pc} outside code block of length {len}")]
    PcOutOfBounds {
        /// Program counter (or operand address)
        pc: usize,
        /// Length of the code block
        len: usize,
    },
    /// A member opcode key is not a string host value.
    #[error("member key is not a string")]
    InvalidMemberKey,
    /// `THROW` unwound past the bottom frame.
    #[error("unhandled exception")]
    UnhandledException,
    /// Allocation failed.
    #[error(transparent)]
    Alloc(#[from] AllocError),
    /// Dispatch or native code failed.
    #[error(transparent)]
    Object(#[from] ObjectError),
}

impl VmError {
    /// Returns true if the run ended because guest code threw without a
    /// handler, rather than because of a host-level fault.
    pub fn is_guest_exception(&self) -> bool {
        matches!(self, VmError::UnhandledException)
    }
}

/// Result alias for VM operations.
pub type VmResult<T> = Result<T, VmError>;
