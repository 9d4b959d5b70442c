//! Bytecode opcodes
//!
//! Every instruction is one machine word; `JUMP` and
//! `SET_EXCEPTION_HANDLER` are followed by one operand word.

use std::fmt;

use thiserror::Error;

/// A machine word of a code block.
pub type Word = usize;

/// A word that does not name any opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown opcode {0}")]
pub struct UnknownOpcode(pub Word);

/// Instruction set of the virtual machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Opcode {
    /// Do nothing
    Nop = 0,

    /// Discard the top of the value stack
    Pop = 10,
    /// Exchange the two topmost values
    Swap = 11,

    /// Jump to the absolute address in the next word
    Jump = 20,
    /// Call the callable on top of the value stack
    Call = 21,
    /// Return from the current frame
    Ret = 22,

    /// Read a member slot: pops object, key; pushes value
    ObjGet = 30,
    /// Write a member slot: pops object, key, value
    ObjSet = 31,
    /// Remove a member slot: pops object, key
    ObjUnset = 32,

    /// Install the handler address in the next word on the current frame
    SetExceptionHandler = 40,
    /// Clear the handler of the current frame
    UnsetExceptionHandler = 41,
    /// Unwind to the nearest frame with a handler
    Throw = 42,

    /// Halt execution
    Exit = 100,
}

impl Opcode {
    /// All opcodes in numeric order.
    pub const ALL: [Opcode; 13] = [
        Opcode::Nop,
        Opcode::Pop,
        Opcode::Swap,
        Opcode::Jump,
        Opcode::Call,
        Opcode::Ret,
        Opcode::ObjGet,
        Opcode::ObjSet,
        Opcode::ObjUnset,
        Opcode::SetExceptionHandler,
        Opcode::UnsetExceptionHandler,
        Opcode::Throw,
        Opcode::Exit,
    ];

    /// Decodes a word, returning `None` for unknown values.
    pub fn from_word(word: Word) -> Option<Self> {
        let opcode = match word {
            0 => Opcode::Nop,
            10 => Opcode::Pop,
            11 => Opcode::Swap,
            20 => Opcode::Jump,
            21 => Opcode::Call,
            22 => Opcode::Ret,
            30 => Opcode::ObjGet,
            31 => Opcode::ObjSet,
            32 => Opcode::ObjUnset,
            40 => Opcode::SetExceptionHandler,
            41 => Opcode::UnsetExceptionHandler,
            42 => Opcode::Throw,
            100 => Opcode::Exit,
            _ => return None,
        };
        Some(opcode)
    }

    /// The word encoding of this opcode.
    #[inline]
    pub fn word(self) -> Word {
        self as Word
    }

    /// Number of operand words following the opcode.
    pub fn operand_count(self) -> usize {
        match self {
            Opcode::Jump | Opcode::SetExceptionHandler => 1,
            _ => 0,
        }
    }

    /// Total width in words, opcode included.
    pub fn width(self) -> usize {
        1 + self.operand_count()
    }

    /// Assembly mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Nop => "NOP",
            Opcode::Pop => "POP",
            Opcode::Swap => "SWAP",
            Opcode::Jump => "JUMP",
            Opcode::Call => "CALL",
            Opcode::Ret => "RET",
            Opcode::ObjGet => "OBJ_GET",
            Opcode::ObjSet => "OBJ_SET",
            Opcode::ObjUnset => "OBJ_UNSET",
            Opcode::SetExceptionHandler => "SET_EXCEPTION_HANDLER",
            Opcode::UnsetExceptionHandler => "UNSET_EXCEPTION_HANDLER",
            Opcode::Throw => "THROW",
            Opcode::Exit => "EXIT",
        }
    }
}

impl From<Opcode> for Word {
    fn from(opcode: Opcode) -> Self {
        opcode.word()
    }
}

impl TryFrom<Word> for Opcode {
    type Error = UnknownOpcode;

    fn try_from(word: Word) -> Result<Self, Self::Error> {
        Opcode::from_word(word).ok_or(UnknownOpcode(word))
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
