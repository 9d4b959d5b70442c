//! Code chunk - assembler for flat word sequences
//!
//! Builds the immutable word sequence a code block is created from, with
//! forward patching for jump and handler targets.

use std::fmt::{self, Write as _};

use crate::opcode::{Opcode, Word};

/// Location of an operand word that can be patched later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchSite(usize);

impl PatchSite {
    /// Offset of the operand word.
    pub fn offset(self) -> usize {
        self.0
    }
}

/// An assembler buffer of machine words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeChunk {
    words: Vec<Word>,
}

impl CodeChunk {
    /// Create a new empty chunk
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset the next emitted word will occupy.
    pub fn here(&self) -> usize {
        self.words.len()
    }

    /// Emit an operand-less instruction and return its offset
    pub fn emit(&mut self, opcode: Opcode) -> usize {
        debug_assert_eq!(opcode.operand_count(), 0, "{opcode} takes an operand");
        let offset = self.here();
        self.words.push(opcode.word());
        offset
    }

    /// Emit an instruction followed by its operand word
    pub fn emit_with_operand(&mut self, opcode: Opcode, operand: Word) -> PatchSite {
        debug_assert_eq!(opcode.operand_count(), 1, "{opcode} takes no operand");
        self.words.push(opcode.word());
        let site = PatchSite(self.here());
        self.words.push(operand);
        site
    }

    /// Emit a raw word, e.g. deliberately invalid code for tests
    pub fn emit_word(&mut self, word: Word) -> usize {
        let offset = self.here();
        self.words.push(word);
        offset
    }

    /// Emit `JUMP target`
    pub fn jump(&mut self, target: usize) -> PatchSite {
        self.emit_with_operand(Opcode::Jump, target)
    }

    /// Emit `SET_EXCEPTION_HANDLER handler`
    pub fn set_exception_handler(&mut self, handler: usize) -> PatchSite {
        self.emit_with_operand(Opcode::SetExceptionHandler, handler)
    }

    /// Overwrite the operand at `site`
    pub fn patch(&mut self, site: PatchSite, value: Word) {
        self.words[site.0] = value;
    }

    /// Point the operand at `site` to the next emitted word
    pub fn patch_here(&mut self, site: PatchSite) {
        let here = self.here();
        self.patch(site, here);
    }

    /// The assembled words
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Consume the chunk, returning its words
    pub fn into_words(self) -> Vec<Word> {
        self.words
    }

    /// Get the number of words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if nothing has been emitted
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl From<CodeChunk> for Vec<Word> {
    fn from(chunk: CodeChunk) -> Self {
        chunk.words
    }
}

impl fmt::Display for CodeChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&disassemble(&self.words))
    }
}

/// Render a word sequence as an assembly listing, one instruction per line.
///
/// Words that do not decode are listed as `.word N`; a missing trailing
/// operand is shown as `?`.
pub fn disassemble(words: &[Word]) -> String {
    let mut out = String::new();
    let mut offset = 0;
    while offset < words.len() {
        let word = words[offset];
        let _ = write!(out, "{offset:04}  ");
        match Opcode::from_word(word) {
            Some(opcode) if opcode.operand_count() == 1 => {
                match words.get(offset + 1) {
                    Some(operand) => {
                        let _ = writeln!(out, "{opcode} {operand}");
                    }
                    None => {
                        let _ = writeln!(out, "{opcode} ?");
                    }
                }
                offset += opcode.width();
            }
            Some(opcode) => {
                let _ = writeln!(out, "{opcode}");
                offset += 1;
            }
            None => {
                let _ = writeln!(out, ".word {word}");
                offset += 1;
            }
        }
    }
    out
}
