//! Immutable code blocks.

use bytecode_system::{CodeChunk, Word};

/// An immutable sequence of machine words executed by the VM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    words: Box<[Word]>,
}

impl CodeBlock {
    /// Freeze `words` into a code block
    pub fn new(words: impl Into<Vec<Word>>) -> Self {
        Self {
            words: words.into().into_boxed_slice(),
        }
    }

    /// Word at `pc`, if in bounds
    #[inline]
    pub fn fetch(&self, pc: usize) -> Option<Word> {
        self.words.get(pc).copied()
    }

    /// All words
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Number of words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the block holds no code
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl From<CodeChunk> for CodeBlock {
    fn from(chunk: CodeChunk) -> Self {
        CodeBlock::new(chunk.into_words())
    }
}
