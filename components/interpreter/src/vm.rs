//! Virtual Machine for word-code execution
//!
//! Main entry point for running code blocks against an object heap.

use bytecode_system::{Opcode, Word};
use memory_manager::{Handle, RootStack};
use object_model::{CodeBlock, Frame, ObjectError, ObjectHeap};
use tracing::trace;

use crate::call_frame::{frame, CallStack};
use crate::config::VmConfig;
use crate::error::{VmError, VmResult};

/// What the loop does after an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    /// Advance past the instruction and its operands
    Next,
    /// Continue at an absolute address in the (new) current frame
    Jump(usize),
    /// Stop the run successfully
    Exit,
}

/// Virtual Machine for executing code blocks
///
/// The VM owns:
/// - The heap every value lives in
/// - A value stack whose entries are GC roots
/// - A call stack of rooted frames
///
/// Collection never runs on its own; see [`Vm::collect_garbage`].
#[derive(Debug)]
pub struct Vm {
    pub(crate) heap: ObjectHeap,
    pub(crate) pc: usize,
    pub(crate) data_stack: RootStack,
    pub(crate) call_stack: CallStack,
    config: VmConfig,
}

impl Vm {
    /// Create a new VM with an empty heap
    pub fn new() -> Self {
        Self::with_config(VmConfig::default())
    }

    /// Create a new VM with custom sizing
    pub fn with_config(config: VmConfig) -> Self {
        let heap = ObjectHeap::with_config(config.heap.clone());
        Self::assemble(heap, config)
    }

    /// Create a VM around a heap the host already populated, e.g. by
    /// bootstrapping classes into it
    pub fn with_heap(heap: ObjectHeap) -> Self {
        let config = VmConfig::default().with_heap(heap.config().clone());
        Self::assemble(heap, config)
    }

    fn assemble(heap: ObjectHeap, config: VmConfig) -> Self {
        Self {
            heap,
            pc: 0,
            data_stack: RootStack::with_capacity(config.data_stack_capacity),
            call_stack: CallStack::with_capacity(config.call_stack_capacity),
            config,
        }
    }

    /// The owned heap
    pub fn heap(&self) -> &ObjectHeap {
        &self.heap
    }

    /// The owned heap, mutably
    pub fn heap_mut(&mut self) -> &mut ObjectHeap {
        &mut self.heap
    }

    /// Sizing this VM was created with
    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    /// Allocate a code block holding `words`
    pub fn load_code(&mut self, words: impl Into<Vec<Word>>) -> VmResult<Handle> {
        Ok(self.heap.alloc(CodeBlock::new(words))?)
    }

    /// Push the bottom frame for `code` and start at offset 0.
    ///
    /// # Arguments
    ///
    /// * `code` - Handle of a code block in this VM's heap
    pub fn enter(&mut self, code: Handle) -> VmResult<()> {
        let entry = self.heap.alloc(Frame::entry(code))?;
        self.call_stack.push(&mut self.heap, entry);
        self.pc = 0;
        Ok(())
    }

    /// Current program counter
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Push a value onto the value stack, rooting it
    pub fn push(&mut self, value: Handle) {
        self.data_stack.push(&mut self.heap, value);
    }

    /// Pop a value from the value stack, unrooting it
    pub fn pop(&mut self) -> Option<Handle> {
        self.data_stack.pop(&mut self.heap)
    }

    /// Value `depth` entries below the top of the value stack
    pub fn peek(&self, depth: usize) -> Option<Handle> {
        self.data_stack.peek(depth)
    }

    /// Value stack from bottom to top
    pub fn stack(&self) -> &[Handle] {
        self.data_stack.as_slice()
    }

    /// Active frames from bottom to top
    pub fn frames(&self) -> &[Handle] {
        self.call_stack.as_slice()
    }

    /// Number of active frames
    pub fn call_depth(&self) -> usize {
        self.call_stack.depth()
    }

    /// The topmost frame, if any
    pub fn current_frame(&self) -> Option<&Frame> {
        let top = self.call_stack.top()?;
        frame(&self.heap, top).ok()
    }

    /// Run until `EXIT` or an error.
    ///
    /// # Errors
    ///
    /// [`VmError::MissingFrame`] if there is no frame to fetch from,
    /// [`VmError::UnhandledException`] if a `THROW` escapes every frame, and
    /// structural errors for malformed code or invalid values. A failed run
    /// leaves the stacks as they were at the faulting instruction.
    pub fn run(&mut self) -> VmResult<()> {
        loop {
            let opcode = self.fetch()?;
            trace!(pc = self.pc, %opcode, depth = self.data_stack.len(), "execute");
            match self.execute(opcode)? {
                Flow::Next => self.pc += opcode.width(),
                Flow::Jump(target) => self.pc = target,
                Flow::Exit => return Ok(()),
            }
        }
    }

    /// Unroot and discard both stacks and rewind the program counter
    pub fn reset(&mut self) {
        self.data_stack.clear(&mut self.heap);
        self.call_stack.clear(&mut self.heap);
        self.pc = 0;
    }

    /// Tear down the VM and hand back its heap with the stacks unrooted
    pub fn into_heap(mut self) -> ObjectHeap {
        self.reset();
        std::mem::take(&mut self.heap)
    }

    fn code(&self) -> VmResult<&CodeBlock> {
        let top = self.call_stack.top().ok_or(VmError::MissingFrame)?;
        let code = frame(&self.heap, top)?.code();
        let value = self.heap.get(code).ok_or(ObjectError::StaleHandle(code))?;
        let found = value.kind();
        Ok(value.as_code().ok_or(ObjectError::TypeMismatch {
            expected: "code block",
            found,
        })?)
    }

    fn fetch(&self) -> VmResult<Opcode> {
        let code = self.code()?;
        let word = code.fetch(self.pc).ok_or(VmError::PcOutOfBounds {
            pc: self.pc,
            len: code.len(),
        })?;
        Opcode::from_word(word).ok_or(VmError::BadOpcode { word, pc: self.pc })
    }

    /// Operand word following the current instruction
    pub(crate) fn operand(&self) -> VmResult<Word> {
        let code = self.code()?;
        let at = self.pc + 1;
        code.fetch(at).ok_or(VmError::PcOutOfBounds { pc: at, len: code.len() })
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Vm {
    fn drop(&mut self) {
        self.reset();
    }
}
