//! Opcode execution
//!
//! Handlers check their stack effect before touching either stack, so an
//! instruction that fails leaves the VM exactly as it found it.

use bytecode_system::Opcode;
use memory_manager::Handle;
use object_model::{
    get_member, remove_member, set_member, unwrap_host, Callable, Frame, NativeContext,
    ObjectError,
};
use tracing::{debug, warn};

use crate::call_frame::{frame, frame_mut};
use crate::error::{VmError, VmResult};
use crate::vm::{Flow, Vm};

impl Vm {
    /// Execute one decoded instruction
    pub(crate) fn execute(&mut self, opcode: Opcode) -> VmResult<Flow> {
        match opcode {
            Opcode::Nop => Ok(Flow::Next),
            Opcode::Pop => {
                self.require(opcode, 1)?;
                self.pop();
                Ok(Flow::Next)
            }
            Opcode::Swap => {
                self.require(opcode, 2)?;
                let (a, b) = (self.pop(), self.pop());
                if let (Some(a), Some(b)) = (a, b) {
                    self.push(a);
                    self.push(b);
                }
                Ok(Flow::Next)
            }
            Opcode::Jump => Ok(Flow::Jump(self.operand()?)),
            Opcode::Call => self.call(),
            Opcode::Ret => self.ret(),
            Opcode::ObjGet | Opcode::ObjSet | Opcode::ObjUnset => self.member(opcode),
            Opcode::SetExceptionHandler => {
                let handler = self.operand()?;
                let top = self.call_stack.top().ok_or(VmError::MissingFrame)?;
                frame_mut(&mut self.heap, top)?.set_exception_handler(handler);
                debug!(frame = %top, handler, "exception handler installed");
                Ok(Flow::Next)
            }
            Opcode::UnsetExceptionHandler => {
                let top = self.call_stack.top().ok_or(VmError::MissingFrame)?;
                frame_mut(&mut self.heap, top)?.clear_exception_handler();
                debug!(frame = %top, "exception handler cleared");
                Ok(Flow::Next)
            }
            Opcode::Throw => self.throw(),
            Opcode::Exit => Ok(Flow::Exit),
        }
    }

    fn require(&self, opcode: Opcode, count: usize) -> VmResult<()> {
        if self.data_stack.len() < count {
            return Err(VmError::StackUnderflow { opcode });
        }
        Ok(())
    }

    fn call(&mut self) -> VmResult<Flow> {
        let callee = self
            .data_stack
            .top()
            .ok_or(VmError::StackUnderflow { opcode: Opcode::Call })?;
        let value = self.heap.get(callee).ok_or(ObjectError::StaleHandle(callee))?;
        let callable = value
            .as_callable()
            .cloned()
            .ok_or(VmError::NotCallable { found: value.kind() })?;

        match callable {
            Callable::Native(function) => {
                self.pop();
                // The callee stays rooted while its closure runs.
                self.heap.pin(callee);
                let ctx: &mut dyn NativeContext = self;
                let result = function(ctx);
                self.heap.unpin(callee);
                self.push(result?);
                Ok(Flow::Next)
            }
            Callable::Guest { code, entry } => {
                let callee_frame = self.heap.alloc(Frame::call(self.pc + 1, callee, code))?;
                self.pop();
                self.call_stack.push(&mut self.heap, callee_frame);
                Ok(Flow::Jump(entry))
            }
        }
    }

    fn ret(&mut self) -> VmResult<Flow> {
        let top = self.call_stack.top().ok_or(VmError::MissingFrame)?;
        let return_address = frame(&self.heap, top)?.return_address();
        self.call_stack.pop(&mut self.heap);
        Ok(Flow::Jump(return_address))
    }

    fn throw(&mut self) -> VmResult<Flow> {
        while let Some(top) = self.call_stack.top() {
            if let Some(handler) = frame(&self.heap, top)?.exception_handler() {
                debug!(frame = %top, handler, "exception caught");
                return Ok(Flow::Jump(handler));
            }
            debug!(frame = %top, "unwinding frame without handler");
            self.call_stack.pop(&mut self.heap);
        }
        warn!(pc = self.pc, "exception escaped every frame");
        Err(VmError::UnhandledException)
    }

    /// `OBJ_GET`, `OBJ_SET` and `OBJ_UNSET`: the object is on top, its key
    /// below it and, for `OBJ_SET`, the value below the key.
    fn member(&mut self, opcode: Opcode) -> VmResult<Flow> {
        let arity = if opcode == Opcode::ObjSet { 3 } else { 2 };
        self.require(opcode, arity)?;
        let (object, key) = (self.operand_at(0), self.operand_at(1));
        let key = match unwrap_host::<String>(&self.heap, key) {
            Ok(key) => key.clone(),
            Err(ObjectError::Dispatch { .. } | ObjectError::TypeMismatch { .. }) => {
                return Err(VmError::InvalidMemberKey)
            }
            Err(other) => return Err(other.into()),
        };

        match opcode {
            Opcode::ObjGet => {
                let value = get_member(&self.heap, object, &key)?
                    .ok_or_else(|| ObjectError::dispatch(key.as_str()))?;
                self.discard(arity);
                self.push(value);
            }
            Opcode::ObjSet => {
                let value = self.operand_at(2);
                set_member(&mut self.heap, object, key, value)?;
                self.discard(arity);
            }
            _ => {
                remove_member(&mut self.heap, object, &key)?;
                self.discard(arity);
            }
        }
        Ok(Flow::Next)
    }

    fn operand_at(&self, depth: usize) -> Handle {
        self.data_stack.as_slice()[self.data_stack.len() - 1 - depth]
    }

    fn discard(&mut self, count: usize) {
        for _ in 0..count {
            self.pop();
        }
    }
}
