//! Call frames.

use memory_manager::{Handle, Tracer};

/// One activation record on the VM call stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    return_address: usize,
    callable: Option<Handle>,
    code: Handle,
    exception_handler: Option<usize>,
}

impl Frame {
    /// Bottom frame running `code` from the host; it has no callable and
    /// nowhere to return to.
    pub fn entry(code: Handle) -> Self {
        Self {
            return_address: 0,
            callable: None,
            code,
            exception_handler: None,
        }
    }

    /// Frame for a guest call.
    ///
    /// # Arguments
    ///
    /// * `return_address` - Address in the caller's code to resume at
    /// * `callable` - The callable being run
    /// * `code` - Code block of the callable
    pub fn call(return_address: usize, callable: Handle, code: Handle) -> Self {
        Self {
            return_address,
            callable: Some(callable),
            code,
            exception_handler: None,
        }
    }

    /// Address `RET` resumes at
    pub fn return_address(&self) -> usize {
        self.return_address
    }

    /// Callable being run, `None` for the entry frame
    pub fn callable(&self) -> Option<Handle> {
        self.callable
    }

    /// Code block the program counter indexes into
    pub fn code(&self) -> Handle {
        self.code
    }

    /// Installed exception handler address
    pub fn exception_handler(&self) -> Option<usize> {
        self.exception_handler
    }

    /// Install a handler address
    pub fn set_exception_handler(&mut self, address: usize) {
        self.exception_handler = Some(address);
    }

    /// Remove the handler
    pub fn clear_exception_handler(&mut self) {
        self.exception_handler = None;
    }

    pub(crate) fn report(&self, tracer: &mut Tracer) {
        tracer.visit_opt(self.callable);
        tracer.visit(self.code);
    }
}
