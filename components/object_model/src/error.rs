//! Object model errors.

use memory_manager::{AllocError, Handle};
use thiserror::Error;

/// Failure while dispatching a message or touching a heap value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectError {
    /// No binding for the selector anywhere along the dispatch chain.
    #[error("no binding for selector `{selector}`")]
    Dispatch {
        /// The selector originally sent
        selector: String,
    },
    /// A value could not be allocated.
    #[error(transparent)]
    Alloc(#[from] AllocError),
    /// The handle refers to a value that has already been collected.
    #[error("stale handle {0}")]
    StaleHandle(Handle),
    /// The value is not of the kind the operation needs.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        /// Kind the operation works on
        expected: &'static str,
        /// Kind actually found
        found: &'static str,
    },
    /// A native method or function reported a failure.
    #[error("native failure: {0}")]
    Native(String),
}

impl ObjectError {
    /// Builds a dispatch failure for `selector`.
    pub fn dispatch(selector: impl Into<String>) -> Self {
        ObjectError::Dispatch {
            selector: selector.into(),
        }
    }

    /// The unresolved selector, if this is a dispatch failure.
    pub fn selector(&self) -> Option<&str> {
        match self {
            ObjectError::Dispatch { selector } => Some(selector),
            _ => None,
        }
    }

    /// Returns true for dispatch failures, which hosts may catch and
    /// recover from.
    pub fn is_dispatch_failure(&self) -> bool {
        matches!(self, ObjectError::Dispatch { .. })
    }
}

/// Result alias for object model operations.
pub type ObjectResult<T> = Result<T, ObjectError>;
