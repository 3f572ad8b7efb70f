//! Engine error types.
//!
//! Two classes of failure reach the caller, and one deliberately does not:
//!
//! - Callback faults (`CallbackFault`) propagate unmodified from the kernel,
//!   whether they occurred during a parallel or a sequential run.
//! - Internal consistency errors (`LengthMismatch`, `IllegalTransition`,
//!   `WorkerPanicked`, `BailoutInSequential`) indicate engine bugs and
//!   should never be observable through a well-formed engine.
//! - Illegal concurrent writes are *not* errors: they trigger bailout, which
//!   is a recovery path, so there is no variant for them here.

use std::fmt;

use strand_state::BailoutCause;

use crate::state_machine::AttemptState;

/// Result of an engine operation.
pub type EngineResult<T> = Result<T, EngineError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineErrorKind {
    /// The kernel signaled an application error at `index`.
    CallbackFault {
        /// Index whose invocation faulted.
        index: usize,
        /// The kernel's error message.
        message: String,
    },
    /// A parallel worker panicked. Engine bug or kernel bug, fatal.
    WorkerPanicked {
        /// Slice whose worker panicked.
        slice_id: u32,
    },
    /// The result array builder found unpopulated or excess slots.
    LengthMismatch {
        /// Slots the request demanded.
        expected: usize,
        /// Slots actually populated.
        populated: usize,
    },
    /// The coordinator attempted an edge outside the transition table.
    IllegalTransition {
        /// State the machine was in.
        from: AttemptState,
        /// State the coordinator tried to reach.
        to: AttemptState,
    },
    /// A kernel reported a parallel bailout while running unguarded.
    /// Sequential execution is legal by definition, so this is a kernel
    /// contract violation.
    BailoutInSequential {
        /// The cause the kernel reported.
        cause: BailoutCause,
    },
}

impl fmt::Display for EngineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CallbackFault { index, message } => {
                write!(f, "callback failed at index {index}: {message}")
            }
            Self::WorkerPanicked { slice_id } => {
                write!(f, "worker for slice {slice_id} panicked")
            }
            Self::LengthMismatch {
                expected,
                populated,
            } => write!(
                f,
                "result array builder: expected {expected} populated slots, found {populated}"
            ),
            Self::IllegalTransition { from, to } => {
                write!(f, "illegal coordinator transition: {from} -> {to}")
            }
            Self::BailoutInSequential { cause } => {
                write!(f, "kernel reported a parallel bailout ({cause}) during sequential execution")
            }
        }
    }
}

/// An error produced by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineError {
    kind: EngineErrorKind,
}

impl EngineError {
    /// The typed category of this error.
    pub fn kind(&self) -> &EngineErrorKind {
        &self.kind
    }

    /// Whether this error came from the caller's kernel rather than the
    /// engine itself.
    pub fn is_callback_fault(&self) -> bool {
        matches!(self.kind, EngineErrorKind::CallbackFault { .. })
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::error::Error for EngineError {}

// Factory constructors, one per kind.

/// The kernel failed at `index` with `message`.
pub(crate) fn callback_fault(index: usize, message: impl Into<String>) -> EngineError {
    EngineError {
        kind: EngineErrorKind::CallbackFault {
            index,
            message: message.into(),
        },
    }
}

/// A worker thread panicked.
pub(crate) fn worker_panicked(slice_id: u32) -> EngineError {
    EngineError {
        kind: EngineErrorKind::WorkerPanicked { slice_id },
    }
}

/// The committed slot vector did not cover every index exactly once.
pub(crate) fn length_mismatch(expected: usize, populated: usize) -> EngineError {
    EngineError {
        kind: EngineErrorKind::LengthMismatch {
            expected,
            populated,
        },
    }
}

/// The coordinator tried to walk an edge outside the transition table.
pub(crate) fn illegal_transition(from: AttemptState, to: AttemptState) -> EngineError {
    EngineError {
        kind: EngineErrorKind::IllegalTransition { from, to },
    }
}

/// A kernel bailed while unguarded.
pub(crate) fn bailout_in_sequential(cause: BailoutCause) -> EngineError {
    EngineError {
        kind: EngineErrorKind::BailoutInSequential { cause },
    }
}
