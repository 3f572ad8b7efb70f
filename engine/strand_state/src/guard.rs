//! Execution contexts, guard modes, and bailout bookkeeping.
//!
//! Every kernel invocation receives an [`ExecCx`]. The context determines
//! whether writes to captured state are legal ([`GuardMode::Open`], the
//! sequential path) or watched ([`GuardMode::Guarded`], a parallel attempt).
//!
//! The guarded path records violations *in the context itself*, not only in
//! the error returned to the kernel. A kernel that swallows the
//! [`WriteViolation`] error and returns a value anyway is still caught: the
//! pool reads the context's violation record after the worker finishes, so
//! there are no false negatives.

use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Whether captured-state writes are legal in the current execution context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardMode {
    /// Sequential execution. Writes to captured state succeed.
    Open,
    /// Parallel attempt. Writes to captured state are denied and flagged.
    Guarded,
}

/// Why a parallel attempt had to be abandoned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BailoutCause {
    /// A kernel wrote to captured shared state during a parallel attempt.
    IllegalWrite,
    /// A worker stopped early because another slice flagged a violation.
    Interrupted,
    /// A kernel declared its operation unsupported in parallel mode.
    Unsupported,
}

impl fmt::Display for BailoutCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IllegalWrite => write!(f, "illegal write to captured state"),
            Self::Interrupted => write!(f, "interrupted by another slice's violation"),
            Self::Unsupported => write!(f, "operation unsupported in parallel mode"),
        }
    }
}

/// Where a parallel attempt went wrong: cause plus a single-frame trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BailoutRecord {
    /// Why the attempt was abandoned.
    pub cause: BailoutCause,
    /// Slice that flagged the violation.
    pub slice_id: u32,
    /// Index the slice was processing when it flagged.
    pub index: usize,
}

impl fmt::Display for BailoutRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (slice {}, index {})",
            self.cause, self.slice_id, self.index
        )
    }
}

/// Error returned to a kernel whose captured-state write was denied.
///
/// Returning this through `?` aborts the invocation, but the violation is
/// already recorded in the context either way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteViolation {
    /// The cause recorded for this violation.
    pub cause: BailoutCause,
}

impl fmt::Display for WriteViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "write denied: {}", self.cause)
    }
}

impl std::error::Error for WriteViolation {}

/// Per-worker execution context.
///
/// One context exists per slice during a parallel attempt (and a single open
/// context during sequential execution). It is confined to the worker's
/// thread; the only cross-thread member is the shared abort flag.
pub struct ExecCx {
    mode: GuardMode,
    slice_id: u32,
    num_slices: u32,
    /// Index currently being processed; set by `begin` before each invocation.
    index: Cell<usize>,
    /// First violation observed by this worker, if any.
    violation: Cell<Option<BailoutRecord>>,
    /// Raised on first violation anywhere; present only under abort-early.
    abort: Option<Arc<AtomicBool>>,
}

impl ExecCx {
    /// Create an open (sequential) context. Writes to captured state succeed.
    pub fn open() -> Self {
        ExecCx {
            mode: GuardMode::Open,
            slice_id: 0,
            num_slices: 1,
            index: Cell::new(0),
            violation: Cell::new(None),
            abort: None,
        }
    }

    /// Create a guarded context for one slice of a parallel attempt.
    ///
    /// `abort` is the shared early-abort flag; pass `None` under the
    /// run-to-completion policy.
    pub fn guarded(slice_id: u32, num_slices: u32, abort: Option<Arc<AtomicBool>>) -> Self {
        ExecCx {
            mode: GuardMode::Guarded,
            slice_id,
            num_slices,
            index: Cell::new(0),
            violation: Cell::new(None),
            abort,
        }
    }

    /// Guard mode of this context.
    #[inline]
    pub fn mode(&self) -> GuardMode {
        self.mode
    }

    /// Which slice this context belongs to. Ranges from 0 to `num_slices`.
    #[inline]
    pub fn slice_id(&self) -> u32 {
        self.slice_id
    }

    /// Total number of slices in the attempt.
    #[inline]
    pub fn num_slices(&self) -> u32 {
        self.num_slices
    }

    /// Record the index about to be processed.
    ///
    /// Workers call this before each kernel invocation so violation records
    /// can point at the offending index.
    #[inline]
    pub fn begin(&self, index: usize) {
        self.index.set(index);
    }

    /// Record a violation at the current index.
    ///
    /// Only the first violation per worker is kept. Raises the shared abort
    /// flag when one is installed.
    pub fn flag_violation(&self, cause: BailoutCause) {
        if self.violation.get().is_none() {
            self.violation.set(Some(BailoutRecord {
                cause,
                slice_id: self.slice_id,
                index: self.index.get(),
            }));
        }
        if let Some(abort) = &self.abort {
            abort.store(true, Ordering::Release);
        }
    }

    /// Cooperative abort check.
    ///
    /// Workers call this before each invocation. Returns `false` once any
    /// slice has flagged a violation under the abort-early policy; the caller
    /// should stop processing its remaining indices.
    #[inline]
    pub fn check(&self) -> bool {
        match &self.abort {
            Some(abort) => !abort.load(Ordering::Acquire),
            None => true,
        }
    }

    /// The violation recorded by this worker, if any.
    pub fn violation(&self) -> Option<BailoutRecord> {
        self.violation.get()
    }
}

impl fmt::Debug for ExecCx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecCx")
            .field("mode", &self.mode)
            .field("slice_id", &self.slice_id)
            .field("num_slices", &self.num_slices)
            .field("violation", &self.violation.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "tests can panic")]

    use super::*;

    #[test]
    fn open_context_has_no_abort() {
        let cx = ExecCx::open();
        assert_eq!(cx.mode(), GuardMode::Open);
        assert!(cx.check());
        assert_eq!(cx.violation(), None);
    }

    #[test]
    fn flag_violation_keeps_first_record() {
        let cx = ExecCx::guarded(2, 4, None);
        cx.begin(17);
        cx.flag_violation(BailoutCause::IllegalWrite);
        cx.begin(18);
        cx.flag_violation(BailoutCause::Unsupported);

        let record = cx.violation().unwrap();
        assert_eq!(record.cause, BailoutCause::IllegalWrite);
        assert_eq!(record.slice_id, 2);
        assert_eq!(record.index, 17);
    }

    #[test]
    fn abort_flag_is_shared_across_contexts() {
        let abort = Arc::new(AtomicBool::new(false));
        let a = ExecCx::guarded(0, 2, Some(Arc::clone(&abort)));
        let b = ExecCx::guarded(1, 2, Some(Arc::clone(&abort)));

        assert!(b.check());
        a.flag_violation(BailoutCause::IllegalWrite);
        assert!(!b.check());
        // Only the flagging context carries the record.
        assert_eq!(b.violation(), None);
    }

    #[test]
    fn run_to_completion_context_never_aborts() {
        let cx = ExecCx::guarded(0, 1, None);
        cx.flag_violation(BailoutCause::IllegalWrite);
        assert!(cx.check());
        assert!(cx.violation().is_some());
    }

    #[test]
    fn bailout_record_display() {
        let record = BailoutRecord {
            cause: BailoutCause::IllegalWrite,
            slice_id: 3,
            index: 42,
        };
        assert_eq!(
            record.to_string(),
            "illegal write to captured state (slice 3, index 42)"
        );
    }
}
