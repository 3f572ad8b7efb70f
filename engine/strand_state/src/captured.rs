//! Explicit handles to captured shared state.
//!
//! State reachable from a kernel's enclosing scope is never ambient: it is
//! wrapped in a [`Captured`] handle and cloned into each worker. Reads are
//! shared and always legal; writes go through the guard in the worker's
//! [`ExecCx`]. The handle is the write barrier the violation detector relies
//! on — every alias of the captured object is a clone of the same handle, so
//! every write path is covered.

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::guard::{BailoutCause, ExecCx, GuardMode, WriteViolation};
use crate::record::RecordValue;

/// Thread-safe handle to one piece of captured shared state.
///
/// Clones share the same underlying object (`Arc` internally, in the manner
/// of a shared mutable registry). Identity is observable through
/// [`Captured::same_object`].
pub struct Captured<T>(Arc<RwLock<T>>);

/// Handle to a captured record object.
pub type CapturedRecord = Captured<RecordValue>;

impl<T> Captured<T> {
    /// Wrap an owned value in a shared handle.
    pub fn new(value: T) -> Self {
        Captured(Arc::new(RwLock::new(value)))
    }

    /// Read access. Always legal: captured state is read-shared across
    /// workers during a parallel attempt.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read()
    }

    /// Write access, checked against the execution context.
    ///
    /// In an open context the write guard is returned. In a guarded context
    /// the write is a violation: it is recorded in `cx` *before* this
    /// returns (so a kernel that discards the error is still caught), the
    /// shared state is left untouched, and `Err` is returned.
    pub fn write(&self, cx: &ExecCx) -> Result<RwLockWriteGuard<'_, T>, WriteViolation> {
        match cx.mode() {
            GuardMode::Open => Ok(self.0.write()),
            GuardMode::Guarded => {
                cx.flag_violation(BailoutCause::IllegalWrite);
                Err(WriteViolation {
                    cause: BailoutCause::IllegalWrite,
                })
            }
        }
    }

    /// Whether two handles name the same underlying object.
    pub fn same_object(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for Captured<T> {
    fn clone(&self) -> Self {
        Captured(Arc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Captured<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Captured({:?})", &*self.0.read())
    }
}

impl<T: fmt::Display> fmt::Display for Captured<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &*self.0.read())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "tests can panic")]

    use super::*;
    use crate::value::Value;

    #[test]
    fn open_context_write_succeeds() {
        let cx = ExecCx::open();
        let captured = Captured::new(RecordValue::new());

        captured.write(&cx).unwrap().set("x", Value::Int(1));
        assert_eq!(captured.read().get("x"), Some(&Value::Int(1)));
        assert_eq!(cx.violation(), None);
    }

    #[test]
    fn guarded_write_is_denied_and_flagged() {
        let cx = ExecCx::guarded(0, 2, None);
        let captured = Captured::new(RecordValue::from_fields([(
            "x".to_string(),
            Value::Int(1),
        )]));

        cx.begin(5);
        let denied = captured.write(&cx);
        assert!(denied.is_err());

        // State untouched, violation recorded at the offending index.
        assert_eq!(captured.read().get("x"), Some(&Value::Int(1)));
        let record = cx.violation().unwrap();
        assert_eq!(record.cause, BailoutCause::IllegalWrite);
        assert_eq!(record.index, 5);
    }

    #[test]
    fn swallowed_violation_is_still_recorded() {
        let cx = ExecCx::guarded(1, 2, None);
        let captured = Captured::new(0i64);

        cx.begin(9);
        // A badly behaved kernel drops the error and carries on.
        let _ = captured.write(&cx);
        assert!(cx.violation().is_some());
    }

    #[test]
    fn guarded_read_is_legal() {
        let cx = ExecCx::guarded(0, 1, None);
        let captured = Captured::new(41i64);
        assert_eq!(*captured.read(), 41);
        assert_eq!(cx.violation(), None);
    }

    #[test]
    fn clones_alias_the_same_object() {
        let a = Captured::new(RecordValue::new());
        let b = a.clone();
        let c = Captured::new(RecordValue::new());

        assert!(a.same_object(&b));
        assert!(!a.same_object(&c));

        let cx = ExecCx::open();
        b.write(&cx).unwrap().set("y", Value::Int(2));
        assert_eq!(a.read().get("y"), Some(&Value::Int(2)));
    }
}
