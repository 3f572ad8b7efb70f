//! The per-index kernel contract.

use std::fmt;

use strand_state::{BailoutCause, ExecCx, Value, WriteViolation};

/// Result of one kernel invocation.
pub type KernelResult = Result<Value, KernelError>;

/// A user-supplied per-index function.
///
/// The kernel is invoked once per index, in no particular order during a
/// parallel attempt and in increasing index order during sequential
/// execution. It receives the worker's [`ExecCx`] so that captured-state
/// writes can be checked against the guard; kernels that need to behave
/// differently under parallel execution can consult [`ExecCx::mode`].
pub trait Kernel: Sync {
    /// Produce the value for `index`.
    fn invoke(&self, cx: &ExecCx, index: usize) -> KernelResult;
}

impl<F> Kernel for F
where
    F: Fn(&ExecCx, usize) -> KernelResult + Sync,
{
    fn invoke(&self, cx: &ExecCx, index: usize) -> KernelResult {
        self(cx, index)
    }
}

/// Why a kernel invocation did not produce a value.
///
/// The two variants are different failure classes and are handled on
/// different paths: a `Bailout` is an engine safety condition, recovered
/// internally by discarding the parallel attempt; a `Fault` is an
/// application error and propagates to the caller unmodified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KernelError {
    /// The invocation hit a condition illegal under parallel execution.
    Bailout(BailoutCause),
    /// The kernel itself failed; not recoverable by bailing out.
    Fault(KernelFault),
}

impl KernelError {
    /// Convenience constructor for an application fault.
    pub fn fault(message: impl Into<String>) -> Self {
        KernelError::Fault(KernelFault::new(message))
    }
}

impl From<WriteViolation> for KernelError {
    fn from(violation: WriteViolation) -> Self {
        KernelError::Bailout(violation.cause)
    }
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bailout(cause) => write!(f, "parallel bailout: {cause}"),
            Self::Fault(fault) => write!(f, "{fault}"),
        }
    }
}

impl std::error::Error for KernelError {}

/// An application error raised by a kernel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KernelFault {
    message: String,
}

impl KernelFault {
    /// Create a fault with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        KernelFault {
            message: message.into(),
        }
    }

    /// The fault message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for KernelFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "kernel fault: {}", self.message)
    }
}

impl std::error::Error for KernelFault {}

#[cfg(test)]
mod tests {
    use super::*;
    use strand_state::GuardMode;

    #[test]
    fn closures_are_kernels() {
        let kernel = |cx: &ExecCx, index: usize| -> KernelResult {
            assert_eq!(cx.mode(), GuardMode::Open);
            Ok(Value::Int(i64::try_from(index).map_err(|_| KernelError::fault("index"))?))
        };
        let cx = ExecCx::open();
        assert_eq!(kernel.invoke(&cx, 7), Ok(Value::Int(7)));
    }

    #[test]
    fn write_violation_converts_to_bailout() {
        let violation = WriteViolation {
            cause: BailoutCause::IllegalWrite,
        };
        let err = KernelError::from(violation);
        assert_eq!(err, KernelError::Bailout(BailoutCause::IllegalWrite));
        assert_eq!(
            err.to_string(),
            "parallel bailout: illegal write to captured state"
        );
    }

    #[test]
    fn fault_display_carries_message() {
        let err = KernelError::fault("array too spiky");
        assert_eq!(err.to_string(), "kernel fault: array too spiky");
    }
}
