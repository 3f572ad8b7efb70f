//! The deterministic single-threaded fallback.
//!
//! Runs with an open context: no violation detector is installed, because
//! sequential execution is legal by definition. Invokes the kernel once per
//! index in strictly increasing order.

use strand_pool::{Kernel, KernelError};
use strand_state::{ExecCx, Value};

use crate::errors::{bailout_in_sequential, callback_fault, EngineResult};

/// Produce a value for every index of `[0, length)`, in order.
pub(crate) fn run_sequential<K: Kernel>(length: usize, kernel: &K) -> EngineResult<Vec<Value>> {
    let cx = ExecCx::open();
    let mut values = Vec::with_capacity(length);
    for index in 0..length {
        cx.begin(index);
        match kernel.invoke(&cx, index) {
            Ok(value) => values.push(value),
            Err(KernelError::Fault(fault)) => {
                return Err(callback_fault(index, fault.message()));
            }
            Err(KernelError::Bailout(cause)) => {
                return Err(bailout_in_sequential(cause));
            }
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "tests can panic")]

    use super::*;
    use strand_pool::KernelResult;
    use strand_state::{BailoutCause, Captured, RecordValue};

    #[test]
    fn runs_every_index_in_order() {
        let trace = Captured::new(Vec::<usize>::new());
        let kernel = |cx: &ExecCx, index: usize| -> KernelResult {
            trace.write(cx)?.push(index);
            Ok(Value::Void)
        };
        let values = run_sequential(5, &kernel).unwrap();
        assert_eq!(values.len(), 5);
        assert_eq!(*trace.read(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn shared_writes_are_legal() {
        let shared = Captured::new(RecordValue::from_fields([(
            "n".to_string(),
            Value::Int(0),
        )]));
        let kernel = |cx: &ExecCx, _: usize| -> KernelResult {
            let mut record = shared.write(cx)?;
            let next = match record.get("n") {
                Some(Value::Int(n)) => n + 1,
                _ => 0,
            };
            record.set("n", Value::Int(next));
            Ok(Value::Int(next))
        };
        let values = run_sequential(3, &kernel).unwrap();
        assert_eq!(values, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(shared.read().get("n"), Some(&Value::Int(3)));
    }

    #[test]
    fn fault_propagates_with_index() {
        let kernel = |_: &ExecCx, index: usize| -> KernelResult {
            if index == 2 {
                Err(KernelError::fault("nope"))
            } else {
                Ok(Value::Int(0))
            }
        };
        let err = run_sequential(4, &kernel).unwrap_err();
        assert!(err.is_callback_fault());
        assert_eq!(err.to_string(), "callback failed at index 2: nope");
    }

    #[test]
    fn kernel_bailout_while_unguarded_is_an_engine_error() {
        let kernel = |_: &ExecCx, _: usize| -> KernelResult {
            Err(KernelError::Bailout(BailoutCause::Unsupported))
        };
        let err = run_sequential(1, &kernel).unwrap_err();
        assert!(!err.is_callback_fault());
    }
}
