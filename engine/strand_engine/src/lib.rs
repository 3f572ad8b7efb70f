//! Strand Engine - speculative parallel array construction.
//!
//! The engine builds an array of length N by invoking a per-index [`Kernel`].
//! It first attempts the construction in parallel across a worker pool; if
//! any worker writes to captured shared state (or otherwise flags a parallel
//! bailout), the entire parallel attempt is discarded and the kernel is
//! re-invoked sequentially for every index in order. The caller observes a
//! result identical in content to a purely sequential run, plus an
//! [`Execution::bailed`] flag saying which path produced it.
//!
//! # Architecture
//!
//! - `BuildMode`: caller-selected execution policy (auto / force parallel /
//!   force sequential)
//! - `AttemptState`: the bailout coordinator's explicit state machine
//! - `Engine` / `EngineBuilder`: configuration and the `build_array` entry
//!   point
//! - `commit`: the result array builder's final consistency check
//!
//! # Re-exports
//!
//! Value and pool types are re-exported from `strand_state` and
//! `strand_pool` for convenience, so most callers depend on this crate
//! alone.
//!
//! # Example
//!
//! ```
//! use strand_engine::{BuildMode, Engine, ExecCx, KernelResult, Value};
//!
//! # fn main() -> Result<(), strand_engine::EngineError> {
//! let engine = Engine::new();
//! let kernel = |_cx: &ExecCx, i: usize| -> KernelResult { Ok(Value::Int(i as i64 * 2)) };
//! let built = engine.build_array(4, &kernel, BuildMode::Auto)?;
//! assert_eq!(built.values.len(), 4);
//! assert!(!built.bailed());
//! # Ok(())
//! # }
//! ```

mod builder;
mod engine;
mod errors;
mod mode;
mod outcome;
mod sequential;
mod state_machine;

#[cfg(test)]
mod tests;

pub use engine::{Engine, EngineBuilder};
pub use errors::{EngineError, EngineErrorKind, EngineResult};
pub use mode::BuildMode;
pub use outcome::{Execution, ExecutionStatus};
pub use state_machine::AttemptState;

// Re-export the value model and kernel contract
pub use strand_pool::{Kernel, KernelError, KernelFault, KernelResult, ViolationPolicy, WorkerPool};
pub use strand_state::{
    BailoutCause, BailoutRecord, Captured, CapturedRecord, ExecCx, GuardMode, Heap, RecordValue,
    Value, WriteViolation,
};
