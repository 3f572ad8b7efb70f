//! Strand State - runtime values and captured-state guards.
//!
//! This crate provides the data side of the Strand speculative execution
//! engine:
//!
//! - `Value`: the runtime value produced per array index
//! - `Heap<T>`: enforced-Arc wrapper for heap-allocated value payloads
//! - `RecordValue`: a mutable record object with named fields
//! - `Captured<T>`: an explicit handle to state captured by a kernel's
//!   enclosing scope, shared across all parallel workers
//! - `ExecCx`: the per-worker execution context carrying the write guard
//!   mode and violation bookkeeping
//!
//! # Captured state and the write barrier
//!
//! Kernels never touch shared state through ambient globals. Anything a
//! kernel captures is wrapped in a [`Captured`] handle, and every write goes
//! through [`Captured::write`], which consults the [`ExecCx`] it is given.
//! During a parallel attempt the context is guarded: the write is denied,
//! the violation is recorded, and the coordinator later discards the whole
//! attempt. During sequential execution the context is open and writes
//! succeed unconditionally.

mod captured;
mod guard;
mod heap;
mod record;
mod value;

pub use captured::{Captured, CapturedRecord};
pub use guard::{BailoutCause, BailoutRecord, ExecCx, GuardMode, WriteViolation};
pub use heap::Heap;
pub use record::RecordValue;
pub use value::Value;
