//! Strand Pool - parallel worker pool for speculative array construction.
//!
//! This crate runs one parallel attempt of an array construction: it
//! partitions `[0, length)` into contiguous slices, runs the kernel across
//! the slices on scoped worker threads, and aggregates the per-slice
//! outcomes into a single [`ParallelResult`]:
//!
//! - `Success`: no slice flagged a violation; the stitched output slots are
//!   handed to the coordinator for commit.
//! - `RetrySequentially`: at least one slice flagged a violation; every slot
//!   from the attempt is discarded and the coordinator falls back to
//!   sequential execution.
//! - `Fatal`: a kernel returned an application fault (or a worker panicked);
//!   this propagates to the caller and is never retried.
//!
//! Workers own their output slots exclusively; the only state shared across
//! workers is read-shared captured state and the abort flag.

mod kernel;
mod pool;
mod slice;

pub use kernel::{Kernel, KernelError, KernelFault, KernelResult};
pub use pool::{ParallelResult, ViolationPolicy, WorkerPool};
pub use slice::{partition, SliceBounds};
