//! Scoped-thread fork-join execution of one parallel attempt.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread;

use strand_state::{BailoutCause, BailoutRecord, ExecCx, Value};

use crate::kernel::{Kernel, KernelError, KernelFault};
use crate::slice::{partition, SliceBounds};

/// What a worker does with its remaining indices after flagging a violation.
///
/// Either policy surfaces the violation to the coordinator; they differ only
/// in how much doomed work the attempt performs. The denied write never
/// mutates shared state under either policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViolationPolicy {
    /// Stop the violating worker and signal the other slices to stop at
    /// their next check. Minimizes wasted computation.
    #[default]
    AbortEarly,
    /// Keep invoking the kernel for the worker's remaining indices. Simpler
    /// worker behavior, bounded worst-case waste.
    RunToCompletion,
}

/// Outcome of one parallel attempt.
#[derive(Debug)]
pub enum ParallelResult {
    /// No slice flagged a violation. Slots are stitched in index order but
    /// not yet validated; the result builder checks them on commit.
    Success(Vec<Option<Value>>),
    /// At least one slice flagged a violation. All output from the attempt
    /// has been discarded — including from slices that did not violate,
    /// since they may have observed pre-violation shared state.
    RetrySequentially(BailoutRecord),
    /// A kernel raised an application fault. Propagates to the caller;
    /// never retried.
    Fatal {
        /// Index whose invocation faulted.
        index: usize,
        /// The fault itself.
        fault: KernelFault,
    },
    /// A worker thread panicked. Internal engine error.
    Panicked {
        /// Slice whose worker panicked.
        slice_id: u32,
    },
}

/// Everything one worker brings back to the join point.
struct SliceOutcome {
    slots: Vec<Option<Value>>,
    bailout: Option<BailoutRecord>,
    fault: Option<(usize, KernelFault)>,
}

/// Fixed-width pool of fork-join workers.
///
/// The pool itself is cheap: workers are scoped threads spawned per attempt,
/// one per slice, joined before the attempt's outcome is aggregated.
#[derive(Debug)]
pub struct WorkerPool {
    num_workers: usize,
}

impl WorkerPool {
    /// Create a pool with the given number of workers; `0` means one worker
    /// per available core.
    pub fn new(num_workers: usize) -> Self {
        let num_workers = if num_workers == 0 {
            rayon::current_num_threads()
        } else {
            num_workers
        };
        WorkerPool { num_workers }
    }

    /// Number of workers the pool will use.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Run one parallel attempt of `kernel` over `[0, length)`.
    ///
    /// Spawns at most `min(num_workers, length)` scoped workers, each owning
    /// a contiguous slice and a private output slot per index. Returns only
    /// after every worker has completed or been aborted; no partial state
    /// escapes before the join.
    #[tracing::instrument(level = "debug", skip_all, fields(length = length, policy = ?policy))]
    pub fn fork_join<K: Kernel>(
        &self,
        length: usize,
        kernel: &K,
        policy: ViolationPolicy,
    ) -> ParallelResult {
        if length == 0 {
            return ParallelResult::Success(Vec::new());
        }

        let bounds = partition(length, worker_count(self.num_workers));
        let num_slices = slice_count(&bounds);
        let abort = match policy {
            ViolationPolicy::AbortEarly => Some(Arc::new(AtomicBool::new(false))),
            ViolationPolicy::RunToCompletion => None,
        };

        let mut outcomes: Vec<SliceOutcome> = Vec::with_capacity(bounds.len());
        let mut panicked: Option<u32> = None;

        thread::scope(|s| {
            let handles: Vec<_> = bounds
                .into_iter()
                .map(|slice| {
                    let abort = abort.clone();
                    let slice_id = slice.slice_id;
                    let handle =
                        s.spawn(move || run_slice(kernel, &slice, num_slices, abort, policy));
                    (slice_id, handle)
                })
                .collect();

            // Join barrier: every worker finishes before aggregation starts.
            for (slice_id, handle) in handles {
                match handle.join() {
                    Ok(outcome) => outcomes.push(outcome),
                    Err(_) => {
                        if panicked.is_none() {
                            panicked = Some(slice_id);
                        }
                    }
                }
            }
        });

        if let Some(slice_id) = panicked {
            return ParallelResult::Panicked { slice_id };
        }
        aggregate(length, outcomes)
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(0)
    }
}

fn worker_count(num_workers: usize) -> u32 {
    u32::try_from(num_workers).unwrap_or(u32::MAX)
}

fn slice_count(bounds: &[SliceBounds]) -> u32 {
    u32::try_from(bounds.len()).unwrap_or(u32::MAX)
}

/// Process one slice's indices. Runs on the worker's own thread.
fn run_slice<K: Kernel>(
    kernel: &K,
    slice: &SliceBounds,
    num_slices: u32,
    abort: Option<Arc<AtomicBool>>,
    policy: ViolationPolicy,
) -> SliceOutcome {
    let cx = ExecCx::guarded(slice.slice_id, num_slices, abort);
    let mut slots: Vec<Option<Value>> = vec![None; slice.len()];
    let mut fault = None;

    for (offset, index) in slice.range.clone().enumerate() {
        cx.begin(index);
        if !cx.check() {
            // Another slice violated; stop without producing more slots.
            cx.flag_violation(BailoutCause::Interrupted);
            break;
        }
        match kernel.invoke(&cx, index) {
            Ok(value) => slots[offset] = Some(value),
            Err(KernelError::Bailout(cause)) => {
                // Usually already recorded by the write barrier; kernels can
                // also declare a bailout themselves (e.g. Unsupported).
                cx.flag_violation(cause);
                if policy == ViolationPolicy::AbortEarly {
                    break;
                }
            }
            Err(KernelError::Fault(f)) => {
                fault = Some((index, f));
                break;
            }
        }
    }

    SliceOutcome {
        slots,
        bailout: cx.violation(),
        fault,
    }
}

/// Decide the attempt's fate from the joined per-slice outcomes.
///
/// Faults dominate bailouts: a callback error must propagate even if some
/// other slice also flagged a violation.
fn aggregate(length: usize, outcomes: Vec<SliceOutcome>) -> ParallelResult {
    if let Some((index, fault)) = outcomes.iter().find_map(|outcome| outcome.fault.clone()) {
        return ParallelResult::Fatal { index, fault };
    }

    let bailouts: Vec<BailoutRecord> = outcomes
        .iter()
        .filter_map(|outcome| outcome.bailout)
        .collect();
    if !bailouts.is_empty() {
        // Prefer a root cause over the Interrupted echoes it produced.
        let record = bailouts
            .iter()
            .find(|record| record.cause != BailoutCause::Interrupted)
            .or_else(|| bailouts.first())
            .copied()
            .unwrap_or(BailoutRecord {
                cause: BailoutCause::Interrupted,
                slice_id: 0,
                index: 0,
            });
        tracing::debug!(target: "strand::bailout", %record, "parallel attempt bailed");
        return ParallelResult::RetrySequentially(record);
    }

    let mut slots = Vec::with_capacity(length);
    for outcome in outcomes {
        slots.extend(outcome.slots);
    }
    ParallelResult::Success(slots)
}
