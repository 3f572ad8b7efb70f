//! Engine configuration and the construction entry point.

use strand_pool::{Kernel, ParallelResult, ViolationPolicy, WorkerPool};

use crate::builder::commit;
use crate::errors::{callback_fault, illegal_transition, worker_panicked, EngineResult};
use crate::mode::BuildMode;
use crate::outcome::{Execution, ExecutionStatus};
use crate::sequential::run_sequential;
use crate::state_machine::AttemptState;

/// Default parallelism threshold for [`BuildMode::Auto`]: any non-empty
/// request attempts a parallel pass.
const DEFAULT_PAR_THRESHOLD: usize = 1;

/// The speculative array-construction engine.
///
/// Owns the worker pool configuration and the bailout coordinator. An engine
/// is immutable once built and can serve any number of construction requests
/// from any thread.
#[derive(Debug)]
pub struct Engine {
    pool: WorkerPool,
    policy: ViolationPolicy,
    par_threshold: usize,
}

impl Engine {
    /// Engine with default configuration: one worker per core, abort-early
    /// violation policy.
    pub fn new() -> Self {
        EngineBuilder::new().build()
    }

    /// Start configuring an engine.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Number of parallel workers this engine uses.
    pub fn num_workers(&self) -> usize {
        self.pool.num_workers()
    }

    /// Build an array of `length` values by invoking `kernel` once per index.
    ///
    /// The returned values are always identical in content to invoking the
    /// kernel sequentially for every index in order. When a parallel attempt
    /// was made and discarded, [`Execution::bailout`] carries the record;
    /// the discarded attempt leaks nothing into the result, including any
    /// captured-state mutation.
    ///
    /// Kernel faults propagate as [`crate::EngineErrorKind::CallbackFault`]
    /// from whichever path hit them; they never trigger a retry.
    #[tracing::instrument(level = "debug", skip_all, fields(length = length, mode = ?mode))]
    pub fn build_array<K: Kernel>(
        &self,
        length: usize,
        kernel: &K,
        mode: BuildMode,
    ) -> EngineResult<Execution> {
        let mut state = AttemptState::NotStarted;

        if !mode.attempts_parallel(length, self.par_threshold) {
            transition(&mut state, AttemptState::SequentialAttempt)?;
            let values = run_sequential(length, kernel)?;
            transition(&mut state, AttemptState::Done)?;
            return Ok(Execution {
                values,
                status: ExecutionStatus::Sequential,
                bailout: None,
            });
        }

        transition(&mut state, AttemptState::ParallelAttempt)?;
        match self.pool.fork_join(length, kernel, self.policy) {
            ParallelResult::Success(slots) => {
                transition(&mut state, AttemptState::Committed)?;
                let values = commit(length, slots)?;
                transition(&mut state, AttemptState::Done)?;
                Ok(Execution {
                    values,
                    status: ExecutionStatus::Parallel,
                    bailout: None,
                })
            }
            ParallelResult::RetrySequentially(record) => {
                transition(&mut state, AttemptState::BailingOut)?;
                tracing::debug!(target: "strand::bailout", %record, "discarding parallel attempt");
                transition(&mut state, AttemptState::SequentialAttempt)?;
                let values = run_sequential(length, kernel)?;
                transition(&mut state, AttemptState::Done)?;
                Ok(Execution {
                    values,
                    status: ExecutionStatus::Sequential,
                    bailout: Some(record),
                })
            }
            ParallelResult::Fatal { index, fault } => {
                Err(callback_fault(index, fault.message()))
            }
            ParallelResult::Panicked { slice_id } => Err(worker_panicked(slice_id)),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk one edge of the coordinator state machine.
fn transition(state: &mut AttemptState, next: AttemptState) -> EngineResult<()> {
    if !state.permits(next) {
        return Err(illegal_transition(*state, next));
    }
    tracing::debug!(target: "strand::ops", from = %state, to = %next, "coordinator transition");
    *state = next;
    Ok(())
}

/// Builder for [`Engine`] instances.
pub struct EngineBuilder {
    workers: usize,
    policy: ViolationPolicy,
    par_threshold: usize,
}

impl EngineBuilder {
    /// Start from the defaults.
    pub fn new() -> Self {
        EngineBuilder {
            workers: 0,
            policy: ViolationPolicy::default(),
            par_threshold: DEFAULT_PAR_THRESHOLD,
        }
    }

    /// Set the number of parallel workers; `0` means one per core.
    #[must_use]
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set what workers do with remaining indices after a violation.
    #[must_use]
    pub fn violation_policy(mut self, policy: ViolationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Minimum length at which [`BuildMode::Auto`] attempts a parallel pass.
    #[must_use]
    pub fn par_threshold(mut self, par_threshold: usize) -> Self {
        self.par_threshold = par_threshold;
        self
    }

    /// Finish configuration.
    pub fn build(self) -> Engine {
        Engine {
            pool: WorkerPool::new(self.workers),
            policy: self.policy,
            par_threshold: self.par_threshold,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
