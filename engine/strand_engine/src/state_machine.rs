//! The bailout coordinator's state machine.
//!
//! The commit/discard decision is an explicit tagged transition, not
//! exception-driven control flow: every attempt walks this machine, and an
//! edge outside the table is an internal engine error. That keeps the
//! decision auditable and testable.

use std::fmt;

/// Phase of one array-construction request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttemptState {
    /// Construction requested, nothing executed yet.
    NotStarted,
    /// Workers are (or were) running the parallel attempt.
    ParallelAttempt,
    /// All workers reported clean; parallel outputs adopted as final.
    Committed,
    /// A violation was flagged; every parallel output is being discarded.
    BailingOut,
    /// Re-invoking the kernel for every index in order, unguarded.
    SequentialAttempt,
    /// Final values produced.
    Done,
}

impl AttemptState {
    /// Whether the machine may move from `self` to `next`.
    ///
    /// `NotStarted -> SequentialAttempt` covers forced-sequential requests
    /// and auto requests below the parallelism threshold; every other edge
    /// is the speculative path.
    pub fn permits(self, next: AttemptState) -> bool {
        matches!(
            (self, next),
            (AttemptState::NotStarted, AttemptState::ParallelAttempt)
                | (AttemptState::NotStarted, AttemptState::SequentialAttempt)
                | (AttemptState::ParallelAttempt, AttemptState::Committed)
                | (AttemptState::ParallelAttempt, AttemptState::BailingOut)
                | (AttemptState::BailingOut, AttemptState::SequentialAttempt)
                | (AttemptState::Committed, AttemptState::Done)
                | (AttemptState::SequentialAttempt, AttemptState::Done)
        )
    }
}

impl fmt::Display for AttemptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotStarted => "not-started",
            Self::ParallelAttempt => "parallel-attempt",
            Self::Committed => "committed",
            Self::BailingOut => "bailing-out",
            Self::SequentialAttempt => "sequential-attempt",
            Self::Done => "done",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::AttemptState::*;

    const ALL: [super::AttemptState; 6] = [
        NotStarted,
        ParallelAttempt,
        Committed,
        BailingOut,
        SequentialAttempt,
        Done,
    ];

    #[test]
    fn commit_path() {
        assert!(NotStarted.permits(ParallelAttempt));
        assert!(ParallelAttempt.permits(Committed));
        assert!(Committed.permits(Done));
    }

    #[test]
    fn bailout_path() {
        assert!(ParallelAttempt.permits(BailingOut));
        assert!(BailingOut.permits(SequentialAttempt));
        assert!(SequentialAttempt.permits(Done));
    }

    #[test]
    fn forced_sequential_path() {
        assert!(NotStarted.permits(SequentialAttempt));
    }

    #[test]
    fn done_is_terminal() {
        for next in ALL {
            assert!(!Done.permits(next));
        }
    }

    #[test]
    fn no_shortcut_from_bailing_out_to_done() {
        assert!(!BailingOut.permits(Done));
        assert!(!BailingOut.permits(Committed));
        assert!(!NotStarted.permits(Committed));
        assert!(!SequentialAttempt.permits(ParallelAttempt));
    }
}
