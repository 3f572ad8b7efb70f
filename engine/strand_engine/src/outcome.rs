//! The externally observable outcome of one construction request.

use strand_state::{BailoutRecord, Value};

/// Which path produced the final values.
///
/// Fatal faults are reported through the `Err` channel instead, so there is
/// no third status here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// The parallel attempt committed.
    Parallel,
    /// Sequential execution produced the values, either because the request
    /// never attempted a parallel pass or because the attempt bailed.
    Sequential,
}

/// A completed array construction.
#[derive(Debug)]
pub struct Execution {
    /// The final ordered values, one per index.
    pub values: Vec<Value>,
    /// Which path produced `values`.
    pub status: ExecutionStatus,
    /// Set when a parallel attempt was made and discarded.
    pub bailout: Option<BailoutRecord>,
}

impl Execution {
    /// Whether a parallel attempt was discarded on the way to this result.
    pub fn bailed(&self) -> bool {
        self.bailout.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strand_state::BailoutCause;

    #[test]
    fn bailed_tracks_the_record() {
        let clean = Execution {
            values: vec![Value::Int(1)],
            status: ExecutionStatus::Parallel,
            bailout: None,
        };
        assert!(!clean.bailed());

        let bailed = Execution {
            values: vec![Value::Int(1)],
            status: ExecutionStatus::Sequential,
            bailout: Some(BailoutRecord {
                cause: BailoutCause::IllegalWrite,
                slice_id: 0,
                index: 0,
            }),
        };
        assert!(bailed.bailed());
    }
}
