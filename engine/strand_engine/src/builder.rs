//! Result array builder.
//!
//! The last step of either path: turn the slot vector into the final ordered
//! values, refusing to commit anything that does not cover every index
//! exactly once. An unpopulated slot here means a coordinator or worker-pool
//! bug, not a user condition.

use strand_state::Value;

use crate::errors::{length_mismatch, EngineResult};

/// Materialize the final values from a parallel attempt's slots.
pub(crate) fn commit(expected: usize, slots: Vec<Option<Value>>) -> EngineResult<Vec<Value>> {
    let populated = slots.iter().filter(|slot| slot.is_some()).count();
    if slots.len() != expected || populated != expected {
        return Err(length_mismatch(expected, populated));
    }
    Ok(slots.into_iter().flatten().collect())
}
