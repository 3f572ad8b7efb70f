//! Index-range partitioning for parallel attempts.

use std::ops::Range;

/// The contiguous index range owned by one slice.
///
/// No two slices of an attempt overlap, and together they cover
/// `[0, length)` exactly — that exclusivity is what makes worker output
/// slots private and their writes legal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SliceBounds {
    /// Slice id, 0-based.
    pub slice_id: u32,
    /// Half-open index range processed by this slice.
    pub range: Range<usize>,
}

impl SliceBounds {
    /// Number of indices in this slice.
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Whether the slice covers no indices.
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Split `[0, length)` into at most `slices` contiguous near-even ranges.
///
/// The first `length % slices` ranges carry one extra index. A zero length
/// produces no slices at all (no workers are spawned for empty arrays), and
/// more slices than indices collapses to one slice per index.
pub fn partition(length: usize, slices: u32) -> Vec<SliceBounds> {
    if length == 0 || slices == 0 {
        return Vec::new();
    }
    let slices = usize::min(slices as usize, length);
    let base = length / slices;
    let extra = length % slices;

    let mut out = Vec::with_capacity(slices);
    let mut start = 0;
    for slice_id in 0..slices {
        let len = if slice_id < extra { base + 1 } else { base };
        let end = start + len;
        out.push(SliceBounds {
            // Bounded by `slices`, which fits u32 by construction.
            slice_id: u32::try_from(slice_id).unwrap_or(u32::MAX),
            range: start..end,
        });
        start = end;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ranges(length: usize, slices: u32) -> Vec<Range<usize>> {
        partition(length, slices).into_iter().map(|s| s.range).collect()
    }

    #[test]
    fn zero_length_has_no_slices() {
        assert!(partition(0, 8).is_empty());
    }

    #[test]
    fn even_split() {
        assert_eq!(ranges(8, 4), vec![0..2, 2..4, 4..6, 6..8]);
    }

    #[test]
    fn remainder_goes_to_leading_slices() {
        assert_eq!(ranges(10, 4), vec![0..3, 3..6, 6..8, 8..10]);
    }

    #[test]
    fn more_slices_than_indices() {
        assert_eq!(ranges(2, 8), vec![0..1, 1..2]);
    }

    #[test]
    fn slices_cover_exactly_once() {
        for length in [1usize, 7, 64, 255, 256, 1000] {
            for slices in [1u32, 2, 3, 7, 16] {
                let parts = partition(length, slices);
                let mut next = 0;
                for (i, part) in parts.iter().enumerate() {
                    assert_eq!(part.slice_id as usize, i);
                    assert_eq!(part.range.start, next);
                    assert!(!part.is_empty());
                    next = part.range.end;
                }
                assert_eq!(next, length);
            }
        }
    }
}
