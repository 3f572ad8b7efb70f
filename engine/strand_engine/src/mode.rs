//! Build modes for array construction.
//!
//! The mode is a caller-facing knob. It controls only *whether* a parallel
//! attempt is made; the bailout semantics are identical in every mode that
//! attempts one.

/// How the engine chooses between the parallel and sequential paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BuildMode {
    /// Attempt parallel construction when the request is at least the
    /// engine's parallelism threshold; otherwise go straight to the
    /// sequential path.
    #[default]
    Auto,
    /// Always attempt parallel construction, regardless of size. Bailout to
    /// sequential still applies; forcing the attempt does not force the
    /// commit.
    ForcePar,
    /// Never spawn workers; execute sequentially with no guard installed.
    ForceSeq,
}

impl BuildMode {
    /// Whether a request of `length` should attempt a parallel pass.
    #[inline]
    pub fn attempts_parallel(self, length: usize, par_threshold: usize) -> bool {
        match self {
            Self::ForcePar => true,
            Self::ForceSeq => false,
            Self::Auto => length > 0 && length >= par_threshold,
        }
    }
}
