//! # Primitives
//!
//! Default parameters shared by the structures, the stats engine and the
//! simpliciality metrics. Callers override them per call; these are only the
//! values used when nothing is supplied.

/// First identifier handed out by a fresh allocator.
pub const FIRST_AUTO_ID: i64 = 0;

/// Smallest edge size counted by the simpliciality metrics.
///
/// Singleton edges are nodes in simplicial terms, so they are not required as
/// faces by default.
pub const DEFAULT_MIN_SIZE: usize = 2;

/// Smallest simplex size inserted as a face by the closure maintainer.
pub const MIN_FACE_SIZE: usize = 2;

/// Iteration cap for the power iteration behind eigenvector centrality.
pub const MAX_POWER_ITERATIONS: usize = 1000;

/// Convergence tolerance (L1 change between iterations) for power iteration.
pub const POWER_ITERATION_TOLERANCE: f64 = 1e-9;

/// Number of histogram bins used for non-integer data when none is requested.
pub const DEFAULT_HIST_BINS: usize = 10;

/// Widest integer range that gets one unit bin per integer. Wider integer
/// data falls back to [`DEFAULT_HIST_BINS`] equal-width bins.
pub const MAX_UNIT_HIST_BINS: usize = 1000;
