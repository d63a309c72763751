//! Summation results and traversal counters.
//!
//! ## Purpose
//!
//! This module defines what a summation run hands back to the caller: the
//! per-query lower bound, estimate, and upper bound (in the caller's point
//! order), the per-query error actually committed, the reference weight
//! accounted for per query, and counters describing how the traversal spent
//! its time.

// External dependencies
use num_traits::Float;

// Standard library dependencies
use std::fmt;

// ============================================================================
// Traversal Counters
// ============================================================================

/// How a traversal resolved its node pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalCounters {
    /// Node pairs resolved by the deterministic finite-difference prune.
    pub finite_difference_prunes: u64,
    /// Node pairs resolved by a Monte Carlo prune.
    pub monte_carlo_prunes: u64,
    /// Leaf pairs resolved by exhaustive computation.
    pub base_cases: u64,
}

impl TraversalCounters {
    /// Total node pairs resolved without recursing further.
    pub fn total_resolved(&self) -> u64 {
        self.finite_difference_prunes + self.monte_carlo_prunes + self.base_cases
    }
}

impl fmt::Display for TraversalCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "finite-difference prunes: {}, monte-carlo prunes: {}, base cases: {}",
            self.finite_difference_prunes, self.monte_carlo_prunes, self.base_cases
        )
    }
}

// ============================================================================
// Summation Result
// ============================================================================

/// Result of one dual-tree summation, in the caller's query order.
#[derive(Debug, Clone)]
pub struct SummationResult<T> {
    /// Certified lower bound per query point.
    pub lower: Vec<T>,
    /// Point estimate per query point.
    pub estimate: Vec<T>,
    /// Certified upper bound per query point.
    pub upper: Vec<T>,
    /// Error committed per query point (unnormalized).
    pub used_error: Vec<T>,
    /// Reference weight accounted for per query point (unnormalized).
    pub pruned_weight: Vec<T>,
    /// How the traversal resolved its node pairs.
    pub counters: TraversalCounters,
}

impl<T: Float> SummationResult<T> {
    /// Number of query points.
    pub fn len(&self) -> usize {
        self.estimate.len()
    }

    /// Whether the result is empty.
    pub fn is_empty(&self) -> bool {
        self.estimate.is_empty()
    }

    /// Largest upper-minus-lower gap across query points.
    pub fn max_bound_width(&self) -> T {
        self.lower
            .iter()
            .zip(self.upper.iter())
            .map(|(&l, &u)| u - l)
            .fold(T::zero(), T::max)
    }
}

impl<T: Float + fmt::Display> fmt::Display for SummationResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summation over {} query points", self.len())?;
        writeln!(f, "  max bound width: {}", self.max_bound_width())?;
        writeln!(f, "  {}", self.counters)
    }
}
