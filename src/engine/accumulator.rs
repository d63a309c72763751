//! Per-query accumulators.
//!
//! ## Purpose
//!
//! This module holds the per-query running state of a summation: the lower
//! bound, estimate, and upper bound on each query point's sum, the error
//! already committed on its behalf, and the reference weight accounted for.
//! All vectors are in tree order until the executor unpermutes them.
//!
//! ## Invariants
//!
//! * For every query point at every moment of the traversal:
//!   `lower[q] <= true sum <= upper[q]`.
//! * After the post-pass, `pruned_weight[q]` equals the total reference
//!   weight exactly (every reference was either pruned or computed).

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::engine::stat::PostponedDelta;

// ============================================================================
// Accumulators
// ============================================================================

/// Tree-ordered per-query running state.
#[derive(Debug, Clone)]
pub struct Accumulators<T> {
    pub lower: Vec<T>,
    pub estimate: Vec<T>,
    pub upper: Vec<T>,
    pub used_error: Vec<T>,
    pub pruned_weight: Vec<T>,
}

impl<T: Float> Accumulators<T> {
    /// Fresh accumulators for `n` query points.
    ///
    /// Lower bounds start at zero (kernels are non-negative); upper bounds
    /// start at `upper_init`, the total reference weight times the kernel
    /// maximum.
    pub fn new(n: usize, upper_init: T) -> Self {
        Self {
            lower: vec![T::zero(); n],
            estimate: vec![T::zero(); n],
            upper: vec![upper_init; n],
            used_error: vec![T::zero(); n],
            pruned_weight: vec![T::zero(); n],
        }
    }

    /// Flush a postponed delta into point `q`.
    #[inline]
    pub fn apply_postponed(&mut self, delta: &PostponedDelta<T>, q: usize) {
        self.lower[q] = self.lower[q] + delta.lower;
        self.estimate[q] = self.estimate[q] + delta.estimate;
        self.upper[q] = self.upper[q] + delta.upper;
        self.used_error[q] = self.used_error[q] + delta.used_error;
        self.pruned_weight[q] = self.pruned_weight[q] + delta.n_pruned;
    }

    /// Add an exactly computed contribution to point `q`: all three bounds
    /// move together and no error is spent.
    #[inline]
    pub fn add_exact(&mut self, q: usize, value: T) {
        self.lower[q] = self.lower[q] + value;
        self.estimate[q] = self.estimate[q] + value;
        self.upper[q] = self.upper[q] + value;
    }
}
