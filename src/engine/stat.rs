//! Per-node statistics for the summation traversal.
//!
//! ## Purpose
//!
//! Every tree node carries two kinds of algorithm state, split by role:
//!
//! * `BoundStat` (query side): running lower/upper mass bounds, the error
//!   already spent on this subtree, the reference weight already accounted
//!   for, and the postponed deltas an ancestor prune has deposited but not
//!   yet pushed to descendants.
//! * `ReferenceAggregate` (reference side): total point weight under the
//!   node and the extreme kernels among its points, which bound the value
//!   any point of the node can contribute.
//!
//! ## Design notes
//!
//! * Statistics live in arenas parallel to the node arena, indexed by node
//!   id. Self-joins share one tree but still get two arenas, so query-side
//!   mutation never aliases reference-side reads.
//! * Postponed deltas implement lazy propagation: a prune touches one node
//!   instead of every query point below it. Deltas flow down at expansion
//!   time and are flushed into per-point accumulators at leaves.
//!
//! ## Invariants
//!
//! * After `refine`, a parent's `mass_l` never exceeds either child's
//!   `mass_l + postponed_l`, and symmetrically for `mass_u`.
//! * `clear_postponed` is called exactly once per downward push; deltas are
//!   never double-counted.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::math::kernel::Kernel;

// ============================================================================
// Query-Side Bound Statistic
// ============================================================================

/// Bound bookkeeping for one query node.
#[derive(Debug, Clone, Copy)]
pub struct BoundStat<T> {
    /// Lower bound on the summation for every query point in the node.
    pub mass_l: T,
    /// Upper bound on the summation for every query point in the node.
    pub mass_u: T,
    /// Error already committed for every query point in the node.
    pub used_error: T,
    /// Reference weight already fully accounted for (pruned or computed).
    pub n_pruned: T,

    /// Postponed lower-bound delta, not yet pushed to descendants.
    pub postponed_l: T,
    /// Postponed estimate delta.
    pub postponed_e: T,
    /// Postponed upper-bound delta.
    pub postponed_u: T,
    /// Postponed used-error delta.
    pub postponed_used_error: T,
    /// Postponed accounted-weight delta.
    pub postponed_n_pruned: T,
}

/// Snapshot of the postponed deltas, taken before a leaf flush so the
/// per-point loop can run against a mutable accumulator.
#[derive(Debug, Clone, Copy)]
pub struct PostponedDelta<T> {
    pub lower: T,
    pub estimate: T,
    pub upper: T,
    pub used_error: T,
    pub n_pruned: T,
}

impl<T: Float> BoundStat<T> {
    /// A fresh statistic: pessimistic bounds, nothing postponed.
    ///
    /// `upper_init` is the optimistic total contribution (total reference
    /// weight times the kernel maximum).
    pub fn new(upper_init: T) -> Self {
        Self {
            mass_l: T::zero(),
            mass_u: upper_init,
            used_error: T::zero(),
            n_pruned: T::zero(),
            postponed_l: T::zero(),
            postponed_e: T::zero(),
            postponed_u: T::zero(),
            postponed_used_error: T::zero(),
            postponed_n_pruned: T::zero(),
        }
    }

    /// Reset the summary bounds to refinement-neutral extremes so they can
    /// be rebuilt by min/max over per-point values. Postponed deltas are
    /// untouched.
    pub fn reset_bounds(&mut self) {
        self.mass_l = T::infinity();
        self.mass_u = T::neg_infinity();
        self.used_error = T::zero();
        self.n_pruned = T::infinity();
    }

    /// Accumulate another node's postponed deltas into this node's.
    pub fn add_postponed(&mut self, other: &Self) {
        self.postponed_l = self.postponed_l + other.postponed_l;
        self.postponed_e = self.postponed_e + other.postponed_e;
        self.postponed_u = self.postponed_u + other.postponed_u;
        self.postponed_used_error = self.postponed_used_error + other.postponed_used_error;
        self.postponed_n_pruned = self.postponed_n_pruned + other.postponed_n_pruned;
    }

    /// Deposit a prune's deltas onto this node.
    pub fn add_prune(&mut self, lower: T, estimate: T, upper: T, used_error: T, n_pruned: T) {
        self.postponed_l = self.postponed_l + lower;
        self.postponed_e = self.postponed_e + estimate;
        self.postponed_u = self.postponed_u + upper;
        self.postponed_used_error = self.postponed_used_error + used_error;
        self.postponed_n_pruned = self.postponed_n_pruned + n_pruned;
    }

    /// Zero the postponed deltas after they have been pushed down.
    pub fn clear_postponed(&mut self) {
        self.postponed_l = T::zero();
        self.postponed_e = T::zero();
        self.postponed_u = T::zero();
        self.postponed_used_error = T::zero();
        self.postponed_n_pruned = T::zero();
    }

    /// Copy out the postponed deltas for a leaf flush.
    pub fn postponed(&self) -> PostponedDelta<T> {
        PostponedDelta {
            lower: self.postponed_l,
            estimate: self.postponed_e,
            upper: self.postponed_u,
            used_error: self.postponed_used_error,
            n_pruned: self.postponed_n_pruned,
        }
    }

    /// Recompute the summary bounds as the tightest values valid for every
    /// point in the node, given the two children. Each child's undelivered
    /// postponed deltas count toward its effective bounds.
    pub fn refine_from_children(&mut self, left: &Self, right: &Self) {
        self.mass_l = (left.mass_l + left.postponed_l).min(right.mass_l + right.postponed_l);
        self.mass_u = (left.mass_u + left.postponed_u).max(right.mass_u + right.postponed_u);
        self.used_error = (left.used_error + left.postponed_used_error)
            .max(right.used_error + right.postponed_used_error);
        self.n_pruned = (left.n_pruned + left.postponed_n_pruned)
            .min(right.n_pruned + right.postponed_n_pruned);
    }

    /// Tighten the summary bounds with one point's finalized values.
    pub fn refine_with_point(&mut self, lower: T, upper: T, used_error: T, n_pruned: T) {
        self.mass_l = self.mass_l.min(lower);
        self.mass_u = self.mass_u.max(upper);
        self.used_error = self.used_error.max(used_error);
        self.n_pruned = self.n_pruned.min(n_pruned);
    }
}

// ============================================================================
// Reference-Side Aggregate
// ============================================================================

/// Static aggregates over one reference node, computed bottom-up once.
#[derive(Debug, Clone)]
pub struct ReferenceAggregate<T, K> {
    /// Sum of the weights of the node's points.
    pub weight_sum: T,
    /// Kernel with the smallest scale among the node's points.
    pub min_kernel: K,
    /// Kernel with the largest scale among the node's points.
    pub max_kernel: K,
}

impl<T: Float, K: Kernel<T>> ReferenceAggregate<T, K> {
    /// Aggregate a leaf's point range.
    ///
    /// `kernels` and `weights` are in tree order; the range must be
    /// non-empty.
    pub fn from_leaf(kernels: &[K], weights: &[T], begin: usize, end: usize) -> Self {
        let mut weight_sum = T::zero();
        let mut min_kernel = kernels[begin].clone();
        let mut max_kernel = kernels[begin].clone();
        for i in begin..end {
            weight_sum = weight_sum + weights[i];
            if kernels[i].bandwidth_sq() < min_kernel.bandwidth_sq() {
                min_kernel = kernels[i].clone();
            }
            if kernels[i].bandwidth_sq() > max_kernel.bandwidth_sq() {
                max_kernel = kernels[i].clone();
            }
        }
        Self {
            weight_sum,
            min_kernel,
            max_kernel,
        }
    }

    /// Combine two children's aggregates.
    pub fn from_children(left: &Self, right: &Self) -> Self {
        let min_kernel = if left.min_kernel.bandwidth_sq() <= right.min_kernel.bandwidth_sq() {
            left.min_kernel.clone()
        } else {
            right.min_kernel.clone()
        };
        let max_kernel = if left.max_kernel.bandwidth_sq() >= right.max_kernel.bandwidth_sq() {
            left.max_kernel.clone()
        } else {
            right.max_kernel.clone()
        };
        Self {
            weight_sum: left.weight_sum + right.weight_sum,
            min_kernel,
            max_kernel,
        }
    }
}
