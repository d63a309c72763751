//! The dual-tree recursion.
//!
//! ## Purpose
//!
//! This module walks the query and reference trees simultaneously. For each
//! node pair it asks the pruning oracle first; failing that it either
//! computes a leaf pair exhaustively or recurses into children,
//! nearest-first, splitting the confidence across reference siblings.
//!
//! ## Key concepts
//!
//! * **Exactness flag**: `traverse` returns `true` when the pair's
//!   contribution was resolved without probabilistic approximation. An
//!   exact first sibling lets the second sibling spend the confidence the
//!   first did not use.
//! * **Confidence splitting**: expanding a reference node gives each child
//!   `sqrt(p)`, so the joint confidence of two probabilistic child prunes
//!   is still `p`. Query children are independent queries and inherit `p`
//!   unchanged.
//! * **Lazy propagation**: postponed deltas are pushed to query children
//!   exactly when the query node is expanded, and flushed per point at
//!   leaves.
//!
//! ## Invariants
//!
//! * Every reference contribution reaches each query point exactly once,
//!   either through a prune delta or through a base case.
//! * After expanding a query node, the parent's summary bounds are rebuilt
//!   from its children before returning.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::engine::executor::SummationEngine;
use crate::math::kernel::Kernel;
use crate::tree::bound::RectBound;
use crate::tree::kdtree::KdTree;

/// Order two sibling nodes so the one nearer to `pivot` comes first.
fn order_by_distance<T: Float>(
    pivot: &RectBound<T>,
    tree: &KdTree<T>,
    a: usize,
    b: usize,
) -> (usize, usize) {
    let da = pivot.min_distance_sq(tree.node(a).bound());
    let db = pivot.min_distance_sq(tree.node(b).bound());
    if da <= db {
        (a, b)
    } else {
        (b, a)
    }
}

impl<'a, T: Float, K: Kernel<T>> SummationEngine<'a, T, K> {
    /// Resolve the pair `(qid, rid)` at confidence `probability`.
    ///
    /// Returns `true` when the contribution was resolved exactly
    /// (deterministic prunes and base cases), `false` when any part of it
    /// was approximated probabilistically.
    pub(crate) fn traverse(&mut self, qid: usize, rid: usize, probability: T) -> bool {
        // Deterministic finite-difference prune.
        let (mut candidate, approved) = self.try_deterministic_prune(qid, rid);
        if approved {
            self.qstats[qid].add_prune(
                candidate.dl,
                candidate.de,
                candidate.du,
                candidate.used_error,
                candidate.n_pruned,
            );
            self.counters.finite_difference_prunes += 1;
            return true;
        }

        // Monte Carlo prune, only under relaxed confidence. The candidate
        // keeps the deterministic bound deltas; only the estimate and the
        // committed error come from sampling.
        if probability < T::one() && self.try_monte_carlo_prune(qid, rid, probability, &mut candidate)
        {
            self.qstats[qid].add_prune(
                candidate.dl,
                candidate.de,
                candidate.du,
                candidate.used_error,
                candidate.n_pruned,
            );
            self.counters.monte_carlo_prunes += 1;
            return false;
        }

        let (qt, rt) = (self.qtree, self.rtree);
        let qnode = qt.node(qid);
        let rnode = rt.node(rid);

        if qnode.is_leaf() {
            if rnode.is_leaf() {
                self.base_case(qid, rid);
                self.counters.base_cases += 1;
                return true;
            }

            // Expand the reference node, nearest child first, splitting the
            // confidence across the siblings.
            let (first, second) =
                order_by_distance(qnode.bound(), rt, rnode.left(), rnode.right());
            let p_child = probability.sqrt();
            let first_result = self.traverse(qid, first, p_child);
            let p_second = if first_result {
                p_child * p_child
            } else {
                p_child
            };
            let second_result = self.traverse(qid, second, p_second);
            return first_result && second_result;
        }

        // Expanding the query node: push postponed deltas down first.
        let parent = self.qstats[qid];
        let (ql, qr) = (qnode.left(), qnode.right());
        self.qstats[ql].add_postponed(&parent);
        self.qstats[qr].add_postponed(&parent);
        self.qstats[qid].clear_postponed();

        let result = if rnode.is_leaf() {
            // Expand only the query node; each child is an independent
            // query set and inherits the full confidence.
            let (qfirst, qsecond) = order_by_distance(rnode.bound(), qt, ql, qr);
            let first_result = self.traverse(qfirst, rid, probability);
            let second_result = self.traverse(qsecond, rid, probability);
            first_result && second_result
        } else {
            let (rl, rr) = (rnode.left(), rnode.right());
            let p_child = probability.sqrt();

            let (rfirst, rsecond) = order_by_distance(qt.node(ql).bound(), rt, rl, rr);
            let left_first = self.traverse(ql, rfirst, p_child);
            let p_second = if left_first {
                p_child * p_child
            } else {
                p_child
            };
            let left_second = self.traverse(ql, rsecond, p_second);

            let (rfirst, rsecond) = order_by_distance(qt.node(qr).bound(), rt, rl, rr);
            let right_first = self.traverse(qr, rfirst, p_child);
            let p_second = if right_first {
                p_child * p_child
            } else {
                p_child
            };
            let right_second = self.traverse(qr, rsecond, p_second);

            left_first && left_second && right_first && right_second
        };

        // Rebuild this node's summary bounds from its children.
        let (left_stat, right_stat) = (self.qstats[ql], self.qstats[qr]);
        self.qstats[qid].refine_from_children(&left_stat, &right_stat);
        result
    }

    /// Exhaustive leaf-pair computation.
    ///
    /// Flushes postponed deltas per query point, adds every pairwise
    /// contribution exactly, retracts the optimistic upper-bound allowance
    /// for this reference node, and rebuilds the leaf's summary bounds.
    fn base_case(&mut self, qid: usize, rid: usize) {
        let (qt, rt) = (self.qtree, self.rtree);
        let qnode = qt.node(qid);
        let rnode = rt.node(rid);
        let (qpoints, rpoints) = (qt.points(), rt.points());

        let delta = self.qstats[qid].postponed();
        self.qstats[qid].reset_bounds();
        let rweight = self.rstats[rid].weight_sum;
        let max_unnorm = self.max_unnorm;

        for q in qnode.begin()..qnode.end() {
            self.acc.apply_postponed(&delta, q);
            for r in rnode.begin()..rnode.end() {
                let dsq = qpoints.distance_sq_to(q, rpoints, r);
                let v = self.kernels[r].eval_unnorm_sq(dsq) * self.rweights[r];
                self.acc.add_exact(q, v);
            }
            self.acc.pruned_weight[q] = self.acc.pruned_weight[q] + rweight;
            // Undo the optimistic initialization for this reference node.
            self.acc.upper[q] = self.acc.upper[q] - max_unnorm * rweight;
            self.qstats[qid].refine_with_point(
                self.acc.lower[q],
                self.acc.upper[q],
                self.acc.used_error[q],
                self.acc.pruned_weight[q],
            );
        }
        self.qstats[qid].clear_postponed();
    }
}
