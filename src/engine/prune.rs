//! Pruning oracle.
//!
//! ## Purpose
//!
//! This module decides whether a (query node, reference node) pair can be
//! approximated without recursing further, and with what deltas. Three
//! checks exist:
//!
//! * **Deterministic finite-difference**: bound the kernel value over the
//!   pair's distance range; approve when the midpoint approximation's error
//!   fits the pair's share of the global error budget.
//! * **Sample mean** (Monte Carlo): estimate the pair's contribution from
//!   random point pairs; approve when the confidence half-width fits the
//!   budget.
//! * **Order statistics** (Monte Carlo): bound the kernel value range by
//!   sampled extremes whose coverage probability is precomputed.
//!
//! ## Design notes
//!
//! * A failed deterministic check still yields sound lower/upper deltas
//!   (`dl`, `du`) and the accounted weight; the Monte Carlo checks reuse
//!   those and replace only the estimate and the committed error. A Monte
//!   Carlo prune therefore never weakens the certified bounds.
//! * Budget arithmetic mirrors the deterministic rule: the allowed error is
//!   the remaining budget per unit of unaccounted reference weight, scaled
//!   by this node's weight. A non-finite allowed error (all weight already
//!   accounted) disables pruning for the pair.
//! * The Monte Carlo comparisons are strict inequalities; a zero remaining
//!   budget must never admit a probabilistic prune.

// External dependencies
use num_traits::Float;
use rand::Rng;

// Internal dependencies
use crate::engine::executor::{MonteCarloStrategy, SummationEngine};
use crate::math::confidence::standard_score;
use crate::math::kernel::Kernel;

// ============================================================================
// Prune Delta
// ============================================================================

/// The per-query deltas a prune deposits on the query node.
#[derive(Debug, Clone, Copy)]
pub struct PruneDelta<T> {
    /// Lower-bound increase.
    pub dl: T,
    /// Estimate increase.
    pub de: T,
    /// Upper-bound change (non-positive: it retracts the optimistic
    /// initialization).
    pub du: T,
    /// Error committed by accepting the estimate.
    pub used_error: T,
    /// Reference weight accounted for.
    pub n_pruned: T,
}

// ============================================================================
// Oracle
// ============================================================================

impl<'a, T: Float, K: Kernel<T>> SummationEngine<'a, T, K> {
    /// Remaining error budget per unit of unaccounted reference weight,
    /// given the query node's updated running totals.
    #[inline]
    fn budget_per_weight(&self, new_mass_l: T, new_used_error: T, new_n_pruned: T) -> T {
        ((self.config.relative_error * new_mass_l).max(self.config.absolute_error_floor)
            - new_used_error)
            / (self.rweight_sum - new_n_pruned)
    }

    /// Deterministic finite-difference check.
    ///
    /// Always returns the candidate deltas; the flag says whether the pair
    /// may be pruned outright. On failure the caller may hand the candidate
    /// to a Monte Carlo check, which keeps `dl`, `du`, and `n_pruned`.
    pub(crate) fn try_deterministic_prune(&self, qid: usize, rid: usize) -> (PruneDelta<T>, bool) {
        let qnode = self.qtree.node(qid);
        let rnode = self.rtree.node(rid);
        let qstat = &self.qstats[qid];
        let rstat = &self.rstats[rid];

        let dsq = qnode.bound().distance_sq_range(rnode.bound());
        // Smallest value: narrowest kernel at the farthest distance;
        // largest value: widest kernel at the nearest distance.
        let v_lo = rstat.min_kernel.eval_unnorm_sq(dsq.hi);
        let v_hi = rstat.max_kernel.eval_unnorm_sq(dsq.lo);

        let w = rstat.weight_sum;
        let half = T::from(0.5).unwrap_or_else(T::zero);
        let delta = PruneDelta {
            dl: v_lo * w,
            de: half * (v_lo + v_hi) * w,
            du: (v_hi - self.max_unnorm) * w,
            used_error: half * (v_hi - v_lo) * w,
            n_pruned: w,
        };

        let new_mass_l = qstat.mass_l + qstat.postponed_l + delta.dl;
        let new_used_error = qstat.used_error + qstat.postponed_used_error;
        let new_n_pruned = qstat.n_pruned + qstat.postponed_n_pruned;
        let allowed = self.budget_per_weight(new_mass_l, new_used_error, new_n_pruned) * w;

        (delta, allowed.is_finite() && delta.used_error <= allowed)
    }

    /// Monte Carlo check at confidence `probability`, dispatching on the
    /// configured strategy. On success the candidate's estimate and
    /// committed error are replaced; its bound deltas stay deterministic.
    pub(crate) fn try_monte_carlo_prune(
        &mut self,
        qid: usize,
        rid: usize,
        probability: T,
        candidate: &mut PruneDelta<T>,
    ) -> bool {
        match self.config.strategy {
            MonteCarloStrategy::SampleMean => {
                self.mc_sample_mean(qid, rid, probability, candidate)
            }
            MonteCarloStrategy::OrderStatistics => {
                self.mc_order_statistics(qid, rid, probability, candidate)
            }
        }
    }

    /// Central-limit check on the sample mean of weighted interactions.
    fn mc_sample_mean(
        &mut self,
        qid: usize,
        rid: usize,
        probability: T,
        candidate: &mut PruneDelta<T>,
    ) -> bool {
        let qnode = self.qtree.node(qid);
        let rnode = self.rtree.node(rid);
        let batch = self.config.initial_samples;
        if batch < 2 || qnode.count() * rnode.count() < batch {
            return false;
        }
        let z = match probability.to_f64() {
            Some(p) => T::from(standard_score(p)).unwrap_or_else(T::infinity),
            None => return false,
        };

        let qstat = self.qstats[qid];
        let w = self.rstats[rid].weight_sum;
        let count_f = T::from(rnode.count()).unwrap_or_else(T::one);
        let (qt, rt) = (self.qtree, self.rtree);
        let (qpoints, rpoints) = (qt.points(), rt.points());
        let (qb, qe) = (qnode.begin(), qnode.end());
        let (rb, re) = (rnode.begin(), rnode.end());

        let mut sum = T::zero();
        let mut sum_sq = T::zero();
        let mut total: usize = 0;

        loop {
            for _ in 0..batch {
                let qi = self.rng.gen_range(qb..qe);
                let ri = self.rng.gen_range(rb..re);
                let dsq = qpoints.distance_sq_to(qi, rpoints, ri);
                let v = self.kernels[ri].eval_unnorm_sq(dsq) * self.rweights[ri];
                sum = sum + v;
                sum_sq = sum_sq + v * v;
            }
            total += batch;

            let total_f = T::from(total).unwrap_or_else(T::one);
            let mean = sum / total_f;
            let variance =
                ((sum_sq - total_f * mean * mean) / (total_f - T::one())).max(T::zero());
            let half_width = z * variance.sqrt() * count_f;

            let new_mass_l = qstat.mass_l + qstat.postponed_l + candidate.dl;
            let new_used_error = qstat.used_error + qstat.postponed_used_error;
            let new_n_pruned = qstat.n_pruned + qstat.postponed_n_pruned;
            let allowed = self.budget_per_weight(new_mass_l, new_used_error, new_n_pruned) * w;

            if allowed.is_finite() && half_width < allowed {
                candidate.de = mean * count_f;
                candidate.used_error = half_width;
                return true;
            }
            if total + batch > self.config.max_samples {
                return false;
            }
        }
    }

    /// Order-statistics check: the sampled extreme kernel values stand in
    /// for the true value range at the precomputed coverage probability.
    fn mc_order_statistics(
        &mut self,
        qid: usize,
        rid: usize,
        probability: T,
        candidate: &mut PruneDelta<T>,
    ) -> bool {
        let qnode = self.qtree.node(qid);
        let rnode = self.rtree.node(rid);
        let p = match probability.to_f64() {
            Some(p) => p,
            None => return false,
        };

        // Smallest tabulated sample count reaching the requested coverage.
        let num_samples = self
            .coverage
            .iter()
            .position(|&c| c >= p)
            .map(|i| self.config.sample_multiple * (i + 1));
        let num_samples = match num_samples {
            Some(n) if n <= qnode.count() * rnode.count() => n,
            _ => return false,
        };

        let (qt, rt) = (self.qtree, self.rtree);
        let (qpoints, rpoints) = (qt.points(), rt.points());
        let (qb, qe) = (qnode.begin(), qnode.end());
        let (rb, re) = (rnode.begin(), rnode.end());

        let mut min_value = T::infinity();
        let mut max_value = T::neg_infinity();
        for _ in 0..num_samples {
            let qi = self.rng.gen_range(qb..qe);
            let ri = self.rng.gen_range(rb..re);
            let dsq = qpoints.distance_sq_to(qi, rpoints, ri);
            let value = self.kernels[ri].eval_unnorm_sq(dsq);
            min_value = min_value.min(value);
            max_value = max_value.max(value);
        }

        let qstat = self.qstats[qid];
        let w = self.rstats[rid].weight_sum;
        let half = T::from(0.5).unwrap_or_else(T::zero);

        // The sampled minimum replaces the deterministic lower delta.
        let dl = w * min_value;
        let new_mass_l = qstat.mass_l + qstat.postponed_l + dl;
        let new_used_error = qstat.used_error + qstat.postponed_used_error;
        let new_n_pruned = qstat.n_pruned + qstat.postponed_n_pruned;

        let left_hand_side = half * (max_value - min_value);
        let right_hand_side = self.budget_per_weight(new_mass_l, new_used_error, new_n_pruned);

        if right_hand_side.is_finite() && left_hand_side < right_hand_side {
            candidate.dl = dl;
            candidate.de = half * (min_value + max_value) * w;
            candidate.used_error = half * (max_value - min_value) * w;
            true
        } else {
            false
        }
    }
}
