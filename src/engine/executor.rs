//! Summation engine configuration and orchestration.
//!
//! ## Purpose
//!
//! This module assembles a summation run: it owns the per-reference kernels
//! and weights (in tree order), the two statistic arenas, the per-query
//! accumulators, and the random number generator, and it drives the three
//! phases of a run:
//!
//! 1. **Pre-pass**: bottom-up aggregation of reference weights and extreme
//!    kernels, pessimistic initialization of query bounds.
//! 2. **Traversal**: the dual-tree recursion (see `traversal`).
//! 3. **Post-pass**: top-down flush of postponed deltas, normalization, and
//!    a final bottom-up refinement of the query bounds.
//!
//! ## Design notes
//!
//! * Self-joins pass the same tree as both query and reference; the two
//!   statistic arenas stay separate, so query-side mutation never aliases
//!   reference-side aggregates.
//! * The engine works on unnormalized sums throughout and applies a single
//!   driver-supplied multiplier in the post-pass. Drivers that need
//!   per-reference normalization (variable-bandwidth density estimation)
//!   fold the per-reference constants into the weights instead.
//! * Results are unpermuted into the caller's query order on the way out.

// External dependencies
use num_traits::Float;
use rand::rngs::StdRng;
use rand::SeedableRng;

// Internal dependencies
use crate::engine::accumulator::Accumulators;
use crate::engine::output::{SummationResult, TraversalCounters};
use crate::engine::stat::{BoundStat, ReferenceAggregate};
use crate::math::confidence::coverage_probabilities;
use crate::math::kernel::Kernel;
use crate::tree::kdtree::{KdTree, ROOT};

// ============================================================================
// Monte Carlo Strategy
// ============================================================================

/// Which probabilistic pruning check the traversal may use when the
/// requested confidence is below one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonteCarloStrategy {
    /// Central-limit check on the sample mean of pairwise interactions.
    #[default]
    SampleMean,
    /// Order-statistics check on sampled extreme kernel values.
    ///
    /// Experimental: tighter on heavy-tailed kernel value distributions,
    /// but needs a precomputed coverage table and more samples per check.
    OrderStatistics,
}

// ============================================================================
// Configuration
// ============================================================================

/// Tuning knobs for one summation run.
#[derive(Debug, Clone)]
pub struct SummationConfig<T> {
    /// Relative error tolerance `tau`: each query's committed error stays
    /// within `tau` times its certified lower bound.
    pub relative_error: T,
    /// Confidence that the relative-error guarantee holds. One means every
    /// prune must be deterministic.
    pub probability: T,
    /// Absolute error floor: pruning may always spend at least this much,
    /// which unsticks the traversal while lower bounds are still zero.
    pub absolute_error_floor: T,
    /// Multiplier applied to lower/estimate/upper in the post-pass.
    pub normalization: T,
    /// Sample batch size for the sample-mean Monte Carlo check.
    pub initial_samples: usize,
    /// Sample-count granularity of the order-statistics coverage table.
    pub sample_multiple: usize,
    /// Number of rows in the order-statistics coverage table.
    pub coverage_rounds: usize,
    /// Hard cap on Monte Carlo samples per node pair.
    pub max_samples: usize,
    /// Which probabilistic check to run when `probability < 1`.
    pub strategy: MonteCarloStrategy,
    /// Seed for the sampling RNG; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl<T: Float> Default for SummationConfig<T> {
    fn default() -> Self {
        Self {
            relative_error: T::from(0.1).unwrap_or_else(T::zero),
            probability: T::one(),
            absolute_error_floor: T::zero(),
            normalization: T::one(),
            initial_samples: 25,
            sample_multiple: 25,
            coverage_rounds: 20,
            max_samples: 10_000,
            strategy: MonteCarloStrategy::default(),
            seed: None,
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// One dual-tree summation in flight.
///
/// Construction runs the pre-pass; `run` performs the traversal and the
/// post-pass and returns the finished result.
pub struct SummationEngine<'a, T, K> {
    pub(crate) qtree: &'a KdTree<T>,
    pub(crate) rtree: &'a KdTree<T>,
    /// Per-reference kernels, tree order.
    pub(crate) kernels: Vec<K>,
    /// Per-reference weights, tree order.
    pub(crate) rweights: Vec<T>,
    /// Total reference weight.
    pub(crate) rweight_sum: T,
    /// Largest unnormalized kernel value any reference can contribute.
    pub(crate) max_unnorm: T,
    pub(crate) config: SummationConfig<T>,
    /// Query-side bound statistics, indexed by query node id.
    pub(crate) qstats: Vec<BoundStat<T>>,
    /// Reference-side aggregates, indexed by reference node id.
    pub(crate) rstats: Vec<ReferenceAggregate<T, K>>,
    pub(crate) acc: Accumulators<T>,
    pub(crate) counters: TraversalCounters,
    pub(crate) rng: StdRng,
    /// Order-statistics coverage table; empty unless that strategy is
    /// active with a relaxed confidence.
    pub(crate) coverage: Vec<f64>,
}

impl<'a, T: Float, K: Kernel<T>> SummationEngine<'a, T, K> {
    /// Set up a run.
    ///
    /// `kernels` and `rweights` are per reference point in the caller's
    /// order; they are permuted into tree order here. Inputs are assumed
    /// validated (non-empty, finite, positive weights).
    pub fn new(
        qtree: &'a KdTree<T>,
        rtree: &'a KdTree<T>,
        kernels: &[K],
        rweights: &[T],
        config: SummationConfig<T>,
    ) -> Self {
        let old_from_new = rtree.old_from_new();
        let kernels: Vec<K> = old_from_new.iter().map(|&o| kernels[o].clone()).collect();
        let rweights: Vec<T> = old_from_new.iter().map(|&o| rweights[o]).collect();

        let rweight_sum = rweights.iter().fold(T::zero(), |a, &w| a + w);
        let max_unnorm = kernels
            .iter()
            .map(|k| k.max_unnorm())
            .fold(T::zero(), T::max);
        let upper_init = rweight_sum * max_unnorm;

        let mut rstats = vec![
            ReferenceAggregate {
                weight_sum: T::zero(),
                min_kernel: kernels[0].clone(),
                max_kernel: kernels[0].clone(),
            };
            rtree.num_nodes()
        ];
        build_reference_stats(rtree, &kernels, &rweights, &mut rstats, ROOT);

        let coverage = if config.strategy == MonteCarloStrategy::OrderStatistics
            && config.probability < T::one()
        {
            let population = rtree.points().len() as f64;
            let p = config.probability.to_f64().unwrap_or(1.0);
            let cut = ((1.0 - p) * population).ceil().max(1.0);
            coverage_probabilities(config.sample_multiple, config.coverage_rounds, population, cut)
        } else {
            Vec::new()
        };

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let qstats = vec![BoundStat::new(upper_init); qtree.num_nodes()];
        let acc = Accumulators::new(qtree.points().len(), upper_init);

        Self {
            qtree,
            rtree,
            kernels,
            rweights,
            rweight_sum,
            max_unnorm,
            config,
            qstats,
            rstats,
            acc,
            counters: TraversalCounters::default(),
            rng,
            coverage,
        }
    }

    /// Traverse, finalize, and hand back results in the caller's query
    /// order.
    pub fn run(mut self) -> SummationResult<T> {
        let probability = self.config.probability;
        self.traverse(ROOT, ROOT, probability);
        self.post_process(ROOT);

        let qt = self.qtree;
        SummationResult {
            lower: qt.unpermute(&self.acc.lower, T::zero()),
            estimate: qt.unpermute(&self.acc.estimate, T::zero()),
            upper: qt.unpermute(&self.acc.upper, T::zero()),
            used_error: qt.unpermute(&self.acc.used_error, T::zero()),
            pruned_weight: qt.unpermute(&self.acc.pruned_weight, T::zero()),
            counters: self.counters,
        }
    }

    /// Top-down finalization: flush postponed deltas to the leaves, apply
    /// the normalization multiplier, and rebuild the query bounds tightly.
    fn post_process(&mut self, qid: usize) {
        let qt = self.qtree;
        let node = qt.node(qid);

        if node.is_leaf() {
            let delta = self.qstats[qid].postponed();
            self.qstats[qid].reset_bounds();
            let mult = self.config.normalization;
            for q in node.begin()..node.end() {
                self.acc.apply_postponed(&delta, q);
                self.acc.lower[q] = self.acc.lower[q] * mult;
                self.acc.estimate[q] = self.acc.estimate[q] * mult;
                self.acc.upper[q] = self.acc.upper[q] * mult;
                self.qstats[qid].refine_with_point(
                    self.acc.lower[q],
                    self.acc.upper[q],
                    self.acc.used_error[q],
                    self.acc.pruned_weight[q],
                );
            }
            self.qstats[qid].clear_postponed();
        } else {
            let (l, r) = (node.left(), node.right());
            let parent = self.qstats[qid];
            self.qstats[l].add_postponed(&parent);
            self.qstats[r].add_postponed(&parent);
            self.qstats[qid].clear_postponed();

            self.post_process(l);
            self.post_process(r);

            let (ls, rs) = (self.qstats[l], self.qstats[r]);
            self.qstats[qid].refine_from_children(&ls, &rs);
        }
    }
}

/// Bottom-up pre-pass over the reference tree: weight sums and extreme
/// kernels per node.
fn build_reference_stats<T: Float, K: Kernel<T>>(
    tree: &KdTree<T>,
    kernels: &[K],
    weights: &[T],
    stats: &mut [ReferenceAggregate<T, K>],
    id: usize,
) {
    let node = tree.node(id);
    if node.is_leaf() {
        stats[id] = ReferenceAggregate::from_leaf(kernels, weights, node.begin(), node.end());
    } else {
        let (l, r) = (node.left(), node.right());
        build_reference_stats(tree, kernels, weights, stats, l);
        build_reference_stats(tree, kernels, weights, stats, r);
        let combined = ReferenceAggregate::from_children(&stats[l], &stats[r]);
        stats[id] = combined;
    }
}
