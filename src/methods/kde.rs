//! Kernel density estimation drivers.
//!
//! ## Purpose
//!
//! This module turns raw coordinate arrays into density estimates: it
//! validates inputs, builds the kd-trees, sets up per-reference kernels and
//! weights, chooses the normalization multiplier, and hands everything to
//! the summation engine.
//!
//! ## Design notes
//!
//! * **Fixed bandwidth**: every reference shares one kernel; the estimate
//!   is normalized by `1 / (c_K(h, d) * total_weight)` where `c_K` is the
//!   kernel's normalization constant.
//! * **Variable bandwidth**: each reference carries its own kernel. The
//!   per-reference constants are folded into the weights
//!   (`w' = w / c_K(h_r, d)`), so the engine still applies a single
//!   multiplier `1 / total_weight` at the end.
//! * **Self-join**: estimating on the data itself builds one tree and
//!   passes it as both sides; each point's own contribution is included,
//!   as is conventional for density estimation.
//!
//! ## Invariants
//!
//! * Returned vectors are in the caller's point order.
//! * `lower <= estimate <= upper` per query point.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::engine::executor::{SummationConfig, SummationEngine};
use crate::engine::output::SummationResult;
use crate::engine::validator::Validator;
use crate::math::kernel::Kernel;
use crate::primitives::errors::DualTreeError;
use crate::primitives::points::PointSet;
use crate::tree::kdtree::KdTree;

// ============================================================================
// Problem Description
// ============================================================================

/// One density-estimation problem: a reference set, an optional distinct
/// query set (`None` means a self-join), and optional reference weights.
pub struct KdeProblem<'a, T> {
    /// Flat row-major query coordinates, or `None` to query the references
    /// against themselves.
    pub queries: Option<&'a [T]>,
    /// Flat row-major reference coordinates.
    pub references: &'a [T],
    /// Shared dimensionality of both sets.
    pub dim: usize,
    /// Per-reference weights; `None` means uniform weight one.
    pub weights: Option<&'a [T]>,
}

impl<'a, T: Float> KdeProblem<'a, T> {
    /// Validate shapes and values; returns the reference count.
    fn validate(&self) -> Result<usize, DualTreeError> {
        Validator::validate_points(self.references, self.dim)?;
        if let Some(q) = self.queries {
            Validator::validate_points(q, self.dim)?;
        }
        let n_ref = self.references.len() / self.dim;
        if let Some(w) = self.weights {
            Validator::validate_parallel_len(n_ref, w.len())?;
            Validator::validate_weights(w)?;
        }
        Ok(n_ref)
    }

    /// Materialize the weight vector, defaulting to uniform ones.
    fn weight_vec(&self, n_ref: usize) -> Vec<T> {
        match self.weights {
            Some(w) => w.to_vec(),
            None => vec![T::one(); n_ref],
        }
    }
}

// ============================================================================
// Drivers
// ============================================================================

/// Fixed-bandwidth density estimation.
pub fn run_fixed<T: Float, K: Kernel<T>>(
    problem: &KdeProblem<'_, T>,
    bandwidth: T,
    leaf_size: usize,
    mut config: SummationConfig<T>,
) -> Result<SummationResult<T>, DualTreeError> {
    let n_ref = problem.validate()?;
    Validator::validate_bandwidth(bandwidth)?;

    let kernel = K::new(bandwidth);
    let weights = problem.weight_vec(n_ref);
    let total_weight = weights.iter().fold(T::zero(), |a, &w| a + w);
    config.normalization = (kernel.norm_constant(problem.dim) * total_weight).recip();

    let kernels = vec![kernel; n_ref];
    run_summation(problem, kernels, weights, leaf_size, config)
}

/// Variable-bandwidth density estimation: one bandwidth per reference.
pub fn run_variable<T: Float, K: Kernel<T>>(
    problem: &KdeProblem<'_, T>,
    bandwidths: &[T],
    leaf_size: usize,
    mut config: SummationConfig<T>,
) -> Result<SummationResult<T>, DualTreeError> {
    let n_ref = problem.validate()?;
    Validator::validate_parallel_len(n_ref, bandwidths.len())?;
    Validator::validate_bandwidths(bandwidths)?;

    let kernels: Vec<K> = bandwidths.iter().map(|&h| K::new(h)).collect();
    let raw_weights = problem.weight_vec(n_ref);
    let total_weight = raw_weights.iter().fold(T::zero(), |a, &w| a + w);

    // Fold each reference's normalization constant into its weight so the
    // engine only needs one global multiplier.
    let weights: Vec<T> = raw_weights
        .iter()
        .zip(kernels.iter())
        .map(|(&w, k)| w / k.norm_constant(problem.dim))
        .collect();
    config.normalization = total_weight.recip();

    run_summation(problem, kernels, weights, leaf_size, config)
}

/// Build the trees and run the engine.
fn run_summation<T: Float, K: Kernel<T>>(
    problem: &KdeProblem<'_, T>,
    kernels: Vec<K>,
    weights: Vec<T>,
    leaf_size: usize,
    config: SummationConfig<T>,
) -> Result<SummationResult<T>, DualTreeError> {
    Validator::validate_leaf_size(leaf_size)?;

    let rset = PointSet::from_flat(problem.references, problem.dim);
    let rtree = KdTree::build(rset, leaf_size);

    match problem.queries {
        None => {
            let engine = SummationEngine::new(&rtree, &rtree, &kernels, &weights, config);
            Ok(engine.run())
        }
        Some(q) => {
            let qset = PointSet::from_flat(q, problem.dim);
            let qtree = KdTree::build(qset, leaf_size);
            let engine = SummationEngine::new(&qtree, &rtree, &kernels, &weights, config);
            Ok(engine.run())
        }
    }
}
