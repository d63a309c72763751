//! N-body potential summation driver.
//!
//! ## Purpose
//!
//! This module computes, for every particle, the Plummer-softened potential
//! `phi(q) = sum_r m_r / sqrt(||q - r||^2 + eps^2)` over all particles,
//! through the same bounded summation engine the density estimators use.
//! The softened potential is monotone in distance and bounded by `1/eps`,
//! which is all the pruning oracle needs.
//!
//! ## Design notes
//!
//! * Masses play the role of reference weights; potentials are reported
//!   unnormalized (the multiplier is one).
//! * The self-join includes each particle's own contribution `m_q / eps`.
//!   Callers who want the classic external potential subtract it, which is
//!   exact and cheap.
//!
//! ## Invariants
//!
//! * `lower <= phi <= upper` per particle, with the self-term included on
//!   both sides.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::engine::executor::{SummationConfig, SummationEngine};
use crate::engine::output::SummationResult;
use crate::engine::validator::Validator;
use crate::math::kernel::{Kernel, PlummerKernel};
use crate::primitives::errors::DualTreeError;
use crate::primitives::points::PointSet;
use crate::tree::kdtree::KdTree;

// ============================================================================
// Driver
// ============================================================================

/// Potential of every particle due to all particles (self included).
///
/// `positions` is flat row-major; `masses` defaults to uniform unit mass.
pub fn run_potentials<T: Float>(
    positions: &[T],
    dim: usize,
    masses: Option<&[T]>,
    softening: T,
    leaf_size: usize,
    config: SummationConfig<T>,
) -> Result<SummationResult<T>, DualTreeError> {
    Validator::validate_points(positions, dim)?;
    Validator::validate_softening(softening)?;
    Validator::validate_leaf_size(leaf_size)?;

    let n = positions.len() / dim;
    let masses = match masses {
        Some(m) => {
            Validator::validate_parallel_len(n, m.len())?;
            Validator::validate_weights(m)?;
            m.to_vec()
        }
        None => vec![T::one(); n],
    };

    let kernels = vec![PlummerKernel::new(softening); n];
    let tree = KdTree::build(PointSet::from_flat(positions, dim), leaf_size);
    let engine = SummationEngine::new(&tree, &tree, &kernels, &masses, config);
    Ok(engine.run())
}
