//! Kernel and potential functions for dual-tree summation.
//!
//! ## Purpose
//!
//! This module defines the capability interface every interaction function
//! must satisfy to drive the pruning engine, plus the three concrete
//! functions the crate ships: the Gaussian and Epanechnikov density kernels
//! and the Plummer-softened potential.
//!
//! ## Design notes
//!
//! * **Squared distances**: All evaluation is on squared Euclidean distance,
//!   so bounding-box distance ranges feed the kernel without square roots.
//! * **Monotonicity**: Every kernel is non-increasing in distance. The
//!   engine's bound computation relies on this: the value range over a
//!   distance range `[lo, hi]` is `[K(hi), K(lo)]`.
//! * **Unnormalized values**: Kernels evaluate unnormalized; drivers divide
//!   by `norm_constant` once at the end (post-pass).
//!
//! ## Key concepts
//!
//! * **Value range**: interval image of a squared-distance interval, used by
//!   the deterministic pruning rule.
//! * **Maximum unnormalized value**: the engine's optimistic initial upper
//!   bound assumes every reference contributes this much.
//!
//! ## Invariants
//!
//! * `eval_unnorm_sq(d) <= max_unnorm()` for every `d >= 0`.
//! * `range_unnorm_sq` of a valid interval is a valid (lo <= hi) interval.
//!
//! ## Non-goals
//!
//! * This module does not select bandwidths.
//! * This module does not implement asymmetric or anisotropic kernels.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::interval::Interval;

// ============================================================================
// Kernel Capability Trait
// ============================================================================

/// Capability interface for interaction functions.
///
/// Any type implementing this trait can drive the summation engine: the
/// traversal only ever asks for point evaluations on squared distances,
/// value ranges over squared-distance intervals, the maximum unnormalized
/// value, and the final normalization constant.
pub trait Kernel<T: Float>: Clone {
    /// Construct from a scale parameter (bandwidth or softening length).
    fn new(scale: T) -> Self;

    /// Squared scale parameter.
    fn bandwidth_sq(&self) -> T;

    /// Unnormalized value at squared distance `dsq`.
    fn eval_unnorm_sq(&self, dsq: T) -> T;

    /// Unnormalized value range over a squared-distance interval.
    ///
    /// Kernels are non-increasing in distance, so the image of `[lo, hi]`
    /// is `[eval(hi), eval(lo)]`.
    #[inline]
    fn range_unnorm_sq(&self, dsq: &Interval<T>) -> Interval<T> {
        Interval::new(self.eval_unnorm_sq(dsq.hi), self.eval_unnorm_sq(dsq.lo))
    }

    /// Maximum unnormalized value, attained at zero distance.
    #[inline]
    fn max_unnorm(&self) -> T {
        T::one()
    }

    /// Normalization constant: divide accumulated sums by this.
    fn norm_constant(&self, dims: usize) -> T;
}

// ============================================================================
// Gaussian Kernel
// ============================================================================

/// Gaussian kernel: `K(d) = exp(-d^2 / (2 h^2))`, unbounded support.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianKernel<T> {
    bandwidth_sq: T,
    neg_inv_bandwidth_2sq: T,
}

impl<T: Float> Kernel<T> for GaussianKernel<T> {
    fn new(bandwidth: T) -> Self {
        let two = T::one() + T::one();
        let bandwidth_sq = bandwidth * bandwidth;
        Self {
            bandwidth_sq,
            neg_inv_bandwidth_2sq: -(two * bandwidth_sq).recip(),
        }
    }

    #[inline]
    fn bandwidth_sq(&self) -> T {
        self.bandwidth_sq
    }

    #[inline]
    fn eval_unnorm_sq(&self, dsq: T) -> T {
        (dsq * self.neg_inv_bandwidth_2sq).exp()
    }

    /// `(2 pi h^2)^(d/2)`.
    fn norm_constant(&self, dims: usize) -> T {
        let two_pi = T::from(std::f64::consts::TAU).unwrap_or_else(T::one);
        let half = T::from(0.5).unwrap_or_else(T::one);
        (two_pi * self.bandwidth_sq).powf(T::from(dims).unwrap_or_else(T::one) * half)
    }
}

// ============================================================================
// Epanechnikov Kernel
// ============================================================================

/// Epanechnikov kernel: `K(d) = 1 - d^2 / h^2` inside the bandwidth, zero
/// outside. Compact support makes distant node pairs exactly prunable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpanechnikovKernel<T> {
    bandwidth_sq: T,
    inv_bandwidth_sq: T,
}

impl<T: Float> Kernel<T> for EpanechnikovKernel<T> {
    fn new(bandwidth: T) -> Self {
        let bandwidth_sq = bandwidth * bandwidth;
        Self {
            bandwidth_sq,
            inv_bandwidth_sq: bandwidth_sq.recip(),
        }
    }

    #[inline]
    fn bandwidth_sq(&self) -> T {
        self.bandwidth_sq
    }

    #[inline]
    fn eval_unnorm_sq(&self, dsq: T) -> T {
        if dsq < self.bandwidth_sq {
            T::one() - dsq * self.inv_bandwidth_sq
        } else {
            T::zero()
        }
    }

    /// `2 V_d(h) / (d + 2)` where `V_d(h)` is the volume of the d-ball.
    fn norm_constant(&self, dims: usize) -> T {
        let two = T::one() + T::one();
        let h = self.bandwidth_sq.sqrt();
        two * ball_volume(h, dims) / (T::from(dims).unwrap_or_else(T::one) + two)
    }
}

/// Volume of the d-dimensional ball of radius `r`.
fn ball_volume<T: Float>(r: T, dims: usize) -> T {
    let pi = T::from(std::f64::consts::PI).unwrap_or_else(T::one);
    let n = dims / 2;
    if dims % 2 == 0 {
        (r * pi.sqrt()).powi(dims as i32) / factorial::<T>(n)
    } else {
        let two = T::one() + T::one();
        (two * r).powi(dims as i32) * pi.powi(n as i32) * factorial::<T>(n)
            / factorial::<T>(dims)
    }
}

fn factorial<T: Float>(n: usize) -> T {
    let mut acc = T::one();
    for i in 2..=n {
        acc = acc * T::from(i).unwrap_or_else(T::one);
    }
    acc
}

// ============================================================================
// Plummer Potential
// ============================================================================

/// Plummer-softened point-mass potential: `phi(d) = (d^2 + eps^2)^(-1/2)`.
///
/// The softening length `eps` regularizes the Coulomb singularity at zero
/// separation, bounding the unnormalized value by `1/eps`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlummerKernel<T> {
    softening_sq: T,
    inv_softening: T,
}

impl<T: Float> Kernel<T> for PlummerKernel<T> {
    fn new(softening: T) -> Self {
        Self {
            softening_sq: softening * softening,
            inv_softening: softening.recip(),
        }
    }

    #[inline]
    fn bandwidth_sq(&self) -> T {
        self.softening_sq
    }

    #[inline]
    fn eval_unnorm_sq(&self, dsq: T) -> T {
        (dsq + self.softening_sq).sqrt().recip()
    }

    #[inline]
    fn max_unnorm(&self) -> T {
        self.inv_softening
    }

    /// Potentials are reported unnormalized.
    #[inline]
    fn norm_constant(&self, _dims: usize) -> T {
        T::one()
    }
}
