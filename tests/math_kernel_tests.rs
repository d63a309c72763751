//! Tests for kernel and potential functions.
//!
//! These tests verify the interaction functions that drive the pruning
//! engine:
//! - Point evaluations at known squared distances
//! - Monotonicity in distance and value-range correctness
//! - Maximum unnormalized values
//! - Normalization constants in low dimensions

use approx::assert_relative_eq;

use dualtree::math::kernel::{EpanechnikovKernel, GaussianKernel, Kernel, PlummerKernel};
use dualtree::primitives::interval::Interval;

// ============================================================================
// Gaussian Kernel
// ============================================================================

/// Gaussian values at characteristic squared distances.
#[test]
fn gaussian_point_values() {
    let k: GaussianKernel<f64> = Kernel::new(1.0);

    assert_relative_eq!(k.eval_unnorm_sq(0.0), 1.0);
    // exp(-dsq / (2 h^2)) with h = 1, dsq = 2.
    assert_relative_eq!(k.eval_unnorm_sq(2.0), (-1.0f64).exp(), max_relative = 1e-12);
    assert_relative_eq!(k.bandwidth_sq(), 1.0);
}

/// Gaussian is non-increasing in squared distance and never exceeds its
/// maximum.
#[test]
fn gaussian_monotone_and_bounded() {
    let k: GaussianKernel<f64> = Kernel::new(0.7);
    let mut prev = k.eval_unnorm_sq(0.0);
    for i in 1..50 {
        let v = k.eval_unnorm_sq(i as f64 * 0.3);
        assert!(v <= prev);
        assert!(v <= k.max_unnorm());
        prev = v;
    }
}

/// The value range over a distance interval is the endpoint image, swapped.
#[test]
fn gaussian_value_range_endpoints() {
    let k: GaussianKernel<f64> = Kernel::new(1.3);
    let dsq = Interval::new(0.5, 4.0);
    let range = k.range_unnorm_sq(&dsq);

    assert_relative_eq!(range.lo, k.eval_unnorm_sq(4.0));
    assert_relative_eq!(range.hi, k.eval_unnorm_sq(0.5));
    assert!(range.lo <= range.hi);
}

/// Gaussian normalization constants: sqrt(2 pi h^2) in 1-D, (2 pi h^2) in
/// 2-D.
#[test]
fn gaussian_norm_constants() {
    let h = 0.8f64;
    let k: GaussianKernel<f64> = Kernel::new(h);
    let two_pi = std::f64::consts::TAU;

    assert_relative_eq!(k.norm_constant(1), (two_pi * h * h).sqrt(), max_relative = 1e-12);
    assert_relative_eq!(k.norm_constant(2), two_pi * h * h, max_relative = 1e-12);
}

// ============================================================================
// Epanechnikov Kernel
// ============================================================================

/// Epanechnikov support boundary and interior values.
#[test]
fn epanechnikov_support() {
    let k: EpanechnikovKernel<f64> = Kernel::new(2.0);

    assert_relative_eq!(k.eval_unnorm_sq(0.0), 1.0);
    assert_relative_eq!(k.eval_unnorm_sq(1.0), 0.75);
    // At and beyond the bandwidth the kernel vanishes.
    assert_eq!(k.eval_unnorm_sq(4.0), 0.0);
    assert_eq!(k.eval_unnorm_sq(100.0), 0.0);
}

/// Epanechnikov normalization constants: 4h/3 in 1-D, pi h^2 / 2 in 2-D.
#[test]
fn epanechnikov_norm_constants() {
    let h = 1.5f64;
    let k: EpanechnikovKernel<f64> = Kernel::new(h);

    assert_relative_eq!(k.norm_constant(1), 4.0 * h / 3.0, max_relative = 1e-12);
    assert_relative_eq!(
        k.norm_constant(2),
        std::f64::consts::PI * h * h / 2.0,
        max_relative = 1e-12
    );
}

/// A value range that straddles the support boundary clamps to zero below.
#[test]
fn epanechnikov_range_across_support() {
    let k: EpanechnikovKernel<f64> = Kernel::new(1.0);
    let range = k.range_unnorm_sq(&Interval::new(0.25, 9.0));

    assert_eq!(range.lo, 0.0);
    assert_relative_eq!(range.hi, 0.75);
}

// ============================================================================
// Plummer Potential
// ============================================================================

/// Plummer values, softened maximum, and trivial normalization.
#[test]
fn plummer_values_and_maximum() {
    let eps = 0.1f64;
    let k: PlummerKernel<f64> = Kernel::new(eps);

    assert_relative_eq!(k.eval_unnorm_sq(0.0), 1.0 / eps, max_relative = 1e-12);
    assert_relative_eq!(k.max_unnorm(), 1.0 / eps);
    assert_relative_eq!(k.eval_unnorm_sq(1.0), 1.0 / (1.0 + eps * eps).sqrt(), max_relative = 1e-12);
    assert_relative_eq!(k.norm_constant(3), 1.0);
}

/// The softened potential is non-increasing in squared distance.
#[test]
fn plummer_monotone() {
    let k: PlummerKernel<f64> = Kernel::new(0.05);
    let mut prev = k.eval_unnorm_sq(0.0);
    for i in 1..40 {
        let v = k.eval_unnorm_sq(i as f64 * 0.5);
        assert!(v < prev);
        prev = v;
    }
}
