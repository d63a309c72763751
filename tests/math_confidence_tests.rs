//! Tests for the statistical confidence machinery.
//!
//! These tests verify:
//! - Inverse standard-normal CDF values and symmetry
//! - Two-sided z-scores
//! - Order-statistics coverage probabilities

use approx::assert_relative_eq;

use dualtree::math::confidence::{
    coverage_probabilities, inverse_normal_cdf, outer_confidence_interval, standard_score,
};

// ============================================================================
// Inverse Normal CDF
// ============================================================================

/// Known quantiles of the standard normal distribution.
#[test]
fn inverse_normal_known_values() {
    assert_relative_eq!(inverse_normal_cdf(0.5), 0.0, epsilon = 1e-9);
    assert_relative_eq!(inverse_normal_cdf(0.975), 1.959964, epsilon = 1e-5);
    assert_relative_eq!(inverse_normal_cdf(0.025), -1.959964, epsilon = 1e-5);
    assert_relative_eq!(inverse_normal_cdf(0.8413447), 1.0, epsilon = 1e-5);
}

/// The quantile function is antisymmetric around one half.
#[test]
fn inverse_normal_symmetry() {
    for &p in &[0.01, 0.1, 0.25, 0.4, 0.49] {
        assert_relative_eq!(
            inverse_normal_cdf(p),
            -inverse_normal_cdf(1.0 - p),
            epsilon = 1e-8
        );
    }
}

/// Strictly increasing over the open unit interval.
#[test]
fn inverse_normal_monotone() {
    let mut prev = f64::NEG_INFINITY;
    for i in 1..100 {
        let v = inverse_normal_cdf(i as f64 / 100.0);
        assert!(v > prev);
        prev = v;
    }
}

/// Edge and out-of-domain behavior.
#[test]
fn inverse_normal_edges() {
    assert_eq!(inverse_normal_cdf(0.0), f64::NEG_INFINITY);
    assert_eq!(inverse_normal_cdf(1.0), f64::INFINITY);
    assert!(inverse_normal_cdf(-0.1).is_nan());
    assert!(inverse_normal_cdf(1.1).is_nan());
    assert!(inverse_normal_cdf(f64::NAN).is_nan());
}

/// Two-sided z-scores at familiar confidence levels.
#[test]
fn standard_score_two_sided() {
    assert_relative_eq!(standard_score(0.95), 1.959964, epsilon = 1e-5);
    assert_relative_eq!(standard_score(0.99), 2.575829, epsilon = 1e-5);
}

// ============================================================================
// Order-Statistics Coverage
// ============================================================================

/// Sampling the whole population covers any cut with certainty.
#[test]
fn full_sample_has_full_coverage() {
    let p = outer_confidence_interval(10.0, 10.0, 1.0, 1.0);
    assert_relative_eq!(p, 1.0, epsilon = 1e-12);
}

/// Coverage grows with the sample size and stays a probability.
#[test]
fn coverage_monotone_in_sample_size() {
    let population = 1000.0;
    let cut = 50.0;
    let mut prev = 0.0;
    for sample_size in [10.0, 20.0, 50.0, 100.0, 200.0] {
        let p = outer_confidence_interval(population, sample_size, 1.0, cut);
        assert!((0.0..=1.0).contains(&p));
        assert!(p >= prev);
        prev = p;
    }
    // A substantial sample almost surely covers the 5% cut.
    assert!(prev > 0.99);
}

/// The precomputed table is non-decreasing across rounds.
#[test]
fn coverage_table_non_decreasing() {
    let table = coverage_probabilities(25, 10, 2000.0, 100.0);
    assert_eq!(table.len(), 10);
    for pair in table.windows(2) {
        assert!(pair[1] >= pair[0] - 1e-12);
    }
    for &p in &table {
        assert!((0.0..=1.0).contains(&p));
    }
}
