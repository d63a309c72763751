//! Tests for the dual-tree traversal and its error guarantees.
//!
//! These tests drive the summation engine directly (no high-level builder)
//! and compare against exhaustive pairwise summation:
//! - Exactness when the tolerance is zero
//! - Per-query bound soundness under loose tolerances
//! - Weight accounting across prunes and base cases
//! - The deterministic relative-error guarantee

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use dualtree::engine::executor::{SummationConfig, SummationEngine};
use dualtree::math::kernel::{GaussianKernel, Kernel};
use dualtree::primitives::points::PointSet;
use dualtree::tree::kdtree::KdTree;

fn random_points(n: usize, dim: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n * dim).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

/// Exhaustive weighted kernel sums in the caller's query order.
fn brute_force(
    queries: &[f64],
    references: &[f64],
    dim: usize,
    kernel: &GaussianKernel<f64>,
    weights: &[f64],
) -> Vec<f64> {
    let qs = PointSet::from_flat(queries, dim);
    let rs = PointSet::from_flat(references, dim);
    (0..qs.len())
        .map(|q| {
            (0..rs.len())
                .map(|r| weights[r] * kernel.eval_unnorm_sq(qs.distance_sq_to(q, &rs, r)))
                .sum()
        })
        .collect()
}

fn run_self_join(
    points: &[f64],
    dim: usize,
    leaf_size: usize,
    bandwidth: f64,
    weights: &[f64],
    config: SummationConfig<f64>,
) -> dualtree::engine::output::SummationResult<f64> {
    let tree = KdTree::build(PointSet::from_flat(points, dim), leaf_size);
    let kernel: GaussianKernel<f64> = Kernel::new(bandwidth);
    let kernels = vec![kernel; weights.len()];
    SummationEngine::new(&tree, &tree, &kernels, weights, config).run()
}

// ============================================================================
// Exactness
// ============================================================================

/// Zero tolerance forbids every prune, so the traversal degenerates to
/// exhaustive summation.
#[test]
fn zero_tolerance_matches_brute_force() {
    let points = random_points(150, 2, 42);
    let weights = vec![1.0; 150];
    let kernel: GaussianKernel<f64> = Kernel::new(0.4);

    let config = SummationConfig {
        relative_error: 0.0,
        ..SummationConfig::default()
    };
    let result = run_self_join(&points, 2, 10, 0.4, &weights, config);
    let exact = brute_force(&points, &points, 2, &kernel, &weights);

    for (got, want) in result.estimate.iter().zip(exact.iter()) {
        assert!((got - want).abs() <= 1e-9 * want.abs());
    }
    assert_eq!(result.counters.finite_difference_prunes, 0);
    assert_eq!(result.counters.monte_carlo_prunes, 0);
    // With pruning forbidden, every resolved pair was a base case.
    assert_eq!(result.counters.total_resolved(), result.counters.base_cases);
    assert!(result.counters.base_cases > 0);
}

/// Non-uniform reference weights flow through the base cases and bounds.
#[test]
fn weighted_references_exact() {
    let points = random_points(90, 3, 5);
    let mut rng = StdRng::seed_from_u64(6);
    let weights: Vec<f64> = (0..90).map(|_| rng.gen_range(0.1..3.0)).collect();
    let kernel: GaussianKernel<f64> = Kernel::new(0.6);

    let config = SummationConfig {
        relative_error: 0.0,
        ..SummationConfig::default()
    };
    let result = run_self_join(&points, 3, 8, 0.6, &weights, config);
    let exact = brute_force(&points, &points, 3, &kernel, &weights);

    for (got, want) in result.estimate.iter().zip(exact.iter()) {
        assert!((got - want).abs() <= 1e-9 * want.abs());
    }
}

// ============================================================================
// Bound Soundness
// ============================================================================

/// With a loose tolerance the estimate is approximate, but the certified
/// bounds still bracket the exact sum at every query.
#[test]
fn bounds_bracket_exact_values() {
    let points = random_points(300, 2, 99);
    let weights = vec![1.0; 300];
    let kernel: GaussianKernel<f64> = Kernel::new(0.3);

    let config = SummationConfig {
        relative_error: 0.3,
        ..SummationConfig::default()
    };
    let result = run_self_join(&points, 2, 12, 0.3, &weights, config);
    let exact = brute_force(&points, &points, 2, &kernel, &weights);

    let slack = 1e-9;
    for q in 0..300 {
        assert!(result.lower[q] <= exact[q] + slack);
        assert!(exact[q] <= result.upper[q] + slack);
        assert!(result.lower[q] <= result.estimate[q] + slack);
        assert!(result.estimate[q] <= result.upper[q] + slack);
    }
    // A loose tolerance on clustered data should actually prune.
    assert!(result.counters.finite_difference_prunes > 0);
}

/// Every reference is accounted for exactly once per query, whether it was
/// pruned away or evaluated exhaustively.
#[test]
fn pruned_weight_accounts_for_all_references() {
    let points = random_points(200, 2, 17);
    let mut rng = StdRng::seed_from_u64(18);
    let weights: Vec<f64> = (0..200).map(|_| rng.gen_range(0.5..2.0)).collect();
    let total: f64 = weights.iter().sum();

    let config = SummationConfig {
        relative_error: 0.2,
        ..SummationConfig::default()
    };
    let result = run_self_join(&points, 2, 10, 0.5, &weights, config);

    for &w in &result.pruned_weight {
        assert!((w - total).abs() <= 1e-9 * total);
    }
}

// ============================================================================
// Monotone Convergence
// ============================================================================

/// The bound gap never exceeds its pessimistic initial width, and what
/// remains of it is exactly the two-sided slack of the accepted estimates:
/// every accounted reference only ever narrows the gap.
#[test]
fn bound_width_shrinks_with_accounted_weight() {
    let points = random_points(300, 2, 55);
    let weights = vec![1.0; 300];

    let config = SummationConfig {
        relative_error: 0.25,
        ..SummationConfig::default()
    };
    let result = run_self_join(&points, 2, 12, 0.35, &weights, config);

    // Gaussian maximum value is one, so the pessimistic initial gap is
    // the total reference weight.
    let initial_width = 300.0;
    for q in 0..300 {
        let width = result.upper[q] - result.lower[q];
        assert!(width >= -1e-9);
        assert!(width <= initial_width + 1e-9);
        assert!((width - 2.0 * result.used_error[q]).abs() <= 1e-9);
    }
    assert!(result.max_bound_width() <= initial_width);
}

/// Tightening the tolerance drives the bound gap to zero: each run's
/// per-query width stays within twice its error budget, and the zero
/// tolerance run closes the gap entirely.
#[test]
fn bound_width_converges_with_tolerance() {
    let points = random_points(250, 2, 56);
    let weights = vec![1.0; 250];
    let kernel: GaussianKernel<f64> = Kernel::new(0.3);
    let exact = brute_force(&points, &points, 2, &kernel, &weights);

    for tau in [0.4, 0.2, 0.1, 0.05] {
        let config = SummationConfig {
            relative_error: tau,
            ..SummationConfig::default()
        };
        let result = run_self_join(&points, 2, 10, 0.3, &weights, config);
        for q in 0..250 {
            let width = result.upper[q] - result.lower[q];
            assert!(
                width <= 2.0 * tau * exact[q] + 1e-9,
                "gap {width} exceeds the {tau} budget at query {q}"
            );
        }
    }

    let config = SummationConfig {
        relative_error: 0.0,
        ..SummationConfig::default()
    };
    let result = run_self_join(&points, 2, 10, 0.3, &weights, config);
    for q in 0..250 {
        assert!(result.upper[q] - result.lower[q] <= 1e-9);
    }
}

// ============================================================================
// Relative-Error Guarantee
// ============================================================================

/// Deterministic pruning keeps every estimate within the relative
/// tolerance of the exact sum.
#[test]
fn deterministic_relative_error_holds() {
    let tau = 0.1;
    let points = random_points(400, 2, 33);
    let weights = vec![1.0; 400];
    let kernel: GaussianKernel<f64> = Kernel::new(0.25);

    let config = SummationConfig {
        relative_error: tau,
        ..SummationConfig::default()
    };
    let result = run_self_join(&points, 2, 15, 0.25, &weights, config);
    let exact = brute_force(&points, &points, 2, &kernel, &weights);

    for (got, want) in result.estimate.iter().zip(exact.iter()) {
        assert!(
            (got - want).abs() <= tau * want + 1e-9,
            "estimate {got} strayed beyond {tau} of {want}"
        );
    }
}

/// The committed error bound also honors the tolerance against the
/// certified lower bound.
#[test]
fn used_error_within_budget() {
    let tau = 0.15;
    let points = random_points(250, 3, 77);
    let weights = vec![1.0; 250];

    let config = SummationConfig {
        relative_error: tau,
        ..SummationConfig::default()
    };
    let result = run_self_join(&points, 3, 10, 0.5, &weights, config);

    for q in 0..250 {
        assert!(result.used_error[q] <= tau * result.lower[q] + 1e-9);
    }
}

// ============================================================================
// Distinct Query and Reference Sets
// ============================================================================

/// A bichromatic run returns one result per query point, exact at zero
/// tolerance.
#[test]
fn distinct_query_and_reference_sets() {
    let queries = random_points(60, 2, 101);
    let references = random_points(140, 2, 102);
    let weights = vec![1.0; 140];
    let kernel: GaussianKernel<f64> = Kernel::new(0.5);

    let qtree = KdTree::build(PointSet::from_flat(&queries, 2), 8);
    let rtree = KdTree::build(PointSet::from_flat(&references, 2), 8);
    let kernels = vec![kernel.clone(); 140];

    let config = SummationConfig {
        relative_error: 0.0,
        ..SummationConfig::default()
    };
    let result = SummationEngine::new(&qtree, &rtree, &kernels, &weights, config).run();
    let exact = brute_force(&queries, &references, 2, &kernel, &weights);

    assert_eq!(result.len(), 60);
    for (got, want) in result.estimate.iter().zip(exact.iter()) {
        assert!((got - want).abs() <= 1e-9 * want.abs());
    }
}
