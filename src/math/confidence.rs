//! Statistical confidence machinery for Monte Carlo pruning.
//!
//! ## Purpose
//!
//! This module supplies the two statistical ingredients of the Monte Carlo
//! pruning paths:
//!
//! 1. The inverse standard-normal CDF, used to convert a confidence level
//!    into the z-score that scales a sample standard deviation into a
//!    confidence half-width.
//! 2. Order-statistics coverage probabilities, used to precompute how many
//!    samples the order-statistics pruning path needs before its sampled
//!    extreme values cover a population quantile with the requested
//!    probability.
//!
//! ## Design notes
//!
//! * Computation is in `f64` regardless of the engine's `Float` parameter;
//!   quantiles and hypergeometric tail sums do not benefit from `f32`, and
//!   the engine converts the final scores once.
//! * The inverse normal CDF uses Acklam's rational approximation (relative
//!   error below 1.15e-9 over the open unit interval).
//! * Coverage probabilities follow the hypergeometric tail construction of
//!   the original order-statistics derivation; the binomial coefficients
//!   are evaluated as interleaved products to avoid overflow.
//!
//! ## Invariants
//!
//! * `inverse_normal_cdf` is strictly increasing on (0, 1).
//! * Coverage probabilities lie in [0, 1] and are non-decreasing in the
//!   sample count.
//!
//! ## Non-goals
//!
//! * This module does not decide when sampling is worthwhile; the pruning
//!   oracle does.

// ============================================================================
// Inverse Normal CDF
// ============================================================================

// Coefficients of Acklam's rational approximation.
const A: [f64; 6] = [
    -3.969683028665376e+01,
    2.209460984245205e+02,
    -2.759285104469687e+02,
    1.383577518672690e+02,
    -3.066479806614716e+01,
    2.506628277459239e+00,
];
const B: [f64; 5] = [
    -5.447609879822406e+01,
    1.615858368580409e+02,
    -1.556989798598866e+02,
    6.680131188771972e+01,
    -1.328068155288572e+01,
];
const C: [f64; 6] = [
    -7.784894002430293e-03,
    -3.223964580411365e-01,
    -2.400758277161838e+00,
    -2.549732539343734e+00,
    4.374664141464968e+00,
    2.938163982698783e+00,
];
const D: [f64; 4] = [
    7.784695709041462e-03,
    3.224671290700398e-01,
    2.445134137142996e+00,
    3.754408661907416e+00,
];

/// Break-points dividing the tail regions from the central region.
const P_LOW: f64 = 0.02425;
const P_HIGH: f64 = 1.0 - P_LOW;

/// Quantile function of the standard normal distribution.
///
/// Returns negative infinity at 0, positive infinity at 1, and NaN outside
/// the closed unit interval.
pub fn inverse_normal_cdf(p: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }

    if p < P_LOW {
        // Lower tail.
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= P_HIGH {
        // Central region.
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        // Upper tail: symmetry.
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -((((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0))
    }
}

/// z-score for a two-sided confidence interval at level `probability`.
///
/// A symmetric interval covering `probability` of the mass leaves
/// `(1 - probability) / 2` in each tail, so the half-width multiplier is
/// the quantile at `probability + (1 - probability) / 2`.
#[inline]
pub fn standard_score(probability: f64) -> f64 {
    inverse_normal_cdf(probability + 0.5 * (1.0 - probability))
}

// ============================================================================
// Order-Statistics Coverage Probabilities
// ============================================================================

/// Probability that the `sample_min_index`-th order statistic of a sample of
/// `sample_size` (drawn without replacement from `population_size` items)
/// lies at or below the population's `population_min_index`-th order
/// statistic.
///
/// Computed as a sum of hypergeometric terms over the feasible placements
/// of sampled items below the population cut.
pub fn outer_confidence_interval(
    population_size: f64,
    sample_size: f64,
    sample_min_index: f64,
    population_min_index: f64,
) -> f64 {
    let mut total_probability = 0.0;

    let mut r_star = sample_min_index;
    while r_star <= population_min_index.min(sample_size) {
        // Invalid binomial arguments contribute nothing.
        let feasible = r_star <= population_min_index
            && sample_size - r_star >= 0.0
            && population_size - population_min_index >= 0.0
            && sample_size - r_star <= population_size - population_min_index;
        if feasible {
            total_probability += binomial_coefficient_helper(
                population_min_index,
                r_star,
                population_size - population_min_index,
                sample_size - r_star,
                population_size,
                sample_size,
            );
        }
        r_star += 1.0;
    }

    total_probability.clamp(0.0, 1.0)
}

/// Evaluate `C(n3, k3) * C(n1, k1) / C(n2, k2)` without overflow by
/// interleaving multiplications and divisions.
fn binomial_coefficient_helper(n3: f64, k3: f64, n1: f64, k1: f64, n2: f64, k2: f64) -> f64 {
    if k3 > n3 || k3 < 0.0 || k1 > n1 || k1 < 0.0 || k2 > n2 || k2 < 0.0 {
        return 0.0;
    }

    // Use the smaller of k and n - k for each coefficient.
    let (mut k3, n_k3) = order_pair(n3, k3);
    let (mut k1, n_k1) = order_pair(n1, k1);
    let (mut k2, n_k2) = order_pair(n2, k2);

    let mut nchsk = 1.0;
    let min_index = n_k1.min(n_k2);
    let max_index = n_k1.max(n_k2);

    let mut i = 1.0;
    while i <= min_index {
        k1 += 1.0;
        k2 += 1.0;
        nchsk *= k1;
        nchsk /= k2;
        i += 1.0;
    }
    let mut i = min_index + 1.0;
    while i <= max_index {
        if n_k1 < n_k2 {
            k2 += 1.0;
            nchsk *= i;
            nchsk /= k2;
        } else {
            k1 += 1.0;
            nchsk *= k1;
            nchsk /= i;
        }
        i += 1.0;
    }
    let mut i = 1.0;
    while i <= n_k3 {
        k3 += 1.0;
        nchsk *= k3;
        nchsk /= i;
        i += 1.0;
    }

    nchsk
}

/// Replace `k` by `max(k, n - k)` and return the pair `(k, n - k)`.
fn order_pair(n: f64, k: f64) -> (f64, f64) {
    let n_k = n - k;
    if k < n_k {
        (n_k, n - n_k)
    } else {
        (k, n_k)
    }
}

/// Precompute the coverage probability achieved by `sample_multiple * (i+1)`
/// samples, for `i` in `0..rounds`.
///
/// `population_size` is the reference count; `population_min_index` is the
/// order-statistic cut the sampled minimum must cover (the engine uses the
/// index of the `(1 - probability)`-quantile). The table is consulted by the
/// order-statistics pruning path to translate a requested confidence into a
/// minimum sample count.
pub fn coverage_probabilities(
    sample_multiple: usize,
    rounds: usize,
    population_size: f64,
    population_min_index: f64,
) -> Vec<f64> {
    (0..rounds)
        .map(|i| {
            let sample_size = (sample_multiple * (i + 1)) as f64;
            outer_confidence_interval(population_size, sample_size, 1.0, population_min_index)
        })
        .collect()
}
