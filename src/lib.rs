//! # dualtree — approximate summation with dual-tree pruning
//!
//! Fast approximate pairwise-interaction summation over large point sets.
//! Instead of evaluating every point pair, the crate walks two spatial trees
//! simultaneously, maintains provable lower/upper bounds on each query's
//! accumulated quantity, and replaces whole blocks of pairwise work with
//! bound-derived estimates whenever the approximation error provably fits a
//! user-supplied budget.
//!
//! Three classic problems are built on the engine:
//!
//! * **Kernel density estimation** with fixed or per-reference (variable)
//!   bandwidths, deterministic or Monte Carlo pruning.
//! * **N-body potential summation** with a Plummer-softened potential.
//! * **Euclidean minimum spanning trees** via the dual-tree Boruvka
//!   algorithm.
//!
//! ## Quick Start
//!
//! ```rust
//! use dualtree::prelude::*;
//!
//! // 200 points in 2-D, row-major.
//! let data: Vec<f64> = (0..400).map(|i| (i as f64 * 0.37).sin()).collect();
//!
//! let model = Kde::new()
//!     .kernel(KernelType::Gaussian)
//!     .bandwidth(0.25)
//!     .relative_error(0.05)   // every estimate within 5% of the true sum
//!     .probability(1.0)       // deterministic guarantee
//!     .build()?;
//!
//! let result = model.estimate(&data, 2)?;
//! assert_eq!(result.estimate.len(), 200);
//! // Bounds bracket the estimate for every query point.
//! for q in 0..200 {
//!     assert!(result.lower[q] <= result.upper[q]);
//! }
//! # Result::<(), DualTreeError>::Ok(())
//! ```
//!
//! Relaxing `probability` below 1 allows the engine to accept Monte Carlo
//! estimates for far-apart node pairs, trading a small failure probability
//! for large speedups:
//!
//! ```rust
//! use dualtree::prelude::*;
//! # let data: Vec<f64> = (0..300).map(|i| (i as f64 * 0.61).cos()).collect();
//!
//! let model = Kde::new()
//!     .bandwidth(0.3)
//!     .relative_error(0.1)
//!     .probability(0.95)      // 95% confidence on the relative error
//!     .seed(42)               // reproducible sampling
//!     .build()?;
//! let result = model.estimate(&data, 3)?;
//! # let _ = result;
//! # Result::<(), DualTreeError>::Ok(())
//! ```
//!
//! Minimum spanning trees use the same trees but a different traversal:
//!
//! ```rust
//! use dualtree::prelude::*;
//! # let data: Vec<f64> = (0..100).map(|i| ((i * 7919) % 83) as f64 / 83.0).collect();
//!
//! let mst = Emst::new().leaf_size(1).build()?.compute(&data, 2)?;
//! assert_eq!(mst.edges.len(), 49);
//! # Result::<(), DualTreeError>::Ok(())
//! ```
//!
//! ## Guarantees
//!
//! For relative error `tau` and probability `p`, each query's final estimate
//! satisfies `|estimate - truth| <= tau * truth` with probability at least
//! `p`. With `tau = 0` and `p = 1` the result equals the brute-force sum up
//! to floating-point roundoff. The per-query `lower`/`upper` outputs bracket
//! the true value throughout.
//!
//! ## References
//!
//! - Gray, A. G. and Moore, A. W. (2001). "N-Body Problems in Statistical
//!   Learning".
//! - Holmes, M., Gray, A. G., Isbell, C. (2007). "Ultrafast Monte Carlo for
//!   Statistical Summations".
//! - March, W. B., Ram, P., Gray, A. G. (2010). "Fast Euclidean Minimum
//!   Spanning Tree: Algorithm, Analysis, and Applications".

// Layer 1: Primitives - data structures and basic utilities.
pub mod primitives;

// Layer 2: Math - kernels and statistical confidence machinery.
pub mod math;

// Layer 3: Tree - spatial partitioning (kd-tree, bounding rectangles).
pub mod tree;

// Layer 4: Engine - bound statistics, pruning oracle, dual-tree traversal.
pub mod engine;

// Layer 5: Methods - KDE, N-body, and EMST drivers.
pub mod methods;

// High-level fluent API.
pub mod api;

// Standard prelude.
pub mod prelude {
    pub use crate::api::{Emst, Kde, KernelType, MonteCarloStrategy, Nbody};
    pub use crate::engine::output::SummationResult;
    pub use crate::methods::mst::MstResult;
    pub use crate::primitives::errors::DualTreeError;
}
