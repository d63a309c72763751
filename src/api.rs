//! High-level API for dual-tree summation.
//!
//! ## Purpose
//!
//! This module provides the user-facing entry points: fluent builders for
//! the three methods the crate ships (kernel density estimation, N-body
//! potentials, Euclidean minimum spanning trees). Builders collect
//! parameters, `build()` validates them into an immutable model, and the
//! model runs against data.
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builders with sensible defaults for every
//!   parameter.
//! * **Validated**: Parameters are validated once at `build()`; data is
//!   validated per run.
//! * **Type-Safe**: Generic over `Float` types for flexible precision.
//!
//! ### Configuration Flow
//!
//! 1. Create a builder via `Kde::new()`, `Nbody::new()`, or `Emst::new()`.
//! 2. Chain configuration methods (`.bandwidth()`, `.relative_error()`, ...).
//! 3. Call `.build()?` to get a validated model.
//! 4. Run the model (`.estimate()`, `.potentials()`, `.compute()`).

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::engine::executor::SummationConfig;
use crate::engine::validator::Validator;
use crate::math::kernel::{EpanechnikovKernel, GaussianKernel};
use crate::methods::kde::{self, KdeProblem};
use crate::methods::mst::{DualTreeBoruvka, MstResult};
use crate::methods::nbody;

// Publicly re-exported types
pub use crate::engine::executor::MonteCarloStrategy;
pub use crate::engine::output::{SummationResult, TraversalCounters};
pub use crate::methods::mst::{MstCounters, MstEdge};
pub use crate::primitives::errors::DualTreeError;

// ============================================================================
// Kernel Selection
// ============================================================================

/// Density kernel families available through the high-level API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KernelType {
    /// Gaussian kernel, unbounded support.
    #[default]
    Gaussian,
    /// Epanechnikov kernel, compact support; distant node pairs prune
    /// exactly.
    Epanechnikov,
}

/// Fixed or per-reference bandwidths.
#[derive(Debug, Clone)]
enum Bandwidths<T> {
    Fixed(T),
    Variable(Vec<T>),
}

// ============================================================================
// Shared Engine Parameters
// ============================================================================

/// Engine knobs shared by the KDE and N-body builders, with their unset
/// state and defaults.
#[derive(Debug, Clone)]
struct EngineParams<T> {
    relative_error: Option<T>,
    probability: Option<T>,
    absolute_error_floor: Option<T>,
    leaf_size: Option<usize>,
    initial_samples: Option<usize>,
    max_samples: Option<usize>,
    strategy: Option<MonteCarloStrategy>,
    seed: Option<u64>,
}

impl<T: Float> EngineParams<T> {
    fn new() -> Self {
        Self {
            relative_error: None,
            probability: None,
            absolute_error_floor: None,
            leaf_size: None,
            initial_samples: None,
            max_samples: None,
            strategy: None,
            seed: None,
        }
    }

    /// Validate and resolve into a concrete engine configuration plus the
    /// tree leaf size.
    fn resolve(&self, default_leaf_size: usize) -> Result<(SummationConfig<T>, usize), DualTreeError> {
        let defaults = SummationConfig::<T>::default();
        let config = SummationConfig {
            relative_error: self.relative_error.unwrap_or(defaults.relative_error),
            probability: self.probability.unwrap_or(defaults.probability),
            absolute_error_floor: self
                .absolute_error_floor
                .unwrap_or(defaults.absolute_error_floor),
            normalization: defaults.normalization,
            initial_samples: self.initial_samples.unwrap_or(defaults.initial_samples),
            sample_multiple: defaults.sample_multiple,
            coverage_rounds: defaults.coverage_rounds,
            max_samples: self.max_samples.unwrap_or(defaults.max_samples),
            strategy: self.strategy.unwrap_or_default(),
            seed: self.seed,
        };
        let leaf_size = self.leaf_size.unwrap_or(default_leaf_size);

        Validator::validate_relative_error(config.relative_error)?;
        Validator::validate_probability(config.probability)?;
        Validator::validate_error_floor(config.absolute_error_floor)?;
        Validator::validate_leaf_size(leaf_size)?;
        Validator::validate_sample_budget(config.initial_samples, config.max_samples)?;

        Ok((config, leaf_size))
    }
}

// ============================================================================
// KDE Builder
// ============================================================================

/// Fluent builder for kernel density estimation.
#[derive(Debug, Clone)]
pub struct Kde<T> {
    kernel: Option<KernelType>,
    bandwidth: Option<T>,
    bandwidths: Option<Vec<T>>,
    params: EngineParams<T>,
    duplicate_param: Option<&'static str>,
}

impl<T: Float> Default for Kde<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> Kde<T> {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            kernel: None,
            bandwidth: None,
            bandwidths: None,
            params: EngineParams::new(),
            duplicate_param: None,
        }
    }

    /// Set the kernel family (default: Gaussian).
    pub fn kernel(mut self, kernel: KernelType) -> Self {
        if self.kernel.is_some() {
            self.duplicate_param = Some("kernel");
        }
        self.kernel = Some(kernel);
        self
    }

    /// Set a single bandwidth shared by every reference (default: 1).
    pub fn bandwidth(mut self, bandwidth: T) -> Self {
        if self.bandwidth.is_some() {
            self.duplicate_param = Some("bandwidth");
        }
        self.bandwidth = Some(bandwidth);
        self
    }

    /// Set one bandwidth per reference point (variable-bandwidth mode).
    pub fn bandwidths(mut self, bandwidths: &[T]) -> Self {
        if self.bandwidths.is_some() {
            self.duplicate_param = Some("bandwidths");
        }
        self.bandwidths = Some(bandwidths.to_vec());
        self
    }

    /// Set the relative error tolerance (default: 0.1).
    pub fn relative_error(mut self, tau: T) -> Self {
        if self.params.relative_error.is_some() {
            self.duplicate_param = Some("relative_error");
        }
        self.params.relative_error = Some(tau);
        self
    }

    /// Set the confidence that the error guarantee holds (default: 1,
    /// deterministic pruning only).
    pub fn probability(mut self, probability: T) -> Self {
        if self.params.probability.is_some() {
            self.duplicate_param = Some("probability");
        }
        self.params.probability = Some(probability);
        self
    }

    /// Set the absolute error floor that unsticks pruning while lower
    /// bounds are still zero (default: 0).
    pub fn absolute_error_floor(mut self, floor: T) -> Self {
        if self.params.absolute_error_floor.is_some() {
            self.duplicate_param = Some("absolute_error_floor");
        }
        self.params.absolute_error_floor = Some(floor);
        self
    }

    /// Set the kd-tree leaf size (default: 30).
    pub fn leaf_size(mut self, leaf_size: usize) -> Self {
        if self.params.leaf_size.is_some() {
            self.duplicate_param = Some("leaf_size");
        }
        self.params.leaf_size = Some(leaf_size);
        self
    }

    /// Set the Monte Carlo batch size (default: 25).
    pub fn initial_samples(mut self, samples: usize) -> Self {
        if self.params.initial_samples.is_some() {
            self.duplicate_param = Some("initial_samples");
        }
        self.params.initial_samples = Some(samples);
        self
    }

    /// Set the hard Monte Carlo sample cap per node pair (default: 10000).
    pub fn max_samples(mut self, cap: usize) -> Self {
        if self.params.max_samples.is_some() {
            self.duplicate_param = Some("max_samples");
        }
        self.params.max_samples = Some(cap);
        self
    }

    /// Set the Monte Carlo pruning strategy (default: sample mean).
    pub fn monte_carlo_strategy(mut self, strategy: MonteCarloStrategy) -> Self {
        if self.params.strategy.is_some() {
            self.duplicate_param = Some("monte_carlo_strategy");
        }
        self.params.strategy = Some(strategy);
        self
    }

    /// Seed the sampling RNG for reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        if self.params.seed.is_some() {
            self.duplicate_param = Some("seed");
        }
        self.params.seed = Some(seed);
        self
    }

    /// Validate parameters into an immutable model.
    pub fn build(self) -> Result<KdeModel<T>, DualTreeError> {
        if let Some(name) = self.duplicate_param {
            return Err(DualTreeError::InvalidInput(format!(
                "parameter '{}' was set more than once",
                name
            )));
        }
        if self.bandwidth.is_some() && self.bandwidths.is_some() {
            return Err(DualTreeError::InvalidInput(
                "set either 'bandwidth' or 'bandwidths', not both".to_string(),
            ));
        }

        let bandwidths = match self.bandwidths {
            Some(hs) => {
                Validator::validate_bandwidths(&hs)?;
                Bandwidths::Variable(hs)
            }
            None => {
                let h = self.bandwidth.unwrap_or_else(T::one);
                Validator::validate_bandwidth(h)?;
                Bandwidths::Fixed(h)
            }
        };
        let (config, leaf_size) = self.params.resolve(30)?;

        Ok(KdeModel {
            kernel: self.kernel.unwrap_or_default(),
            bandwidths,
            config,
            leaf_size,
        })
    }
}

/// A validated density estimator.
#[derive(Debug, Clone)]
pub struct KdeModel<T> {
    kernel: KernelType,
    bandwidths: Bandwidths<T>,
    config: SummationConfig<T>,
    leaf_size: usize,
}

impl<T: Float> KdeModel<T> {
    /// Estimate the density at every point of `data` from `data` itself.
    ///
    /// `data` is flat row-major with `dim` coordinates per point.
    pub fn estimate(&self, data: &[T], dim: usize) -> Result<SummationResult<T>, DualTreeError> {
        self.run(KdeProblem {
            queries: None,
            references: data,
            dim,
            weights: None,
        })
    }

    /// Estimate the density at `queries` from a distinct, optionally
    /// weighted reference set.
    pub fn estimate_into(
        &self,
        queries: &[T],
        references: &[T],
        dim: usize,
        weights: Option<&[T]>,
    ) -> Result<SummationResult<T>, DualTreeError> {
        self.run(KdeProblem {
            queries: Some(queries),
            references,
            dim,
            weights,
        })
    }

    fn run(&self, problem: KdeProblem<'_, T>) -> Result<SummationResult<T>, DualTreeError> {
        let config = self.config.clone();
        match (&self.bandwidths, self.kernel) {
            (Bandwidths::Fixed(h), KernelType::Gaussian) => {
                kde::run_fixed::<T, GaussianKernel<T>>(&problem, *h, self.leaf_size, config)
            }
            (Bandwidths::Fixed(h), KernelType::Epanechnikov) => {
                kde::run_fixed::<T, EpanechnikovKernel<T>>(&problem, *h, self.leaf_size, config)
            }
            (Bandwidths::Variable(hs), KernelType::Gaussian) => {
                kde::run_variable::<T, GaussianKernel<T>>(&problem, hs, self.leaf_size, config)
            }
            (Bandwidths::Variable(hs), KernelType::Epanechnikov) => {
                kde::run_variable::<T, EpanechnikovKernel<T>>(&problem, hs, self.leaf_size, config)
            }
        }
    }
}

// ============================================================================
// N-body Builder
// ============================================================================

/// Fluent builder for Plummer-softened potential summation.
#[derive(Debug, Clone)]
pub struct Nbody<T> {
    softening: Option<T>,
    params: EngineParams<T>,
    duplicate_param: Option<&'static str>,
}

impl<T: Float> Default for Nbody<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> Nbody<T> {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            softening: None,
            params: EngineParams::new(),
            duplicate_param: None,
        }
    }

    /// Set the Plummer softening length (default: 0.05).
    pub fn softening(mut self, softening: T) -> Self {
        if self.softening.is_some() {
            self.duplicate_param = Some("softening");
        }
        self.softening = Some(softening);
        self
    }

    /// Set the relative error tolerance (default: 0.1).
    pub fn relative_error(mut self, tau: T) -> Self {
        if self.params.relative_error.is_some() {
            self.duplicate_param = Some("relative_error");
        }
        self.params.relative_error = Some(tau);
        self
    }

    /// Set the confidence that the error guarantee holds (default: 1).
    pub fn probability(mut self, probability: T) -> Self {
        if self.params.probability.is_some() {
            self.duplicate_param = Some("probability");
        }
        self.params.probability = Some(probability);
        self
    }

    /// Set the absolute error floor (default: 0).
    pub fn absolute_error_floor(mut self, floor: T) -> Self {
        if self.params.absolute_error_floor.is_some() {
            self.duplicate_param = Some("absolute_error_floor");
        }
        self.params.absolute_error_floor = Some(floor);
        self
    }

    /// Set the kd-tree leaf size (default: 30).
    pub fn leaf_size(mut self, leaf_size: usize) -> Self {
        if self.params.leaf_size.is_some() {
            self.duplicate_param = Some("leaf_size");
        }
        self.params.leaf_size = Some(leaf_size);
        self
    }

    /// Set the Monte Carlo batch size (default: 25).
    pub fn initial_samples(mut self, samples: usize) -> Self {
        if self.params.initial_samples.is_some() {
            self.duplicate_param = Some("initial_samples");
        }
        self.params.initial_samples = Some(samples);
        self
    }

    /// Set the hard Monte Carlo sample cap per node pair (default: 10000).
    pub fn max_samples(mut self, cap: usize) -> Self {
        if self.params.max_samples.is_some() {
            self.duplicate_param = Some("max_samples");
        }
        self.params.max_samples = Some(cap);
        self
    }

    /// Set the Monte Carlo pruning strategy (default: sample mean).
    pub fn monte_carlo_strategy(mut self, strategy: MonteCarloStrategy) -> Self {
        if self.params.strategy.is_some() {
            self.duplicate_param = Some("monte_carlo_strategy");
        }
        self.params.strategy = Some(strategy);
        self
    }

    /// Seed the sampling RNG for reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        if self.params.seed.is_some() {
            self.duplicate_param = Some("seed");
        }
        self.params.seed = Some(seed);
        self
    }

    /// Validate parameters into an immutable model.
    pub fn build(self) -> Result<NbodyModel<T>, DualTreeError> {
        if let Some(name) = self.duplicate_param {
            return Err(DualTreeError::InvalidInput(format!(
                "parameter '{}' was set more than once",
                name
            )));
        }
        let softening = self
            .softening
            .unwrap_or_else(|| T::from(0.05).unwrap_or_else(T::one));
        Validator::validate_softening(softening)?;
        let (config, leaf_size) = self.params.resolve(30)?;

        Ok(NbodyModel {
            softening,
            config,
            leaf_size,
        })
    }
}

/// A validated potential summation model.
#[derive(Debug, Clone)]
pub struct NbodyModel<T> {
    softening: T,
    config: SummationConfig<T>,
    leaf_size: usize,
}

impl<T: Float> NbodyModel<T> {
    /// Potential of every particle due to all particles (self included).
    ///
    /// `positions` is flat row-major; `masses` defaults to unit mass.
    pub fn potentials(
        &self,
        positions: &[T],
        dim: usize,
        masses: Option<&[T]>,
    ) -> Result<SummationResult<T>, DualTreeError> {
        nbody::run_potentials(
            positions,
            dim,
            masses,
            self.softening,
            self.leaf_size,
            self.config.clone(),
        )
    }
}

// ============================================================================
// EMST Builder
// ============================================================================

/// Fluent builder for Euclidean minimum spanning trees.
#[derive(Debug, Clone)]
pub struct Emst {
    leaf_size: Option<usize>,
    duplicate_param: Option<&'static str>,
}

impl Default for Emst {
    fn default() -> Self {
        Self::new()
    }
}

impl Emst {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            leaf_size: None,
            duplicate_param: None,
        }
    }

    /// Set the kd-tree leaf size (default: 1).
    pub fn leaf_size(mut self, leaf_size: usize) -> Self {
        if self.leaf_size.is_some() {
            self.duplicate_param = Some("leaf_size");
        }
        self.leaf_size = Some(leaf_size);
        self
    }

    /// Validate parameters into an immutable model.
    pub fn build(self) -> Result<EmstModel, DualTreeError> {
        if let Some(name) = self.duplicate_param {
            return Err(DualTreeError::InvalidInput(format!(
                "parameter '{}' was set more than once",
                name
            )));
        }
        let leaf_size = self.leaf_size.unwrap_or(1);
        Validator::validate_leaf_size(leaf_size)?;
        Ok(EmstModel { leaf_size })
    }
}

/// A validated minimum-spanning-tree model.
#[derive(Debug, Clone)]
pub struct EmstModel {
    leaf_size: usize,
}

impl EmstModel {
    /// Compute the exact Euclidean MST of `points` (flat row-major).
    pub fn compute<T: Float>(&self, points: &[T], dim: usize) -> Result<MstResult<T>, DualTreeError> {
        Ok(DualTreeBoruvka::new(points, dim, self.leaf_size)?.compute())
    }
}
