//! Input validation for dual-tree configuration and data.
//!
//! ## Purpose
//!
//! This module provides validation functions for the point sets, weights,
//! and tuning parameters the drivers accept. It checks requirements such
//! as array shapes, finite values, and parameter bounds.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Efficiency**: Checks are ordered from cheap to expensive.
//! * **Generics**: Validation is generic over `Float` types.
//!
//! ## Key concepts
//!
//! * **Shape checks**: Flat coordinate arrays must be an exact multiple of
//!   the declared dimension; parallel arrays must agree in length.
//! * **Parameter bounds**: Enforces constraints like probability in (0, 1].
//! * **Finite checks**: Ensures all inputs are finite (no NaN/Inf).
//!
//! ## Invariants
//!
//! * All validated inputs satisfy their respective mathematical constraints.
//! * Validation logic is deterministic and side-effect free.
//!
//! ## Non-goals
//!
//! * This module does not transform or filter input data.
//! * This module does not provide automatic correction of invalid inputs.
//! * This module does not run the traversal itself.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::DualTreeError;

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for dual-tree configuration and input data.
///
/// Provides static methods for validating point sets and parameters. All
/// methods return `Result<(), DualTreeError>` and fail fast upon
/// identifying the first violation.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Core Input Validation
    // ========================================================================

    /// Validate a flat row-major coordinate array against its declared
    /// dimension.
    pub fn validate_points<T: Float>(coords: &[T], dim: usize) -> Result<(), DualTreeError> {
        // Check 1: Non-empty array
        if coords.is_empty() {
            return Err(DualTreeError::EmptyInput);
        }

        // Check 2: Positive dimensionality
        if dim == 0 {
            return Err(DualTreeError::InvalidInput(
                "dimension must be at least 1".to_string(),
            ));
        }

        // Check 3: Exact multiple of the dimension
        if coords.len() % dim != 0 {
            return Err(DualTreeError::RaggedInput {
                len: coords.len(),
                dim,
            });
        }

        // Check 4: All coordinates finite
        for (i, &c) in coords.iter().enumerate() {
            if !c.is_finite() {
                return Err(DualTreeError::InvalidNumericValue(format!(
                    "coords[{}]={}",
                    i,
                    c.to_f64().unwrap_or(f64::NAN)
                )));
            }
        }

        Ok(())
    }

    /// Validate a parallel per-point array (weights, masses, bandwidths)
    /// against the point count.
    pub fn validate_parallel_len(expected: usize, got: usize) -> Result<(), DualTreeError> {
        if expected != got {
            return Err(DualTreeError::MismatchedInputs { expected, got });
        }
        Ok(())
    }

    /// Validate per-reference weights: finite and non-negative, with a
    /// positive total.
    pub fn validate_weights<T: Float>(weights: &[T]) -> Result<(), DualTreeError> {
        let mut total = T::zero();
        for (index, &w) in weights.iter().enumerate() {
            if !w.is_finite() || w < T::zero() {
                return Err(DualTreeError::InvalidWeight {
                    index,
                    value: w.to_f64().unwrap_or(f64::NAN),
                });
            }
            total = total + w;
        }
        if total <= T::zero() {
            return Err(DualTreeError::InvalidInput(
                "total reference weight must be positive".to_string(),
            ));
        }
        Ok(())
    }

    // ========================================================================
    // Parameter Validation
    // ========================================================================

    /// Validate the relative error tolerance.
    pub fn validate_relative_error<T: Float>(tau: T) -> Result<(), DualTreeError> {
        if !tau.is_finite() || tau < T::zero() {
            return Err(DualTreeError::InvalidRelativeError(
                tau.to_f64().unwrap_or(f64::NAN),
            ));
        }
        Ok(())
    }

    /// Validate the confidence probability.
    pub fn validate_probability<T: Float>(probability: T) -> Result<(), DualTreeError> {
        if !probability.is_finite() || probability <= T::zero() || probability > T::one() {
            return Err(DualTreeError::InvalidProbability(
                probability.to_f64().unwrap_or(f64::NAN),
            ));
        }
        Ok(())
    }

    /// Validate the absolute error floor.
    pub fn validate_error_floor<T: Float>(floor: T) -> Result<(), DualTreeError> {
        if !floor.is_finite() || floor < T::zero() {
            return Err(DualTreeError::InvalidInput(format!(
                "absolute error floor must be >= 0 and finite, got {}",
                floor.to_f64().unwrap_or(f64::NAN)
            )));
        }
        Ok(())
    }

    /// Validate a single kernel bandwidth.
    pub fn validate_bandwidth<T: Float>(bandwidth: T) -> Result<(), DualTreeError> {
        if !bandwidth.is_finite() || bandwidth <= T::zero() {
            return Err(DualTreeError::InvalidBandwidth(
                bandwidth.to_f64().unwrap_or(f64::NAN),
            ));
        }
        Ok(())
    }

    /// Validate a per-reference bandwidth array.
    pub fn validate_bandwidths<T: Float>(bandwidths: &[T]) -> Result<(), DualTreeError> {
        for &h in bandwidths {
            Self::validate_bandwidth(h)?;
        }
        Ok(())
    }

    /// Validate the Plummer softening length.
    pub fn validate_softening<T: Float>(softening: T) -> Result<(), DualTreeError> {
        if !softening.is_finite() || softening <= T::zero() {
            return Err(DualTreeError::InvalidSoftening(
                softening.to_f64().unwrap_or(f64::NAN),
            ));
        }
        Ok(())
    }

    /// Validate the tree leaf size.
    pub fn validate_leaf_size(leaf_size: usize) -> Result<(), DualTreeError> {
        if leaf_size == 0 {
            return Err(DualTreeError::InvalidLeafSize(leaf_size));
        }
        Ok(())
    }

    /// Validate the Monte Carlo sample budget.
    pub fn validate_sample_budget(initial: usize, cap: usize) -> Result<(), DualTreeError> {
        if cap < initial {
            return Err(DualTreeError::InvalidSampleBudget { initial, cap });
        }
        Ok(())
    }
}
