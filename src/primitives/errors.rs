//! Error types for dual-tree summation operations.
//!
//! ## Purpose
//!
//! This module defines error conditions that can occur while configuring or
//! running the dual-tree algorithms, including input validation, parameter
//! constraints, and point-set shape mismatches.
//!
//! ## Design notes
//!
//! * **Contextual**: Errors include relevant values (e.g., actual vs. expected lengths).
//! * **Deferred**: Errors are often caught and stored during builder configuration.
//! * **Trait Implementation**: Implements `Display` and `std::error::Error`.
//!
//! ## Key concepts
//!
//! 1. **Input validation**: Empty arrays, mismatched lengths, non-finite values.
//! 2. **Parameter validation**: Invalid tolerance, probability, bandwidth, or leaf size.
//!
//! ## Invariants
//!
//! * All variants provide sufficient context for diagnosis.
//! * Numeric values in errors use the same types as the public API.
//!
//! ## Non-goals
//!
//! * This module does not perform the validation logic itself.
//! * This module does not provide error recovery or fallback strategies.

// External dependencies
use std::error::Error;
use std::fmt::{Display, Formatter, Result};

// ============================================================================
// Error Type
// ============================================================================

/// Error type for dual-tree summation operations.
#[derive(Debug, Clone, PartialEq)]
pub enum DualTreeError {
    /// Input point array is empty.
    EmptyInput,

    /// Generic invalid input error with a descriptive message.
    InvalidInput(String),

    /// The flat coordinate array length is not a multiple of the dimension.
    RaggedInput {
        /// Number of coordinates provided.
        len: usize,
        /// Declared dimensionality.
        dim: usize,
    },

    /// Two point sets (or a point set and a weight array) disagree in length.
    MismatchedInputs {
        /// Expected number of elements.
        expected: usize,
        /// Number of elements provided.
        got: usize,
    },

    /// Input data contains NaN or infinite values.
    InvalidNumericValue(String),

    /// Relative error tolerance must be non-negative and finite.
    InvalidRelativeError(f64),

    /// Probability (confidence) must be in the range (0, 1].
    InvalidProbability(f64),

    /// Kernel bandwidth must be positive and finite.
    InvalidBandwidth(f64),

    /// Softening length must be positive and finite.
    InvalidSoftening(f64),

    /// Reference weights must be non-negative and finite.
    InvalidWeight {
        /// Index of the offending weight.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// Tree leaf size must be at least 1.
    InvalidLeafSize(usize),

    /// Monte Carlo sample budget is inconsistent (e.g., cap below initial batch).
    InvalidSampleBudget {
        /// Initial batch size.
        initial: usize,
        /// Hard cap on samples per node pair.
        cap: usize,
    },
}

// ============================================================================
// Display Implementation
// ============================================================================

impl Display for DualTreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::EmptyInput => write!(f, "Input point array is empty"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::RaggedInput { len, dim } => {
                write!(
                    f,
                    "Ragged input: {len} coordinates is not a multiple of dimension {dim}"
                )
            }
            Self::MismatchedInputs { expected, got } => {
                write!(f, "Length mismatch: expected {expected} elements, got {got}")
            }
            Self::InvalidNumericValue(s) => write!(f, "Invalid numeric value: {s}"),
            Self::InvalidRelativeError(tau) => {
                write!(f, "Invalid relative error: {tau} (must be >= 0 and finite)")
            }
            Self::InvalidProbability(p) => {
                write!(f, "Invalid probability: {p} (must be > 0 and <= 1)")
            }
            Self::InvalidBandwidth(h) => {
                write!(f, "Invalid bandwidth: {h} (must be > 0 and finite)")
            }
            Self::InvalidSoftening(eps) => {
                write!(f, "Invalid softening length: {eps} (must be > 0 and finite)")
            }
            Self::InvalidWeight { index, value } => {
                write!(
                    f,
                    "Invalid weight at index {index}: {value} (must be >= 0 and finite)"
                )
            }
            Self::InvalidLeafSize(size) => {
                write!(f, "Invalid leaf size: {size} (must be at least 1)")
            }
            Self::InvalidSampleBudget { initial, cap } => {
                write!(
                    f,
                    "Invalid sample budget: cap {cap} is below the initial batch size {initial}"
                )
            }
        }
    }
}

// ============================================================================
// Standard Error Trait
// ============================================================================

impl Error for DualTreeError {}
