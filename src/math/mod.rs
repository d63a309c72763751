//! Layer 2: Math
//!
//! # Purpose
//!
//! This layer provides the mathematical building blocks of the dual-tree
//! algorithms:
//! - Kernel and potential functions with value-range evaluation
//! - Statistical confidence machinery for Monte Carlo pruning
//!
//! These are reusable mathematical components with no traversal logic.
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Methods
//!   ↓
//! Layer 4: Engine
//!   ↓
//! Layer 3: Tree
//!   ↓
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Kernel and potential functions.
pub mod kernel;

/// Inverse normal CDF and order-statistics coverage probabilities.
pub mod confidence;
