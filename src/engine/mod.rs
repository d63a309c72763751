//! Layer 4: Engine
//!
//! # Purpose
//!
//! This layer is the dual-tree pruning and traversal engine: per-node bound
//! statistics with postponed-delta bookkeeping, the pruning oracle
//! (deterministic and Monte Carlo), the recursive traversal with its
//! nearest-child-first ordering heuristic, and the accumulator pre/post
//! passes that initialize and finalize per-query results.
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Methods
//!   ↓
//! Layer 4: Engine ← You are here
//!   ↓
//! Layer 3: Tree
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Per-node bound statistics and reference aggregates.
pub mod stat;

/// Per-query accumulators and the pre/post passes.
pub mod accumulator;

/// Engine configuration and orchestration.
pub mod executor;

/// Pruning oracle: deterministic and Monte Carlo checks.
pub mod prune;

/// The dual-tree recursion.
pub mod traversal;

/// Result types and traversal counters.
pub mod output;

/// Input and parameter validation.
pub mod validator;
