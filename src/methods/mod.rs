//! Layer 5: Methods
//!
//! # Purpose
//!
//! This layer hosts the concrete algorithms built on the engine and the
//! tree: kernel density estimation (fixed and variable bandwidth), Plummer
//! N-body potential summation, and Euclidean minimum spanning tree
//! construction via dual-tree Boruvka.
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Methods ← You are here
//!   ↓
//! Layer 4: Engine
//!   ↓
//! Layer 3: Tree
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Kernel density estimation drivers.
pub mod kde;

/// N-body potential summation driver.
pub mod nbody;

/// Euclidean minimum spanning tree via dual-tree Boruvka.
pub mod mst;
