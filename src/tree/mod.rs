//! Layer 3: Tree
//!
//! # Purpose
//!
//! This layer provides the spatial partitioning structures consumed by the
//! engine: axis-aligned bounding rectangles with distance-range queries,
//! and a midpoint-split kd-tree whose nodes own contiguous index ranges of
//! a reordered point set.
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
//! Layer 3: Tree ← You are here
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Axis-aligned hyperrectangle bounds.
pub mod bound;

/// Midpoint-split kd-tree.
pub mod kdtree;
