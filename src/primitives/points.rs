//! Flat storage for D-dimensional point sets.
//!
//! ## Purpose
//!
//! This module provides `PointSet`, the crate's storage for an indexed,
//! ordered sequence of D-dimensional coordinate vectors. Points are stored
//! row-major in a single flat vector for cache-friendly sequential access
//! during base-case evaluation and tree construction.
//!
//! ## Design notes
//!
//! * **Reordering**: The kd-tree builder permutes points in place so that
//!   every tree node owns a contiguous index range. `PointSet` exposes the
//!   swap primitive the builder needs.
//! * **Generics**: Generic over `Float` to support f32 and f64.
//!
//! ## Invariants
//!
//! * `coords.len() == len * dim`.
//! * `dim >= 1` for any non-empty set.
//!
//! ## Non-goals
//!
//! * This module does not validate finiteness (handled by the validator).
//! * This module does not own per-point weights; those travel separately.

// External dependencies
use num_traits::Float;

// ============================================================================
// PointSet
// ============================================================================

/// An indexed set of D-dimensional points in flat row-major storage.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet<T> {
    coords: Vec<T>,
    dim: usize,
    len: usize,
}

impl<T: Float> PointSet<T> {
    /// Build a point set from a flat row-major coordinate slice.
    ///
    /// The slice length must be a multiple of `dim`; the caller validates.
    pub fn from_flat(coords: &[T], dim: usize) -> Self {
        debug_assert!(dim > 0);
        debug_assert_eq!(coords.len() % dim, 0);
        Self {
            coords: coords.to_vec(),
            dim,
            len: coords.len() / dim,
        }
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the set holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Dimensionality of each point.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Coordinate slice of the `i`-th point.
    #[inline]
    pub fn point(&self, i: usize) -> &[T] {
        &self.coords[i * self.dim..(i + 1) * self.dim]
    }

    /// Single coordinate of the `i`-th point.
    #[inline]
    pub fn coord(&self, i: usize, d: usize) -> T {
        self.coords[i * self.dim + d]
    }

    /// Swap two points in place. Used by the tree builder while partitioning.
    pub fn swap_points(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        for d in 0..self.dim {
            self.coords.swap(i * self.dim + d, j * self.dim + d);
        }
    }

    /// Squared Euclidean distance between point `i` of `self` and point `j`
    /// of `other`. Both sets must share the same dimensionality.
    #[inline]
    pub fn distance_sq_to(&self, i: usize, other: &Self, j: usize) -> T {
        distance_sq(self.point(i), other.point(j))
    }
}

/// Squared Euclidean distance between two coordinate slices.
#[inline]
pub fn distance_sq<T: Float>(a: &[T], b: &[T]) -> T {
    let mut acc = T::zero();
    for (&x, &y) in a.iter().zip(b.iter()) {
        let diff = x - y;
        acc = acc + diff * diff;
    }
    acc
}
