//! Axis-aligned hyperrectangle bounds.
//!
//! ## Purpose
//!
//! This module provides `RectBound`, the bounding region attached to every
//! kd-tree node. The pruning oracle needs exactly two queries from a pair of
//! bounds: the smallest and the largest squared distance any point of one
//! region can have to any point of the other.
//!
//! ## Key concepts
//!
//! * **Minimum distance**: per-dimension gap between the rectangles, zero
//!   where they overlap, summed in squares.
//! * **Maximum distance**: per-dimension farthest corner separation, summed
//!   in squares.
//!
//! ## Invariants
//!
//! * For any points `q` inside `a` and `r` inside `b`:
//!   `a.min_distance_sq(&b) <= ||q - r||^2 <= a.max_distance_sq(&b)`.
//! * `min_distance_sq` of a bound with itself is zero.
//!
//! ## Non-goals
//!
//! * This module does not support ball or oblique bounds.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::interval::Interval;

// ============================================================================
// RectBound
// ============================================================================

/// Axis-aligned bounding hyperrectangle: one closed interval per dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct RectBound<T> {
    dims: Vec<Interval<T>>,
}

impl<T: Float> RectBound<T> {
    /// An empty bound in `dim` dimensions; extending with the first point
    /// collapses every axis interval onto that point.
    pub fn empty(dim: usize) -> Self {
        Self {
            dims: vec![Interval::empty(); dim],
        }
    }

    /// Dimensionality.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dims.len()
    }

    /// Interval spanned along axis `d`.
    #[inline]
    pub fn get(&self, d: usize) -> &Interval<T> {
        &self.dims[d]
    }

    /// Grow the bound to contain `point`.
    pub fn extend(&mut self, point: &[T]) {
        for (iv, &x) in self.dims.iter_mut().zip(point.iter()) {
            iv.extend(x);
        }
    }

    /// Whether `point` lies inside the bound.
    pub fn contains(&self, point: &[T]) -> bool {
        self.dims
            .iter()
            .zip(point.iter())
            .all(|(iv, &x)| iv.contains(x))
    }

    /// Width of the widest axis and its index.
    pub fn widest_dim(&self) -> (usize, T) {
        let mut best = (0, T::neg_infinity());
        for (d, iv) in self.dims.iter().enumerate() {
            let w = iv.width();
            if w > best.1 {
                best = (d, w);
            }
        }
        best
    }

    /// Smallest possible squared distance between a point of `self` and a
    /// point of `other`.
    pub fn min_distance_sq(&self, other: &Self) -> T {
        let mut acc = T::zero();
        for (a, b) in self.dims.iter().zip(other.dims.iter()) {
            // Gap along this axis; zero when the projections overlap.
            let gap = (a.lo - b.hi).max(b.lo - a.hi).max(T::zero());
            acc = acc + gap * gap;
        }
        acc
    }

    /// Largest possible squared distance between a point of `self` and a
    /// point of `other`.
    pub fn max_distance_sq(&self, other: &Self) -> T {
        let mut acc = T::zero();
        for (a, b) in self.dims.iter().zip(other.dims.iter()) {
            let span = (a.hi - b.lo).max(b.hi - a.lo);
            acc = acc + span * span;
        }
        acc
    }

    /// Squared-distance range between the two bounds.
    pub fn distance_sq_range(&self, other: &Self) -> Interval<T> {
        Interval::new(self.min_distance_sq(other), self.max_distance_sq(other))
    }
}
