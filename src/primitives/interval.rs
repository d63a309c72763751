//! Closed interval arithmetic.
//!
//! ## Purpose
//!
//! This module provides a closed interval `[lo, hi]` used for distance-squared
//! ranges between bounding regions and for kernel value ranges. The pruning
//! oracle works entirely in interval arithmetic: a node pair's possible
//! separation is an interval, and the kernel maps it (monotonically) to an
//! interval of possible interaction values.
//!
//! ## Invariants
//!
//! * `lo <= hi` for every interval produced by this crate's operations.
//!   Degenerate (empty) intervals are represented by the inverted pair
//!   produced by [`Interval::empty`] and repaired by the first `extend`.
//!
//! ## Non-goals
//!
//! * This module does not implement open/half-open interval semantics.
//! * This module does not guard against NaN endpoints; callers validate.

// External dependencies
use num_traits::Float;

// ============================================================================
// Interval
// ============================================================================

/// A closed interval `[lo, hi]` over a floating-point type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval<T> {
    /// Lower endpoint.
    pub lo: T,

    /// Upper endpoint.
    pub hi: T,
}

impl<T: Float> Interval<T> {
    /// Create an interval from explicit endpoints.
    #[inline]
    pub fn new(lo: T, hi: T) -> Self {
        Self { lo, hi }
    }

    /// The empty interval: `lo = +inf`, `hi = -inf`.
    ///
    /// Extending the empty interval with any value yields the singleton
    /// interval at that value.
    #[inline]
    pub fn empty() -> Self {
        Self {
            lo: T::infinity(),
            hi: T::neg_infinity(),
        }
    }

    /// Width of the interval, `hi - lo`.
    #[inline]
    pub fn width(&self) -> T {
        self.hi - self.lo
    }

    /// Midpoint of the interval.
    #[inline]
    pub fn mid(&self) -> T {
        let half = T::from(0.5).unwrap_or_else(|| T::one() / (T::one() + T::one()));
        (self.lo + self.hi) * half
    }

    /// Whether the interval contains `value`.
    #[inline]
    pub fn contains(&self, value: T) -> bool {
        self.lo <= value && value <= self.hi
    }

    /// Grow the interval to include `value`.
    #[inline]
    pub fn extend(&mut self, value: T) {
        if value < self.lo {
            self.lo = value;
        }
        if value > self.hi {
            self.hi = value;
        }
    }
}
