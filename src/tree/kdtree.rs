//! Midpoint-split kd-tree.
//!
//! ## Purpose
//!
//! This module builds the spatial tree the engine traverses. Construction
//! reorders the point set in place so that every node owns a contiguous
//! index range `[begin, end)`; a permutation mapping tree order back to the
//! caller's order is recorded so drivers can unpermute their results.
//!
//! ## Design notes
//!
//! * **Midpoint split**: each internal node splits its widest axis at the
//!   midpoint of its bounding interval. Both sides are guaranteed non-empty
//!   because the extreme points fall on opposite sides of the midpoint.
//! * **Arena storage**: nodes live in a flat `Vec` and refer to children by
//!   index. Algorithm state (bound statistics) lives in parallel arenas
//!   indexed by the same node ids, so the tree itself stays immutable during
//!   traversal.
//! * **No parent pointers**: traversal is strictly top-down.
//!
//! ## Invariants
//!
//! * A node's children partition its index range exactly.
//! * Every point in a node's range lies inside the node's bound.
//! * Leaves hold at most `leaf_size` points unless the range is degenerate
//!   (zero-width bound).
//!
//! ## Non-goals
//!
//! * This module does not rebalance or support insertion/removal.
//! * This module does not compute algorithm-specific node statistics.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::points::PointSet;
use crate::tree::bound::RectBound;

// ============================================================================
// Node
// ============================================================================

/// A kd-tree node: a contiguous index range, a bounding rectangle, and
/// either two children or none.
#[derive(Debug, Clone)]
pub struct KdNode<T> {
    begin: usize,
    count: usize,
    bound: RectBound<T>,
    children: Option<(usize, usize)>,
}

impl<T: Float> KdNode<T> {
    /// First point index owned by the node.
    #[inline]
    pub fn begin(&self) -> usize {
        self.begin
    }

    /// One past the last point index owned by the node.
    #[inline]
    pub fn end(&self) -> usize {
        self.begin + self.count
    }

    /// Number of points owned by the node.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether the node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Node id of the left child. Panics on leaves.
    #[inline]
    pub fn left(&self) -> usize {
        self.children.expect("left() called on a leaf").0
    }

    /// Node id of the right child. Panics on leaves.
    #[inline]
    pub fn right(&self) -> usize {
        self.children.expect("right() called on a leaf").1
    }

    /// Bounding rectangle of the node's points.
    #[inline]
    pub fn bound(&self) -> &RectBound<T> {
        &self.bound
    }
}

// ============================================================================
// Tree
// ============================================================================

/// A kd-tree over an owned, reordered point set.
#[derive(Debug, Clone)]
pub struct KdTree<T> {
    nodes: Vec<KdNode<T>>,
    points: PointSet<T>,
    old_from_new: Vec<usize>,
}

/// Id of the root node in every tree arena.
pub const ROOT: usize = 0;

impl<T: Float> KdTree<T> {
    /// Build a tree over `points`, reordering them in place.
    ///
    /// `leaf_size` is the maximum number of points a node may hold without
    /// being split (degenerate ranges excepted).
    pub fn build(mut points: PointSet<T>, leaf_size: usize) -> Self {
        debug_assert!(leaf_size >= 1);
        let n = points.len();
        let mut old_from_new: Vec<usize> = (0..n).collect();
        let mut nodes = Vec::new();

        build_range(
            &mut points,
            &mut old_from_new,
            &mut nodes,
            0,
            n,
            leaf_size,
        );

        Self {
            nodes,
            points,
            old_from_new,
        }
    }

    /// Node lookup by id.
    #[inline]
    pub fn node(&self, id: usize) -> &KdNode<T> {
        &self.nodes[id]
    }

    /// Number of nodes in the arena.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// The reordered point set the tree was built over.
    #[inline]
    pub fn points(&self) -> &PointSet<T> {
        &self.points
    }

    /// `old_from_new[i]` is the caller-order index of the point now stored
    /// at tree position `i`.
    #[inline]
    pub fn old_from_new(&self) -> &[usize] {
        &self.old_from_new
    }

    /// Scatter a tree-ordered value slice back into caller order.
    pub fn unpermute<V: Copy>(&self, tree_ordered: &[V], fill: V) -> Vec<V> {
        let mut out = vec![fill; tree_ordered.len()];
        for (i, &v) in tree_ordered.iter().enumerate() {
            out[self.old_from_new[i]] = v;
        }
        out
    }
}

/// Recursively build the subtree over `[begin, end)`; returns the node id.
fn build_range<T: Float>(
    points: &mut PointSet<T>,
    old_from_new: &mut [usize],
    nodes: &mut Vec<KdNode<T>>,
    begin: usize,
    end: usize,
    leaf_size: usize,
) -> usize {
    let mut bound = RectBound::empty(points.dim());
    for i in begin..end {
        bound.extend(points.point(i));
    }

    let id = nodes.len();
    nodes.push(KdNode {
        begin,
        count: end - begin,
        bound,
        children: None,
    });

    let count = end - begin;
    if count <= leaf_size {
        return id;
    }
    let (split_dim, width) = nodes[id].bound.widest_dim();
    if width <= T::zero() {
        // All points coincide; splitting cannot make progress.
        return id;
    }
    let split_val = nodes[id].bound.get(split_dim).mid();

    // Hoare-style partition: points < split_val to the left.
    let mut left = begin;
    let mut right = end - 1;
    loop {
        while left <= right && points.coord(left, split_dim) < split_val {
            left += 1;
        }
        while right > left && points.coord(right, split_dim) >= split_val {
            right -= 1;
        }
        if left >= right {
            break;
        }
        points.swap_points(left, right);
        old_from_new.swap(left, right);
    }
    let mid = left;
    if mid == begin || mid == end {
        // Numerically degenerate split (width underflow); keep the leaf.
        return id;
    }

    let left_id = build_range(points, old_from_new, nodes, begin, mid, leaf_size);
    let right_id = build_range(points, old_from_new, nodes, mid, end, leaf_size);
    nodes[id].children = Some((left_id, right_id));
    id
}
