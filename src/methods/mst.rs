//! Euclidean minimum spanning tree via dual-tree Boruvka.
//!
//! ## Purpose
//!
//! This module computes the exact Euclidean MST of a point set. Each
//! Boruvka round finds, for every spanning-forest component, its nearest
//! neighboring point in a different component, using a dual-tree search
//! with two prunes:
//!
//! * **Distance prune**: a query node whose every component already has a
//!   candidate nearer than the incoming node-pair distance cannot improve.
//! * **Component prune**: a node pair fully inside one component cannot
//!   contribute an inter-component edge.
//!
//! All found edges are added at once, components are merged, and per-node
//! state is rebuilt; at most `log2(n)` rounds reach the full tree.
//!
//! ## Key concepts
//!
//! * Candidate distances are kept **squared** throughout the search; edges
//!   are emitted with Euclidean lengths.
//! * Component membership is tracked per point by union-find and summarized
//!   per node (`Some(root)` when every point below shares a component).
//!
//! ## Invariants
//!
//! * The result has exactly `n - 1` edges connecting all `n` points.
//! * Every emitted edge has `lesser < greater` in the caller's indices.

// External dependencies
use num_traits::Float;

// Standard library dependencies
use std::fmt;

// Internal dependencies
use crate::engine::validator::Validator;
use crate::primitives::errors::DualTreeError;
use crate::primitives::points::PointSet;
use crate::primitives::union_find::UnionFind;
use crate::tree::kdtree::{KdTree, ROOT};

// ============================================================================
// Result Types
// ============================================================================

/// One spanning-tree edge in the caller's point indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MstEdge<T> {
    /// Smaller endpoint index.
    pub lesser: usize,
    /// Larger endpoint index.
    pub greater: usize,
    /// Euclidean length.
    pub length: T,
}

/// How a Boruvka run spent its node-pair visits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MstCounters {
    pub distance_prunes: u64,
    pub component_prunes: u64,
    pub leaf_computations: u64,
    pub query_recursions: u64,
    pub reference_recursions: u64,
    pub both_recursions: u64,
    /// Boruvka rounds until the forest became a tree.
    pub rounds: u64,
}

impl fmt::Display for MstCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rounds: {}, distance prunes: {}, component prunes: {}, leaf computations: {}",
            self.rounds, self.distance_prunes, self.component_prunes, self.leaf_computations
        )
    }
}

/// A completed minimum spanning tree.
#[derive(Debug, Clone)]
pub struct MstResult<T> {
    /// The `n - 1` edges, in discovery order.
    pub edges: Vec<MstEdge<T>>,
    /// Sum of the edge lengths.
    pub total_length: T,
    /// Search statistics.
    pub counters: MstCounters,
}

impl<T: Float> MstResult<T> {
    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the tree has no edges (single-point input).
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

// ============================================================================
// Per-Node Search State
// ============================================================================

/// Mutable per-node state, rebuilt every Boruvka round.
#[derive(Debug, Clone, Copy)]
struct NodeState<T> {
    /// Upper bound on the candidate distances (squared) of the components
    /// under this node; infinity when unknown.
    max_neighbor_distance: T,
    /// Component shared by every point under this node, if any.
    component: Option<usize>,
}

// ============================================================================
// Dual-Tree Boruvka
// ============================================================================

/// The Boruvka search over one kd-tree.
pub struct DualTreeBoruvka<T> {
    tree: KdTree<T>,
    states: Vec<NodeState<T>>,
    connections: UnionFind,
    /// Per-component candidate edge, indexed by the component's union-find
    /// representative (a tree-order point index). Distances are squared.
    candidate_distance: Vec<T>,
    candidate_in: Vec<usize>,
    candidate_out: Vec<usize>,
    /// Accepted edges as (tree index, tree index, squared distance).
    edges: Vec<(usize, usize, T)>,
    counters: MstCounters,
}

/// Sentinel for an unset candidate endpoint.
const UNSET: usize = usize::MAX;

impl<T: Float> DualTreeBoruvka<T> {
    /// Validate the input and build the search tree.
    pub fn new(points: &[T], dim: usize, leaf_size: usize) -> Result<Self, DualTreeError> {
        Validator::validate_points(points, dim)?;
        Validator::validate_leaf_size(leaf_size)?;

        let tree = KdTree::build(PointSet::from_flat(points, dim), leaf_size);
        let n = tree.points().len();
        let num_nodes = tree.num_nodes();

        Ok(Self {
            tree,
            states: vec![
                NodeState {
                    max_neighbor_distance: T::infinity(),
                    component: None,
                };
                num_nodes
            ],
            connections: UnionFind::new(n),
            candidate_distance: vec![T::infinity(); n],
            candidate_in: vec![UNSET; n],
            candidate_out: vec![UNSET; n],
            edges: Vec::with_capacity(n.saturating_sub(1)),
            counters: MstCounters::default(),
        })
    }

    /// Run Boruvka rounds until the forest is a tree, then emit edges in
    /// the caller's indices with Euclidean lengths.
    pub fn compute(mut self) -> MstResult<T> {
        let n = self.tree.points().len();

        while self.edges.len() + 1 < n {
            self.compute_neighbors(ROOT, ROOT, T::infinity());
            self.add_all_edges();
            self.cleanup();
            self.counters.rounds += 1;
        }

        let old_from_new = self.tree.old_from_new();
        let mut edges = Vec::with_capacity(self.edges.len());
        let mut total_length = T::zero();
        for &(a, b, dist_sq) in &self.edges {
            let (ia, ib) = (old_from_new[a], old_from_new[b]);
            let (lesser, greater) = if ia < ib { (ia, ib) } else { (ib, ia) };
            let length = dist_sq.sqrt();
            total_length = total_length + length;
            edges.push(MstEdge {
                lesser,
                greater,
                length,
            });
        }

        MstResult {
            edges,
            total_length,
            counters: self.counters,
        }
    }

    /// One round's recursive nearest-neighbor search over node pairs.
    fn compute_neighbors(&mut self, qid: usize, rid: usize, incoming_distance: T) {
        if self.states[qid].max_neighbor_distance < incoming_distance {
            self.counters.distance_prunes += 1;
            return;
        }
        if self.states[qid].component.is_some()
            && self.states[qid].component == self.states[rid].component
        {
            self.counters.component_prunes += 1;
            return;
        }

        let qnode = self.tree.node(qid);
        let rnode = self.tree.node(rid);
        let (q_leaf, r_leaf) = (qnode.is_leaf(), rnode.is_leaf());

        if q_leaf && r_leaf {
            let (qb, qe) = (qnode.begin(), qnode.end());
            let (rb, re) = (rnode.begin(), rnode.end());
            let new_bound = self.base_case(qb, qe, rb, re);
            self.states[qid].max_neighbor_distance = new_bound;
            self.counters.leaf_computations += 1;
        } else if q_leaf {
            // Expand the reference node only, nearest child first.
            self.counters.reference_recursions += 1;
            let (rl, rr) = (rnode.left(), rnode.right());
            let left_dist = qnode.bound().min_distance_sq(self.tree.node(rl).bound());
            let right_dist = qnode.bound().min_distance_sq(self.tree.node(rr).bound());

            if left_dist < right_dist {
                self.compute_neighbors(qid, rl, left_dist);
                self.compute_neighbors(qid, rr, right_dist);
            } else {
                self.compute_neighbors(qid, rr, right_dist);
                self.compute_neighbors(qid, rl, left_dist);
            }
        } else if r_leaf {
            // Expand the query node only.
            self.counters.query_recursions += 1;
            let (ql, qr) = (qnode.left(), qnode.right());
            let left_dist = self.tree.node(ql).bound().min_distance_sq(rnode.bound());
            let right_dist = self.tree.node(qr).bound().min_distance_sq(rnode.bound());

            self.compute_neighbors(ql, rid, left_dist);
            self.compute_neighbors(qr, rid, right_dist);

            self.states[qid].max_neighbor_distance = self.states[ql]
                .max_neighbor_distance
                .max(self.states[qr].max_neighbor_distance);
        } else {
            // Expand both, nearest reference child first per query child.
            self.counters.both_recursions += 1;
            let (ql, qr) = (qnode.left(), qnode.right());
            let (rl, rr) = (rnode.left(), rnode.right());
            let ql_bound = self.tree.node(ql).bound();
            let qr_bound = self.tree.node(qr).bound();
            let ll = ql_bound.min_distance_sq(self.tree.node(rl).bound());
            let lr = ql_bound.min_distance_sq(self.tree.node(rr).bound());
            let rl_dist = qr_bound.min_distance_sq(self.tree.node(rl).bound());
            let rr_dist = qr_bound.min_distance_sq(self.tree.node(rr).bound());

            if ll < lr {
                self.compute_neighbors(ql, rl, ll);
                self.compute_neighbors(ql, rr, lr);
            } else {
                self.compute_neighbors(ql, rr, lr);
                self.compute_neighbors(ql, rl, ll);
            }
            if rl_dist < rr_dist {
                self.compute_neighbors(qr, rl, rl_dist);
                self.compute_neighbors(qr, rr, rr_dist);
            } else {
                self.compute_neighbors(qr, rr, rr_dist);
                self.compute_neighbors(qr, rl, rl_dist);
            }

            self.states[qid].max_neighbor_distance = self.states[ql]
                .max_neighbor_distance
                .max(self.states[qr].max_neighbor_distance);
        }
    }

    /// Exhaustive scan of a leaf pair; returns the new upper bound on the
    /// query leaf's candidate distances.
    fn base_case(&mut self, qb: usize, qe: usize, rb: usize, re: usize) -> T {
        let mut new_upper_bound = T::neg_infinity();

        for q in qb..qe {
            let q_component = self.connections.find(q);

            for r in rb..re {
                let r_component = self.connections.find(r);
                if q_component == r_component {
                    continue;
                }
                let dist_sq = self.tree.points().distance_sq_to(q, self.tree.points(), r);
                if dist_sq < self.candidate_distance[q_component] {
                    self.candidate_distance[q_component] = dist_sq;
                    self.candidate_in[q_component] = q;
                    self.candidate_out[q_component] = r;
                }
            }

            new_upper_bound = new_upper_bound.max(self.candidate_distance[q_component]);
        }

        new_upper_bound
    }

    /// Commit every component's candidate edge, merging components as
    /// edges are accepted.
    fn add_all_edges(&mut self) {
        let n = self.tree.points().len();
        for i in 0..n {
            let component = self.connections.find(i);
            let in_point = self.candidate_in[component];
            let out_point = self.candidate_out[component];
            if in_point == UNSET || out_point == UNSET {
                continue;
            }
            // A candidate recorded earlier this round may have been
            // absorbed by a merge already.
            if self.connections.find(in_point) == self.connections.find(out_point) {
                continue;
            }
            let dist_sq = self.candidate_distance[component];
            self.edges.push((in_point, out_point, dist_sq));
            self.connections.union(in_point, out_point);
        }
    }

    /// Reset per-round state and rebuild the per-node component summaries.
    fn cleanup(&mut self) {
        for i in 0..self.candidate_distance.len() {
            self.candidate_distance[i] = T::infinity();
            self.candidate_in[i] = UNSET;
            self.candidate_out[i] = UNSET;
        }
        self.cleanup_node(ROOT);
    }

    fn cleanup_node(&mut self, id: usize) {
        self.states[id].max_neighbor_distance = T::infinity();

        let node = self.tree.node(id);
        if node.is_leaf() {
            let (begin, end) = (node.begin(), node.end());
            let membership = self.connections.find(begin);
            for i in begin..end {
                if self.connections.find(i) != membership {
                    self.states[id].component = None;
                    return;
                }
            }
            self.states[id].component = Some(membership);
        } else {
            let (l, r) = (node.left(), node.right());
            self.cleanup_node(l);
            self.cleanup_node(r);

            self.states[id].component = match (self.states[l].component, self.states[r].component)
            {
                (Some(a), Some(b)) if a == b => Some(a),
                _ => None,
            };
        }
    }
}
