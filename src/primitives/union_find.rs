//! Disjoint-set forest for component tracking.
//!
//! ## Purpose
//!
//! This module provides the union-find structure used by the dual-tree
//! Boruvka algorithm to track which spanning-tree component each point
//! belongs to between rounds.
//!
//! ## Design notes
//!
//! * **Path compression** on `find` and **union by rank** give effectively
//!   constant amortized operations.
//! * `find` takes `&mut self` because path compression rewrites parents;
//!   the Boruvka driver owns the structure exclusively.
//!
//! ## Invariants
//!
//! * Every index in `0..len` is always a member of exactly one set.
//! * `union(a, b)` followed by `find(a) == find(b)`.

// ============================================================================
// UnionFind
// ============================================================================

/// Disjoint-set forest over indices `0..len`.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl UnionFind {
    /// Create `len` singleton sets.
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    /// Number of elements (not components).
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Whether the structure is empty.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of the set containing `i`, with path compression.
    pub fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Second pass: point every node on the path at the root.
        let mut node = i;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merge the sets containing `a` and `b`. Returns `true` if they were
    /// previously distinct.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}
