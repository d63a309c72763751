//! Tests for Euclidean minimum spanning tree construction.
//!
//! These tests verify:
//! - Edge count and spanning connectivity
//! - Total weight agreement with a Prim reference implementation
//! - Edge index normalization (`lesser < greater`, caller's indices)
//! - Degenerate inputs and leaf-size independence

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use dualtree::api::Emst;
use dualtree::primitives::points::PointSet;
use dualtree::primitives::union_find::UnionFind;

fn random_points(n: usize, dim: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n * dim).map(|_| rng.gen_range(-10.0..10.0)).collect()
}

/// Total MST weight by Prim's algorithm, quadratic scan.
fn prim_total_weight(points: &[f64], dim: usize) -> f64 {
    let ps = PointSet::from_flat(points, dim);
    let n = ps.len();
    let mut in_tree = vec![false; n];
    let mut best = vec![f64::INFINITY; n];
    best[0] = 0.0;
    let mut total = 0.0;

    for _ in 0..n {
        let mut next = usize::MAX;
        for v in 0..n {
            if !in_tree[v] && (next == usize::MAX || best[v] < best[next]) {
                next = v;
            }
        }
        in_tree[next] = true;
        total += best[next].sqrt();
        for v in 0..n {
            if !in_tree[v] {
                let d = ps.distance_sq_to(next, &ps, v);
                if d < best[v] {
                    best[v] = d;
                }
            }
        }
    }
    total
}

/// Whether the edge list connects all `n` points.
fn spans(n: usize, edges: &[(usize, usize)]) -> bool {
    let mut parent: Vec<usize> = (0..n).collect();
    fn find(parent: &mut Vec<usize>, mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }
    let mut components = n;
    for &(a, b) in edges {
        let (ra, rb) = (find(&mut parent, a), find(&mut parent, b));
        if ra != rb {
            parent[ra] = rb;
            components -= 1;
        }
    }
    components == 1
}

// ============================================================================
// Correctness
// ============================================================================

/// Fifty random points: n-1 edges, spanning, Prim-matching total weight.
#[test]
fn matches_prim_on_random_points() {
    let points = random_points(50, 2, 31);

    let result = Emst::new().build().unwrap().compute(&points, 2).unwrap();

    assert_eq!(result.len(), 49);
    let edges: Vec<(usize, usize)> = result.edges.iter().map(|e| (e.lesser, e.greater)).collect();
    assert!(spans(50, &edges));

    let want = prim_total_weight(&points, 2);
    assert!((result.total_length - want).abs() <= 1e-9 * want);
}

/// Higher dimensions and a larger set still agree with Prim.
#[test]
fn matches_prim_in_three_dimensions() {
    let points = random_points(200, 3, 32);

    let result = Emst::new().build().unwrap().compute(&points, 3).unwrap();

    assert_eq!(result.len(), 199);
    let want = prim_total_weight(&points, 3);
    assert!((result.total_length - want).abs() <= 1e-9 * want);
    assert!(result.counters.rounds >= 1);
}

/// Edge endpoints are normalized and lengths match the point geometry.
#[test]
fn edges_use_caller_indices() {
    let points = random_points(80, 2, 33);
    let ps = PointSet::from_flat(&points, 2);

    let result = Emst::new().build().unwrap().compute(&points, 2).unwrap();

    for edge in &result.edges {
        assert!(edge.lesser < edge.greater);
        assert!(edge.greater < 80);
        let d = ps.distance_sq_to(edge.lesser, &ps, edge.greater).sqrt();
        assert!((edge.length - d).abs() <= 1e-12 * d.max(1.0));
    }
    let total: f64 = result.edges.iter().map(|e| e.length).sum();
    assert!((result.total_length - total).abs() <= 1e-9 * total.max(1.0));
}

/// The leaf size changes the search schedule, never the tree.
#[test]
fn leaf_size_does_not_change_result() {
    let points = random_points(120, 2, 34);

    let fine = Emst::new().build().unwrap().compute(&points, 2).unwrap();
    let coarse = Emst::new()
        .leaf_size(10)
        .build()
        .unwrap()
        .compute(&points, 2)
        .unwrap();

    let want = prim_total_weight(&points, 2);
    assert!((fine.total_length - want).abs() <= 1e-9 * want);
    assert!((coarse.total_length - want).abs() <= 1e-9 * want);
    assert_eq!(fine.len(), coarse.len());
}

// ============================================================================
// Degenerate Inputs
// ============================================================================

/// A single point has an empty spanning tree.
#[test]
fn single_point() {
    let result = Emst::new().build().unwrap().compute(&[1.0, 2.0], 2).unwrap();

    assert!(result.is_empty());
    assert_eq!(result.total_length, 0.0);
}

/// Two points produce exactly their connecting segment.
#[test]
fn two_points() {
    let points: [f64; 4] = [0.0, 0.0, 3.0, 4.0];

    let result = Emst::new().build().unwrap().compute(&points, 2).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.edges[0].lesser, 0);
    assert_eq!(result.edges[0].greater, 1);
    assert!((result.edges[0].length - 5.0).abs() <= 1e-12);
}

/// Collinear points chain along the line.
#[test]
fn collinear_points() {
    // 1-D points at 0, 1, 3, 6: gaps 1, 2, 3.
    let points: [f64; 4] = [0.0, 1.0, 3.0, 6.0];

    let result = Emst::new().build().unwrap().compute(&points, 1).unwrap();

    assert_eq!(result.len(), 3);
    assert!((result.total_length - 6.0).abs() <= 1e-12);
}

// ============================================================================
// Union-Find
// ============================================================================

/// Fresh sets are singletons; unions merge exactly once.
#[test]
fn union_find_merging() {
    let mut uf = UnionFind::new(6);
    assert_eq!(uf.len(), 6);
    for i in 0..6 {
        assert_eq!(uf.find(i), i);
    }

    assert!(uf.union(0, 1));
    assert!(uf.union(2, 3));
    assert!(!uf.union(1, 0));
    assert_eq!(uf.find(0), uf.find(1));
    assert_ne!(uf.find(1), uf.find(2));

    assert!(uf.union(1, 3));
    for pair in [(0, 2), (0, 3), (1, 2)] {
        assert_eq!(uf.find(pair.0), uf.find(pair.1));
    }
    assert_ne!(uf.find(4), uf.find(0));
    assert_ne!(uf.find(4), uf.find(5));
}

/// A chain of unions collapses to one component.
#[test]
fn union_find_chain() {
    let mut uf = UnionFind::new(100);
    for i in 0..99 {
        assert!(uf.union(i, i + 1));
    }
    let root = uf.find(0);
    for i in 1..100 {
        assert_eq!(uf.find(i), root);
    }
}

/// Duplicate coordinates join with zero-length edges.
#[test]
fn duplicate_points() {
    let points = [1.0, 1.0, 1.0, 1.0, 4.0, 5.0];

    let result = Emst::new().build().unwrap().compute(&points, 2).unwrap();

    assert_eq!(result.len(), 2);
    let mut lengths: Vec<f64> = result.edges.iter().map(|e| e.length).collect();
    lengths.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(lengths[0], 0.0);
    assert!((lengths[1] - 5.0).abs() <= 1e-12);
}
