use kdthree::{BalancedKdTree, LazyKdTree, SpatialIndex};
use rand::Rng;
use std::collections::HashSet;

fn random_cloud(count: usize, extent: f64) -> (Vec<[f64; 3]>, Vec<i32>) {
    let mut rng = rand::thread_rng();
    let positions = (0..count)
        .map(|_| {
            [
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
            ]
        })
        .collect();
    let ids = (0..count as i32).map(|i| i + 2000).collect();
    (positions, ids)
}

fn random_queries(count: usize, extent: f64) -> Vec<[f64; 3]> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            [
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
            ]
        })
        .collect()
}

fn sq_dist(p: [f64; 3], q: [f64; 3]) -> f64 {
    let dx = p[0] - q[0];
    let dy = p[1] - q[1];
    let dz = p[2] - q[2];
    dx * dx + dy * dy + dz * dz
}

fn answer_dist(
    index: &mut dyn SpatialIndex,
    positions: &[[f64; 3]],
    ids: &[i32],
    query: [f64; 3],
) -> f64 {
    let id = index.nearest(query);
    match ids.iter().position(|&other| other == id) {
        Some(at) => sq_dist(positions[at], query),
        None => f64::INFINITY, // sentinel: nothing live
    }
}

/// The lazy variant must converge to the same answers as the eager one; the
/// split threshold and the order in which queries force splits only change
/// the cost, never the result.
#[test]
fn test_lazy_matches_balanced() {
    let (positions, ids) = random_cloud(400, 80.0);
    let queries = random_queries(100, 90.0);

    let mut balanced = BalancedKdTree::new();
    balanced.build(positions.clone(), ids.clone());

    for threshold in [1, 2, 16, 10_000] {
        let mut lazy = LazyKdTree::with_threshold(threshold);
        lazy.build(positions.clone(), ids.clone());
        for &query in &queries {
            assert_eq!(
                answer_dist(&mut lazy, &positions, &ids, query),
                answer_dist(&mut balanced, &positions, &ids, query),
                "threshold {} disagrees at {:?}",
                threshold,
                query
            );
        }
    }
}

#[test]
fn test_query_order_does_not_change_answers() {
    let (positions, ids) = random_cloud(300, 60.0);
    let queries = random_queries(80, 70.0);

    let mut forward = LazyKdTree::with_threshold(4);
    forward.build(positions.clone(), ids.clone());
    let mut backward = LazyKdTree::with_threshold(4);
    backward.build(positions.clone(), ids.clone());

    // Walk the two trees through the same queries in opposite orders, so
    // their buckets split in a completely different sequence.
    let mut forward_dists: Vec<f64> = queries
        .iter()
        .map(|&q| answer_dist(&mut forward, &positions, &ids, q))
        .collect();
    let backward_dists: Vec<f64> = queries
        .iter()
        .rev()
        .map(|&q| answer_dist(&mut backward, &positions, &ids, q))
        .collect();

    forward_dists.reverse();
    assert_eq!(forward_dists, backward_dists);
}

#[test]
fn test_equivalence_with_interleaved_deletions() {
    let (positions, ids) = random_cloud(240, 40.0);

    let mut balanced = BalancedKdTree::new();
    balanced.build(positions.clone(), ids.clone());
    let mut lazy = LazyKdTree::with_threshold(8);
    lazy.build(positions.clone(), ids.clone());

    let mut rng = rand::thread_rng();
    let mut deleted = HashSet::new();

    for round in 0..6 {
        // Delete a few more points between query batches; both variants see
        // the same deletions.
        for _ in 0..round * 5 {
            let victim = ids[rng.gen_range(0..ids.len())];
            assert_eq!(balanced.delete(victim), lazy.delete(victim));
            deleted.insert(victim);
        }

        for &query in &random_queries(25, 50.0) {
            let balanced_id = balanced.nearest(query);
            let lazy_id = lazy.nearest(query);
            assert!(!deleted.contains(&balanced_id));
            assert!(!deleted.contains(&lazy_id));
            assert_eq!(
                answer_dist(&mut balanced, &positions, &ids, query),
                answer_dist(&mut lazy, &positions, &ids, query),
                "variants disagree at {:?} in round {}",
                query,
                round
            );
        }
    }
}
