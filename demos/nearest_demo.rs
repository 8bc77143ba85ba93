use kdthree::{BalancedKdTree, LazyKdTree, NO_POINT, SpatialIndex};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::time::Instant;

const COUNT: usize = 100_000;
const EXTENT: f64 = 100.0;

fn main() {
    let mut rng = StdRng::seed_from_u64(123456789);
    let positions: Vec<[f64; 3]> = (0..COUNT)
        .map(|_| {
            [
                rng.r#gen::<f64>() * EXTENT,
                rng.r#gen::<f64>() * EXTENT,
                rng.r#gen::<f64>() * EXTENT,
            ]
        })
        .collect();
    let ids: Vec<i32> = (0..COUNT as i32).collect();
    let query = [EXTENT / 2.0, EXTENT / 2.0, EXTENT / 2.0];

    // Brute-force reference scan.
    let start = Instant::now();
    let mut best = NO_POINT;
    let mut best_sq = f64::INFINITY;
    for (p, &id) in positions.iter().zip(&ids) {
        let dx = p[0] - query[0];
        let dy = p[1] - query[1];
        let dz = p[2] - query[2];
        let sq = dx * dx + dy * dy + dz * dz;
        if sq < best_sq {
            best_sq = sq;
            best = id;
        }
    }
    println!(
        "linear scan      : id {:6} in {:.3} ms",
        best,
        start.elapsed().as_secs_f64() * 1000.0
    );

    let start = Instant::now();
    let mut balanced = BalancedKdTree::new();
    balanced.build(positions.clone(), ids.clone());
    println!(
        "balanced build   : {:.3} ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    let start = Instant::now();
    let id = balanced.nearest(query);
    println!(
        "balanced nearest : id {:6} in {:.3} ms",
        id,
        start.elapsed().as_secs_f64() * 1000.0
    );

    let start = Instant::now();
    let mut lazy = LazyKdTree::new();
    lazy.build(positions.clone(), ids.clone());
    println!(
        "lazy build       : {:.3} ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    let start = Instant::now();
    let id = lazy.nearest(query);
    println!(
        "lazy 1st nearest : id {:6} in {:.3} ms (splits the queried regions)",
        id,
        start.elapsed().as_secs_f64() * 1000.0
    );

    let start = Instant::now();
    let id = lazy.nearest(query);
    println!(
        "lazy 2nd nearest : id {:6} in {:.3} ms",
        id,
        start.elapsed().as_secs_f64() * 1000.0
    );

    // Peel off the ten closest points by deleting each answer in turn.
    println!("peeling the ten nearest ids:");
    for _ in 0..10 {
        let id = lazy.nearest(query);
        if id == NO_POINT {
            break;
        }
        balanced.delete(id);
        lazy.delete(id);
        print!(" {}", id);
    }
    println!();
}
