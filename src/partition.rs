use crate::store::PointStore;
use std::cmp::Ordering;

/// Splitting axis of a k-d tree node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Coordinate slot of this axis in a `[f64; 3]` position.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Picks the axis with the largest coordinate extent (max - min) over the
/// range `[start, start + length)`.
///
/// Ties break in fixed priority X, then Y, then Z. When every extent is zero
/// (all points coincide) the selection degrades to X.
pub(crate) fn widest_axis(store: &PointStore, start: usize, length: usize) -> Axis {
    let mut min = [f64::INFINITY; 3];
    let mut max = [f64::NEG_INFINITY; 3];

    for i in start..start + length {
        let p = store.position(i);
        for d in 0..3 {
            if p[d] < min[d] {
                min[d] = p[d];
            }
            if p[d] > max[d] {
                max[d] = p[d];
            }
        }
    }

    let mut best = Axis::X;
    for axis in [Axis::Y, Axis::Z] {
        let d = axis.index();
        if max[d] - min[d] > max[best.index()] - min[best.index()] {
            best = axis;
        }
    }
    best
}

fn cmp_coord(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Sorts the range `[start, start + length)` by the coordinate on `axis`.
///
/// The ordering is computed on a scratch permutation and then applied through
/// paired swaps, so identifiers can never drift from their positions.
pub(crate) fn sort_range(store: &mut PointStore, start: usize, length: usize, axis: Axis) {
    let mut order: Vec<usize> = (0..length).collect();
    order.sort_unstable_by(|&a, &b| {
        cmp_coord(store.coord(start + a, axis), store.coord(start + b, axis))
    });

    // Apply the permutation in place: earlier iterations may already have
    // moved the element wanted at slot i, chase it to its current slot.
    for i in 0..length {
        let mut j = order[i];
        while j < i {
            j = order[j];
        }
        store.swap(start + i, start + j);
    }
}

/// Partially orders `[start, start + length)` so that the element of rank
/// `k` within the range ends up at `start + k`, everything before it no
/// greater and everything after it no smaller on `axis`.
///
/// Partitions around the last element of the shrinking window, looping
/// instead of recursing. Expected O(length), which is what makes deferred
/// splits cheaper than a full sort.
pub(crate) fn quickselect(
    store: &mut PointStore,
    start: usize,
    length: usize,
    k: usize,
    axis: Axis,
) {
    debug_assert!(k < length);
    let target = start + k;
    let mut left = start;
    let mut right = start + length - 1;

    while left < right {
        let pivot = partition(store, left, right, axis);
        if pivot == target {
            break;
        }
        if target < pivot {
            right = pivot - 1;
        } else {
            left = pivot + 1;
        }
    }
}

fn partition(store: &mut PointStore, left: usize, right: usize, axis: Axis) -> usize {
    let pivot_value = store.coord(right, axis);
    let mut store_index = left;
    for i in left..right {
        if store.coord(i, axis) < pivot_value {
            store.swap(i, store_index);
            store_index += 1;
        }
    }
    store.swap(store_index, right);
    store_index
}
