use crate::index::{NO_POINT, SpatialIndex};
use crate::partition::{Axis, sort_range, widest_axis};
use crate::store::PointStore;

struct Node {
    mid: usize,
    axis: Axis,
    smaller: Option<Box<Node>>,
    larger: Option<Box<Node>>,
    deleted: bool,
}

/// A statically balanced k-d tree, built once over the whole point set.
///
/// Every build step sorts its index range on the widest axis and recurses
/// around the lower median, so the tree is perfectly size-balanced regardless
/// of the input distribution. Deletion only tombstones nodes; the topology
/// never changes until the next [`SpatialIndex::build`].
pub struct BalancedKdTree {
    store: PointStore,
    root: Option<Box<Node>>,
}

impl BalancedKdTree {
    pub fn new() -> BalancedKdTree {
        BalancedKdTree {
            store: PointStore::default(),
            root: None,
        }
    }

    /// Number of points in the store, tombstoned ones included.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn build_range(store: &mut PointStore, offset: usize, length: usize) -> Option<Box<Node>> {
        if length == 0 {
            return None;
        }
        let axis = widest_axis(store, offset, length);
        sort_range(store, offset, length, axis);
        let mid = length / 2;
        Some(Box::new(Node {
            mid: offset + mid,
            axis,
            smaller: Self::build_range(store, offset, mid),
            larger: Self::build_range(store, offset + mid + 1, length - (mid + 1)),
            deleted: false,
        }))
    }

    fn delete_rec(store: &PointStore, node: Option<&mut Node>, id: i32, target: [f64; 3]) -> bool {
        let Some(node) = node else {
            return false;
        };
        if store.id(node.mid) == id {
            node.deleted = true;
            return true;
        }

        let node_coord = store.coord(node.mid, node.axis);
        let target_coord = target[node.axis.index()];
        if node_coord > target_coord {
            Self::delete_rec(store, node.smaller.as_deref_mut(), id, target)
        } else if node_coord < target_coord {
            Self::delete_rec(store, node.larger.as_deref_mut(), id, target)
        } else {
            // Equal coordinates may have been sorted to either side of the
            // median, so the descent has to try both.
            Self::delete_rec(store, node.larger.as_deref_mut(), id, target)
                || Self::delete_rec(store, node.smaller.as_deref_mut(), id, target)
        }
    }

    fn nearest_rec(&self, node: Option<&Node>, query: [f64; 3]) -> Option<usize> {
        let node = node?;

        let mut best = if node.deleted { None } else { Some(node.mid) };
        let dist_to_split = query[node.axis.index()] - self.store.coord(node.mid, node.axis);
        let (near, far) = if dist_to_split < 0.0 {
            (node.smaller.as_deref(), node.larger.as_deref())
        } else {
            (node.larger.as_deref(), node.smaller.as_deref())
        };

        best = self.closer(query, best, self.nearest_rec(near, query));

        // Cross the splitting plane only when the best candidate so far does
        // not already rule the far side out.
        let must_cross = match best {
            None => true,
            Some(index) => dist_to_split * dist_to_split < self.store.sq_dist(index, query),
        };
        if must_cross {
            best = self.closer(query, best, self.nearest_rec(far, query));
        }
        best
    }

    /// Picks the candidate closer to `query`, preferring `a` on exact ties.
    fn closer(&self, query: [f64; 3], a: Option<usize>, b: Option<usize>) -> Option<usize> {
        match (a, b) {
            (None, b) => b,
            (a, None) => a,
            (Some(i), Some(j)) => {
                if self.store.sq_dist(i, query) <= self.store.sq_dist(j, query) {
                    Some(i)
                } else {
                    Some(j)
                }
            }
        }
    }

    /// Renders the tree as an indented depth-first listing, one node per line
    /// with its identifier, position, splitting axis and tombstone state.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_rec(self.root.as_deref(), 0, &mut out);
        out
    }

    fn dump_rec(&self, node: Option<&Node>, depth: usize, out: &mut String) {
        let Some(node) = node else {
            return;
        };
        let p = self.store.position(node.mid);
        out.push_str(&format!(
            "{}id {} at [{}, {}, {}] axis {:?} deleted {}\n",
            "    ".repeat(depth),
            self.store.id(node.mid),
            p[0],
            p[1],
            p[2],
            node.axis,
            node.deleted,
        ));
        self.dump_rec(node.smaller.as_deref(), depth + 1, out);
        self.dump_rec(node.larger.as_deref(), depth + 1, out);
    }
}

impl SpatialIndex for BalancedKdTree {
    fn build(&mut self, positions: Vec<[f64; 3]>, ids: Vec<i32>) {
        let mut store = PointStore::new(positions, ids);
        let length = store.len();
        self.root = Self::build_range(&mut store, 0, length);
        self.store = store;
    }

    fn delete(&mut self, id: i32) -> bool {
        // The identifier is not an index: resolve the target's coordinates
        // first, they steer the descent.
        let Some(index) = self.store.index_of(id) else {
            return false;
        };
        let target = self.store.position(index);
        Self::delete_rec(&self.store, self.root.as_deref_mut(), id, target)
    }

    fn nearest(&mut self, query: [f64; 3]) -> i32 {
        match self.nearest_rec(self.root.as_deref(), query) {
            Some(index) => self.store.id(index),
            None => NO_POINT,
        }
    }
}
