use crate::index::{NO_POINT, SpatialIndex};
use crate::partition::{Axis, quickselect, widest_axis};
use crate::store::PointStore;
use std::collections::HashSet;

/// Number of points below which a region is scanned linearly instead of
/// being split.
pub const DEFAULT_SPLIT_THRESHOLD: usize = 16;

/// A node covering the contiguous store range `[start, start + length)`.
///
/// It starts life as an unsplit bucket (`axis == None`). The first query that
/// touches it while it is above the split threshold partitions the range in
/// place and attaches child buckets; the median element becomes the
/// one-element `middle` bucket so it stays queryable.
struct Node {
    start: usize,
    length: usize,
    axis: Option<Axis>,
    split_value: f64,
    left: Option<Box<Node>>,
    middle: Option<Box<Node>>,
    right: Option<Box<Node>>,
    deleted_ids: HashSet<i32>,
}

impl Node {
    fn bucket(start: usize, length: usize) -> Box<Node> {
        Box::new(Node {
            start,
            length,
            axis: None,
            split_value: 0.0,
            left: None,
            middle: None,
            right: None,
            deleted_ids: HashSet::new(),
        })
    }

    fn is_split(&self) -> bool {
        self.axis.is_some()
    }
}

struct NearestInfo {
    id: i32,
    sq_dist: f64,
}

/// A k-d tree that defers partitioning until a region is actually queried.
///
/// [`SpatialIndex::build`] is O(1): it creates a single bucket over the whole
/// store. Querying a bucket larger than the split threshold partitions it
/// with quickselect, paying an amortized O(n) once per region instead of the
/// eager variant's up-front O(n log² n); regions no query ever touches are
/// never split at all.
pub struct LazyKdTree {
    store: PointStore,
    root: Option<Box<Node>>,
    threshold: usize,
}

impl LazyKdTree {
    /// Creates a tree with the default split threshold of 16.
    pub fn new() -> LazyKdTree {
        LazyKdTree::with_threshold(DEFAULT_SPLIT_THRESHOLD)
    }

    /// Creates a tree that keeps buckets of up to `threshold` points
    /// unsplit.
    ///
    /// # Panics
    ///
    /// Panics if `threshold` is zero.
    pub fn with_threshold(threshold: usize) -> LazyKdTree {
        if threshold == 0 {
            panic!("split threshold must be positive");
        }
        LazyKdTree {
            store: PointStore::default(),
            root: None,
            threshold,
        }
    }

    /// Number of points in the store, tombstoned ones included.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn delete_rec(store: &PointStore, node: &mut Node, id: i32) -> bool {
        if !node.is_split() {
            for i in node.start..node.start + node.length {
                if store.id(i) == id {
                    // insert reports whether the tombstone is new, which is
                    // exactly the "did anything change" answer.
                    return node.deleted_ids.insert(id);
                }
            }
            return false;
        }

        for child in [
            node.left.as_deref_mut(),
            node.middle.as_deref_mut(),
            node.right.as_deref_mut(),
        ]
        .into_iter()
        .flatten()
        {
            if Self::delete_rec(store, child, id) {
                return true;
            }
        }
        false
    }

    fn search_nearest(
        store: &mut PointStore,
        threshold: usize,
        node: &mut Node,
        query: [f64; 3],
        nearest: &mut NearestInfo,
    ) {
        if !node.is_split() {
            // Splitting is a side effect of querying: a read pays the
            // restructuring cost, deletion never does.
            Self::try_split(store, threshold, node);
            if !node.is_split() {
                for i in node.start..node.start + node.length {
                    let id = store.id(i);
                    if node.deleted_ids.contains(&id) {
                        continue;
                    }
                    let sq = store.sq_dist(i, query);
                    if sq < nearest.sq_dist {
                        nearest.sq_dist = sq;
                        nearest.id = id;
                    }
                }
                return;
            }
        }

        let Some(axis) = node.axis else {
            return;
        };
        let diff = query[axis.index()] - node.split_value;
        let (near, far) = if diff < 0.0 {
            (node.left.as_deref_mut(), node.right.as_deref_mut())
        } else {
            (node.right.as_deref_mut(), node.left.as_deref_mut())
        };

        if let Some(child) = near {
            Self::search_nearest(store, threshold, child, query, nearest);
        }
        // The median sits on the splitting plane itself; its one-element
        // bucket costs O(1) to check and is on neither side of the plane.
        if let Some(child) = node.middle.as_deref_mut() {
            Self::search_nearest(store, threshold, child, query, nearest);
        }
        if nearest.sq_dist > diff * diff {
            if let Some(child) = far {
                Self::search_nearest(store, threshold, child, query, nearest);
            }
        }
    }

    fn try_split(store: &mut PointStore, threshold: usize, node: &mut Node) {
        if node.is_split() || node.length <= threshold {
            return;
        }

        let axis = widest_axis(store, node.start, node.length);
        let mid = node.start + node.length / 2;
        quickselect(store, node.start, node.length, node.length / 2, axis);
        node.axis = Some(axis);
        node.split_value = store.coord(mid, axis);

        let mut left = Node::bucket(node.start, mid - node.start);
        let mut middle = Node::bucket(mid, 1);
        let mut right = Node::bucket(mid + 1, node.start + node.length - (mid + 1));

        // Tombstones recorded before the split now belong to whichever child
        // range the quickselect moved the identifier into; leaving them on
        // this node would resurrect deleted points.
        if !node.deleted_ids.is_empty() {
            for child in [&mut left, &mut middle, &mut right] {
                for i in child.start..child.start + child.length {
                    let id = store.id(i);
                    if node.deleted_ids.contains(&id) {
                        child.deleted_ids.insert(id);
                    }
                }
            }
            node.deleted_ids.clear();
        }

        node.left = Some(left);
        node.middle = Some(middle);
        node.right = Some(right);
    }
}

impl SpatialIndex for LazyKdTree {
    fn build(&mut self, positions: Vec<[f64; 3]>, ids: Vec<i32>) {
        self.store = PointStore::new(positions, ids);
        self.root = Some(Node::bucket(0, self.store.len()));
    }

    fn delete(&mut self, id: i32) -> bool {
        match self.root.as_deref_mut() {
            Some(root) => Self::delete_rec(&self.store, root, id),
            None => false,
        }
    }

    fn nearest(&mut self, query: [f64; 3]) -> i32 {
        let Some(root) = self.root.as_deref_mut() else {
            return NO_POINT;
        };
        let mut nearest = NearestInfo {
            id: NO_POINT,
            sq_dist: f64::INFINITY,
        };
        Self::search_nearest(&mut self.store, self.threshold, root, query, &mut nearest);
        nearest.id
    }
}
