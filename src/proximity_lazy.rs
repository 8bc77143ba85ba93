use crate::index::SpatialIndex;
use crate::kd_lazy::{DEFAULT_SPLIT_THRESHOLD, LazyKdTree};
use crate::proximity_balanced::{get_seed, unflatten};
use rand::prelude::*;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;

/// Nearest-neighbor index over a fixed set of 3D points, lazily split.
///
/// This is the bindings-facing wrapper around [`LazyKdTree`]. `build` is
/// instant; instead, the first queries partition the regions they touch, so
/// the indexing cost is only ever paid for parts of space that are actually
/// searched. Because of that, `nearest` mutates the index.
#[wasm_bindgen]
pub struct ProximityLazy {
    inner: LazyKdTree,
}

#[wasm_bindgen]
impl ProximityLazy {
    /// Creates an index with the default split threshold of 16.
    #[wasm_bindgen(constructor)]
    pub fn new() -> ProximityLazy {
        ProximityLazy {
            inner: LazyKdTree::new(),
        }
    }

    /// Creates an index that keeps regions of up to `threshold` points as
    /// linearly scanned buckets. Lower thresholds split more eagerly.
    pub fn with_threshold(threshold: usize) -> ProximityLazy {
        ProximityLazy {
            inner: LazyKdTree::with_threshold(threshold),
        }
    }

    /// Builds the index, replacing any previous contents. O(1): partitioning
    /// is deferred to the queries that need it.
    ///
    /// # Arguments
    ///
    /// * `positions` - A flat array of coordinates `[x, y, z, x, y, z, ...]`.
    /// * `ids` - One identifier per point, index-aligned with `positions`.
    pub fn build(&mut self, positions: &[f64], ids: &[i32]) -> Result<(), JsValue> {
        let points = unflatten(positions, ids.len())?;
        self.inner.build(points, ids.to_vec());
        Ok(())
    }

    /// Tombstones the point with the given identifier. Returns `false` when
    /// the identifier is unknown or already deleted.
    pub fn delete(&mut self, id: i32) -> bool {
        self.inner.delete(id)
    }

    /// Identifier of the closest non-deleted point, or `-1` when none is
    /// left.
    pub fn nearest(&mut self, x: f64, y: f64, z: f64) -> i32 {
        self.inner.nearest([x, y, z])
    }

    #[wasm_bindgen(getter)]
    pub fn count_points(&self) -> usize {
        self.inner.len()
    }

    #[wasm_bindgen(getter)]
    pub fn default_threshold(&self) -> usize {
        DEFAULT_SPLIT_THRESHOLD
    }

    /// Fills the index with `count` uniformly random points inside the cube
    /// `[min, max]^3`, using identifiers `0..count`.
    pub fn random_points(&mut self, count: usize, min: f64, max: f64) {
        let mut rng = StdRng::seed_from_u64(get_seed());
        let size = max - min;
        let positions = (0..count)
            .map(|_| {
                [
                    min + rng.r#gen::<f64>() * size,
                    min + rng.r#gen::<f64>() * size,
                    min + rng.r#gen::<f64>() * size,
                ]
            })
            .collect();
        let ids = (0..count as i32).collect();
        self.inner.build(positions, ids);
    }
}
